//! DeGroot opinion dynamics: belief updates over a fixed trust matrix.
//!
//! A population of agents holds scalar beliefs. On every step the belief row
//! vector is multiplied by the row-stochastic trust matrix, so each agent's
//! belief is spread over the agents it trusts and the total is conserved.
//! Repeating this either settles into a steady distribution or cycles
//! forever.
//!
//! # Modules
//!
//! - [`model`]: validated construction, single steps, bounded iteration
//! - [`trust`]: the square, row-major trust matrix
//! - [`rational`]: bounded-denominator fractions for display
//! - [`markup`]: LaTeX matrix markup of beliefs and trust
//! - [`config`]: TOML configuration and scenarios
//! - [`report`]: serializable run reports for replay front ends

pub mod config;
pub mod markup;
pub mod model;
pub mod rational;
pub mod report;
pub mod trust;

// Re-export model types
pub use model::{BeliefModel, Iteration, ModelError};

// Re-export trust types
pub use trust::{DimensionError, TrustMatrix};

// Re-export formatter types
pub use rational::{
    format_all, format_scalar, FormatError, ParseRationalError, Rational, RationalFormat,
};

// Re-export config types
pub use config::{
    default_config_toml, BeliefBounds, ConfigError, DegrootConfig, DisplayConfig,
    IterationConfig, ModelConfig, Scenario, TomlSerializeError,
};

pub use report::{build_report, step_trace};

use thiserror::Error;

/// Errors that can occur anywhere in a simulation run.
#[derive(Debug, Error)]
pub enum DegrootError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] TomlSerializeError),
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("history frame {step} out of range, run has {frames} frames")]
    FrameOutOfRange { step: usize, frames: usize },
}
