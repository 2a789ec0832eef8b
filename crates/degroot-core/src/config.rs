//! Configuration System
//!
//! Simulation settings and the scenario to run are loaded from a TOML file.
//! Every section falls back to its defaults, so a partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::model::{BeliefModel, ModelError};

/// Default tuning values
pub mod defaults {
    /// Upper bound on update steps for one `iterate` run
    pub const MAX_STEPS: usize = 1000;
    /// Per-component convergence threshold
    pub const TOLERANCE: f64 = f64::EPSILON * 1000.0;
    /// Allowed distance of a trust row sum from 1
    pub const ROW_SUM_TOLERANCE: f64 = 1e-9;
    /// Denominator limit for plain-text belief output
    pub const TEXT_MAX_DENOMINATOR: u64 = 100_000;
    /// Denominator limit for matrix markup
    pub const MARKUP_MAX_DENOMINATOR: u64 = 10;
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DegrootConfig {
    /// Initial beliefs and trust weights
    #[serde(default)]
    pub scenario: Scenario,
    /// Construction-time validation settings
    #[serde(default)]
    pub model: ModelConfig,
    /// Bounded iteration settings
    #[serde(default)]
    pub iteration: IterationConfig,
    /// Rational display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

impl DegrootConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, TomlSerializeError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Builds the configured scenario under the configured validation rules.
    pub fn build_model(&self) -> Result<BeliefModel, ModelError> {
        self.scenario.build(&self.model)
    }
}

/// Initial state for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub beliefs: Vec<f64>,
    /// Nested rows, validated when the model is built
    pub trust: Vec<Vec<f64>>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::reference()
    }
}

impl Scenario {
    /// Three agents where agent 0 splits its trust between the other two.
    pub fn reference() -> Self {
        Self {
            beliefs: vec![1.0, 0.0, 0.0],
            trust: vec![
                vec![0.0, 0.5, 0.5],
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
            ],
        }
    }

    /// Three agents with self-trust feeding around a cycle.
    pub fn self_weighted_cycle() -> Self {
        Self {
            beliefs: vec![1.0, 0.0, 0.0],
            trust: vec![
                vec![0.5, 0.5, 0.0],
                vec![0.0, 0.5, 0.5],
                vec![1.0, 0.0, 0.0],
            ],
        }
    }

    pub fn build(&self, config: &ModelConfig) -> Result<BeliefModel, ModelError> {
        BeliefModel::from_rows_with_config(self.beliefs.clone(), &self.trust, config)
    }
}

/// Which belief values construction accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BeliefBounds {
    /// `0 <= belief <= 1`
    #[default]
    Closed,
    /// `0 < belief < 1`
    Open,
}

impl BeliefBounds {
    pub fn contains(self, value: f64) -> bool {
        match self {
            BeliefBounds::Closed => (0.0..=1.0).contains(&value),
            BeliefBounds::Open => value > 0.0 && value < 1.0,
        }
    }
}

/// Construction-time validation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Allowed `|sum(row) - 1|` for each trust row
    pub row_sum_tolerance: f64,
    /// Accepted range for initial beliefs
    pub belief_bounds: BeliefBounds,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            row_sum_tolerance: defaults::ROW_SUM_TOLERANCE,
            belief_bounds: BeliefBounds::Closed,
        }
    }
}

/// Bounded iteration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IterationConfig {
    pub max_steps: usize,
    /// Strict per-component threshold on successive belief changes
    pub tolerance: f64,
}

impl Default for IterationConfig {
    fn default() -> Self {
        Self {
            max_steps: defaults::MAX_STEPS,
            tolerance: defaults::TOLERANCE,
        }
    }
}

/// Rational display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub text_max_denominator: u64,
    pub markup_max_denominator: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            text_max_denominator: defaults::TEXT_MAX_DENOMINATOR,
            markup_max_denominator: defaults::MARKUP_MAX_DENOMINATOR,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Error that can occur during TOML serialization.
#[derive(Debug, Error)]
#[error("TOML serialize error: {0}")]
pub struct TomlSerializeError(#[from] pub toml::ser::Error);

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# DeGroot Simulator Configuration

[scenario]
beliefs = [1.0, 0.0, 0.0]
trust = [
    [0.0, 0.5, 0.5],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
]

[model]
row_sum_tolerance = 1e-9
belief_bounds = "closed"

[iteration]
max_steps = 1000
tolerance = 2.220446049250313e-13

[display]
text_max_denominator = 100000
markup_max_denominator = 10
"#
    .to_string()
}
