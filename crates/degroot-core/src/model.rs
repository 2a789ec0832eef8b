//! Belief Model
//!
//! The DeGroot belief-update engine. The belief vector is a row vector and
//! each step multiplies it by the trust matrix, `b' = b·T`, so agent `j`
//! collects `b[i] * T[i][j]` from every agent `i`. All agents update at once
//! from the previous vector, and the total belief never changes.
//!
//! # Example
//!
//! ```
//! use degroot_core::{BeliefModel, TrustMatrix};
//!
//! let trust = TrustMatrix::from_rows(&[
//!     vec![0.0, 0.5, 0.5],
//!     vec![1.0, 0.0, 0.0],
//!     vec![0.0, 1.0, 0.0],
//! ]).unwrap();
//! let mut model = BeliefModel::new(vec![1.0, 0.0, 0.0], trust).unwrap();
//!
//! let run = model.iterate(1000, 1e-12).unwrap();
//! assert!(run.converged);
//! assert_eq!(run.history[0], vec![1.0, 0.0, 0.0]);
//! assert_eq!(model.fraction_line(100_000).unwrap(), "2/5 2/5 1/5");
//! ```

use std::fmt;

use thiserror::Error;
use tracing::debug;

use degroot_events::MarkupPair;

use crate::config::{defaults, IterationConfig, ModelConfig};
use crate::markup;
use crate::rational::{format_all, FormatError};
use crate::trust::{DimensionError, TrustMatrix};

/// Errors raised when building or running a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error(transparent)]
    Dimension(#[from] DimensionError),
    #[error("trust matrix row {row} sums to {sum}, expected 1")]
    RowSum { row: usize, sum: f64 },
    #[error("belief {index} is {value}, outside the valid range")]
    Range { index: usize, value: f64 },
    #[error("trust weight ({row}, {col}) is {value}, expected a finite non-negative number")]
    InvalidWeight { row: usize, col: usize, value: f64 },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Outcome of a bounded `iterate` run.
#[derive(Debug, Clone, PartialEq)]
pub struct Iteration {
    pub converged: bool,
    /// Update steps performed
    pub steps: usize,
    /// Pre-step belief vectors; `history[0]` is the state the run started from
    pub history: Vec<Vec<f64>>,
}

impl Iteration {
    /// Belief vector before update `step`.
    pub fn frame(&self, step: usize) -> Option<&[f64]> {
        self.history.get(step).map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeliefModel {
    beliefs: Vec<f64>,
    trust: TrustMatrix,
}

impl BeliefModel {
    /// Builds a model with the default validation settings.
    pub fn new(beliefs: Vec<f64>, trust: TrustMatrix) -> Result<Self, ModelError> {
        Self::with_config(beliefs, trust, &ModelConfig::default())
    }

    /// Builds a model, validating shapes, trust rows and belief range.
    pub fn with_config(
        beliefs: Vec<f64>,
        trust: TrustMatrix,
        config: &ModelConfig,
    ) -> Result<Self, ModelError> {
        if beliefs.is_empty() {
            return Err(DimensionError::Empty.into());
        }
        if beliefs.len() != trust.dimension() {
            return Err(DimensionError::Mismatch {
                beliefs: beliefs.len(),
                trust_rows: trust.dimension(),
                trust_cols: trust.dimension(),
            }
            .into());
        }
        if !(config.row_sum_tolerance >= 0.0 && config.row_sum_tolerance.is_finite()) {
            return Err(ModelError::InvalidArgument(format!(
                "row_sum_tolerance must be finite and non-negative, got {}",
                config.row_sum_tolerance
            )));
        }

        validate_trust(&trust, config.row_sum_tolerance)?;

        if let Some((index, &value)) = beliefs
            .iter()
            .enumerate()
            .find(|(_, v)| !config.belief_bounds.contains(**v))
        {
            return Err(ModelError::Range { index, value });
        }

        Ok(Self { beliefs, trust })
    }

    /// Builds a model from nested trust rows with the default settings.
    pub fn from_rows<R: AsRef<[f64]>>(beliefs: Vec<f64>, rows: &[R]) -> Result<Self, ModelError> {
        Self::from_rows_with_config(beliefs, rows, &ModelConfig::default())
    }

    /// Builds a model from nested trust rows.
    ///
    /// A belief/row count mismatch is reported before the matrix shape.
    pub fn from_rows_with_config<R: AsRef<[f64]>>(
        beliefs: Vec<f64>,
        rows: &[R],
        config: &ModelConfig,
    ) -> Result<Self, ModelError> {
        if !beliefs.is_empty() && beliefs.len() != rows.len() {
            return Err(DimensionError::Mismatch {
                beliefs: beliefs.len(),
                trust_rows: rows.len(),
                trust_cols: rows.first().map_or(0, |r| r.as_ref().len()),
            }
            .into());
        }
        let trust = TrustMatrix::from_rows(rows)?;
        Self::with_config(beliefs, trust, config)
    }

    pub fn beliefs(&self) -> &[f64] {
        &self.beliefs
    }

    pub fn trust(&self) -> &TrustMatrix {
        &self.trust
    }

    pub fn agent_count(&self) -> usize {
        self.beliefs.len()
    }

    /// Applies one synchronous update and returns the new belief vector.
    pub fn step(&mut self) -> &[f64] {
        self.beliefs = self.trust.apply(&self.beliefs);
        &self.beliefs
    }

    /// Steps until every component moves by less than `tolerance`, or until
    /// `max_steps` updates have run.
    ///
    /// The history holds the vector *before* each update, so a converged run
    /// leaves its final vector only in [`BeliefModel::beliefs`].
    pub fn iterate(&mut self, max_steps: usize, tolerance: f64) -> Result<Iteration, ModelError> {
        if max_steps < 1 {
            return Err(ModelError::InvalidArgument(format!(
                "number of iterations must be 1 or greater, got {max_steps}"
            )));
        }
        if !(tolerance > 0.0 && tolerance.is_finite()) {
            return Err(ModelError::InvalidArgument(format!(
                "tolerance must be a small positive number, got {tolerance}"
            )));
        }

        let mut history = Vec::with_capacity(max_steps.min(1024));
        for i in 0..max_steps {
            let previous = self.beliefs.clone();
            let current = self.step();
            let settled = current
                .iter()
                .zip(&previous)
                .all(|(new, old)| (new - old).abs() < tolerance);
            history.push(previous);

            if settled {
                debug!(steps = i + 1, agents = self.agent_count(), "convergence reached");
                return Ok(Iteration {
                    converged: true,
                    steps: i + 1,
                    history,
                });
            }
        }

        debug!(steps = max_steps, agents = self.agent_count(), "no convergence");
        Ok(Iteration {
            converged: false,
            steps: max_steps,
            history,
        })
    }

    /// Runs `iterate` with configured limits.
    pub fn iterate_with(&mut self, config: &IterationConfig) -> Result<Iteration, ModelError> {
        self.iterate(config.max_steps, config.tolerance)
    }

    /// Current beliefs as fractions with denominators up to `max_denominator`.
    pub fn fractions(&self, max_denominator: u64) -> Result<Vec<String>, FormatError> {
        format_all(&self.beliefs, max_denominator)
    }

    /// Space-separated [`BeliefModel::fractions`].
    pub fn fraction_line(&self, max_denominator: u64) -> Result<String, FormatError> {
        Ok(self.fractions(max_denominator)?.join(" "))
    }

    /// Markup for the current beliefs and the trust matrix.
    pub fn render_markup(&self, max_denominator: u64) -> Result<MarkupPair, FormatError> {
        markup::render(&self.beliefs, &self.trust, max_denominator)
    }
}

impl fmt::Display for BeliefModel {
    /// [`BeliefModel::fraction_line`] at the default text denominator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self
            .fraction_line(defaults::TEXT_MAX_DENOMINATOR)
            .map_err(|_| fmt::Error)?;
        f.write_str(&line)
    }
}

fn validate_trust(trust: &TrustMatrix, row_sum_tolerance: f64) -> Result<(), ModelError> {
    for (row, weights) in trust.rows().enumerate() {
        if let Some((col, &value)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !(w.is_finite() && **w >= 0.0))
        {
            return Err(ModelError::InvalidWeight { row, col, value });
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > row_sum_tolerance {
            return Err(ModelError::RowSum { row, sum });
        }
    }
    Ok(())
}
