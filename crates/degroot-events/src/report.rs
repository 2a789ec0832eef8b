//! Run Report Types
//!
//! The serializable outcome of a bounded iteration run.
//!
//! A report carries everything a replay front end needs: the convergence
//! status, the pre-step history frames for a step slider, the final belief
//! vector, the trust graph edges, and display markup.

use serde::{Deserialize, Serialize};

use crate::{BeliefSnapshot, InfluenceEdge};

/// Math markup for one displayed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupPair {
    /// Column vector of beliefs
    pub beliefs: String,
    /// Trust matrix
    pub trust: String,
}

/// Outcome of one `iterate` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub agents: usize,
    pub converged: bool,
    /// Number of update steps performed
    pub steps: usize,
    pub max_steps: usize,
    pub tolerance: f64,
    /// Pre-step belief vectors, `history[0]` is the initial state
    #[serde(default)]
    pub history: Vec<BeliefSnapshot>,
    pub final_beliefs: Vec<f64>,
    /// Final beliefs as bounded-denominator fractions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_fractions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<InfluenceEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<MarkupPair>,
}

impl RunReport {
    /// Returns the history frame a replay slider shows at position `step`.
    pub fn frame(&self, step: usize) -> Option<&BeliefSnapshot> {
        self.history.get(step)
    }

    /// Upper bound for a replay slider, `None` when there is no history.
    pub fn last_frame_index(&self) -> Option<usize> {
        self.history.len().checked_sub(1)
    }

    /// Human-readable status line.
    pub fn status_line(&self) -> String {
        if self.converged {
            format!("Convergence reached at step {}", self.steps)
        } else {
            format!("No convergence after {} steps", self.steps)
        }
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Writes the history as JSON lines, one snapshot per line.
    pub fn history_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for snapshot in &self.history {
            out.push_str(&snapshot.to_jsonl()?);
            out.push('\n');
        }
        Ok(out)
    }
}
