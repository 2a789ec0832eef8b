//! Snapshot Types
//!
//! Per-step belief captures and trust-graph edges.

use serde::{Deserialize, Serialize};

/// Belief vector recorded before update `step` was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefSnapshot {
    /// Index of the update this vector was the input to
    pub step: usize,
    pub beliefs: Vec<f64>,
}

impl BeliefSnapshot {
    /// Creates a new BeliefSnapshot.
    pub fn new(step: usize, beliefs: Vec<f64>) -> Self {
        Self { step, beliefs }
    }

    /// Serializes the snapshot as a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a snapshot from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Directed influence edge: `from` places `weight` on the belief of `to`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InfluenceEdge {
    pub from: usize,
    pub to: usize,
    pub weight: f64,
}

impl InfluenceEdge {
    /// Creates a new InfluenceEdge.
    pub fn new(from: usize, to: usize, weight: f64) -> Self {
        Self { from, to, weight }
    }
}
