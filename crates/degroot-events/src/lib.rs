//! Shared run artifacts and serialization for the DeGroot simulator.
//!
//! This crate contains pure data structures with no simulation logic.
//! Presentation layers (replay sliders, graph renderers) consume these types
//! without depending on the belief-update engine itself.

pub mod report;
pub mod snapshot;

// Re-export snapshot types
pub use snapshot::{BeliefSnapshot, InfluenceEdge};

// Re-export report types
pub use report::{MarkupPair, RunReport};
