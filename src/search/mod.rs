//! The backtracking search engine and its supporting per-motif-node data structures.

pub mod candidate;
pub mod engine;
pub mod priority;

pub use engine::{MotifInstance, SearchEngine, SearchOutcome};
