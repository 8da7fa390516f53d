//! Index-based Subgraph Matching Algorithm with General Symmetries.
//!
//! Finds every occurrence of a small pattern graph (a "motif") within a larger host
//! graph, using the motif's own automorphism group to avoid reporting the same
//! occurrence once per symmetric relabeling of the motif's nodes.

pub mod cli;
pub mod error;
pub mod graph;
pub mod motif;
pub mod output;
pub mod search;
pub mod symmetry;

pub use error::{Error, Result};
