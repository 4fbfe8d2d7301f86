//! Assign one of `k` colors to every vertex so that no edge joins two
//! vertices of the same color.

pub mod graph;
pub mod strategies;

pub use graph::{Coloring, GraphInstance};
