#![deny(missing_docs)]
//! Exhaustive and heuristic search over three NP-complete problems: CNF
//! satisfiability, graph k-coloring and bounded subset-sum.
//!
//! Every domain offers the same four strategies (brute force, backtracking,
//! a simple heuristic and best case branch-and-bound) behind the
//! [`search::Problem`] trait, so their behavior and cost can be compared on
//! the same instances.

/// Errors raised while validating, parsing, configuring and reporting.
pub mod error;

/// The strategy dispatch shared by every domain.
pub mod search;

/// Boolean satisfiability of CNF formulas.
pub mod sat;

/// k-coloring of undirected graphs.
pub mod coloring;

/// Bounded subset-sum over a coin multiset.
pub mod knapsack;

/// Readers for the multi-instance input format.
pub mod parse;

/// Timing of strategy calls and CSV result tables.
pub mod report;

/// The persisted problem and strategy selection.
pub mod config;

/// Runs selected strategies over input files.
pub mod runner;
