//! A formula is a list of clauses over the variables `1..=n`; it is
//! satisfied when every clause contains a literal that is true.

pub mod formula;
pub mod strategies;

pub use formula::{Assignment, Clause, SatInstance};
