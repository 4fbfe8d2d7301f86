//! Argument parsing and reporting for the `np-search` binary.

pub(crate) mod cli;
