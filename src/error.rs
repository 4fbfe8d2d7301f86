//! Error types shared across the crate.
//!
//! Solve calls never fail on valid input, so the errors here belong to the
//! layers around the search core: instance validation, parsing of the
//! multi-instance input format, the persisted configuration record and
//! writing result tables.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// An instance violates one of the invariants of its data model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A clause contains the literal `0`, which is reserved as a terminator.
    #[error("literal 0 is not a valid literal")]
    ZeroLiteral,

    /// A literal refers to a variable outside `1..=variable_count`.
    #[error("literal {literal} is outside the variable range 1..={variable_count}")]
    LiteralOutOfRange {
        /// The offending literal.
        literal: i32,
        /// The number of declared variables.
        variable_count: usize,
    },

    /// An edge endpoint is not a vertex of the graph.
    #[error("edge ({u}, {v}) references a vertex outside 0..{vertex_count}")]
    VertexOutOfRange {
        /// First endpoint.
        u: usize,
        /// Second endpoint.
        v: usize,
        /// The number of vertices.
        vertex_count: usize,
    },

    /// An edge connects a vertex to itself.
    #[error("self-loop on vertex {0}")]
    SelfLoop(usize),

    /// A coin denomination is zero or negative.
    #[error("denomination {0} must be positive")]
    NonPositiveDenomination(i64),

    /// A coin denomination has a negative availability.
    #[error("denomination {denomination} has negative count {count}")]
    NegativeCount {
        /// The denomination.
        denomination: i64,
        /// The offending count.
        count: i64,
    },

    /// The same denomination appears twice in one instance.
    #[error("denomination {0} is listed more than once")]
    DuplicateDenomination(i64),
}

/// A multi-instance input file could not be parsed.
///
/// Line numbers are one-based and refer to the original file, blank lines
/// included.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The header of an instance was not followed by the expected problem line.
    #[error("line {line}: expected `{expected}` after the instance header")]
    MissingProblemLine {
        /// Line of the offending text, or of the header when the input ends.
        line: usize,
        /// The expected problem line prefix.
        expected: &'static str,
    },

    /// A token that should be an integer is not one.
    #[error("line {line}: `{token}` is not a valid integer")]
    InvalidNumber {
        /// Line of the token.
        line: usize,
        /// The token text.
        token: String,
    },

    /// A line has the wrong shape for its position in the file.
    #[error("line {line}: malformed {what}")]
    Malformed {
        /// Line of the offending text.
        line: usize,
        /// What was being read.
        what: &'static str,
    },

    /// The instance was read but violates a data model invariant.
    #[error("instance {id}: {source}")]
    Invalid {
        /// Identifier from the instance header.
        id: String,
        /// The violated invariant.
        #[source]
        source: ValidationError,
    },

    /// The file could not be read.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The configuration record could not be read, written or understood.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file exists at the given path.
    #[error("configuration file {0} does not exist")]
    Missing(PathBuf),

    /// The selected problem is not one this crate can solve.
    #[error("unsupported problem selection `{0}`")]
    UnknownProblem(String),

    /// The record is not valid JSON or has the wrong shape.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Reading or writing the file failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Top-level error for running the harness.
#[derive(Debug, Error)]
pub enum Error {
    /// An input file could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The input file.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: ParseError,
    },

    /// The configuration record is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A result table could not be written.
    #[error("failed to write results to {path}: {source}")]
    Report {
        /// The table file.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: io::Error,
    },

    /// Walking an input directory failed.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// Any other I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result alias defaulting to the crate [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
