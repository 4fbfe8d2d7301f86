//! Readers for the line-oriented multi-instance input format.
//!
//! A file holds any number of instances. Each one starts with a header
//!
//! ```text
//! c <instance_id> <parameter> [status]
//! ```
//!
//! followed by a domain-specific problem line (`p cnf ...`, `p edge ...`,
//! `p knap ...`) and its body. Lines are trimmed, blank lines are ignored and
//! anything before the first header is skipped. The header parameter is the
//! color budget for coloring and the target for knapsack; SAT ignores it.
//!
//! The optional status records what the instance is known to be:
//! `?`/`0` for unknown, `1`/`S`/`YES` for feasible, `-1`/`U`/`NO` for
//! infeasible. Knapsack instances may instead give the expected best usage
//! as `{value,count,...}`.

pub mod coloring;
pub mod knapsack;
pub mod sat;

use crate::error::ParseError;
use crate::search::Problem;
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// What an instance header says about the instance's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation<W> {
    /// No claim.
    Unknown,
    /// Known to be feasible (`true`) or infeasible (`false`).
    Decided(bool),
    /// The witness best case should report.
    Best(W),
}

impl<W> Expectation<W> {
    /// The feasibility this expectation implies, if any. A best witness
    /// implies feasibility exactly when it solves the instance.
    pub fn feasibility<P: Problem<Witness = W>>(&self, problem: &P) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::Decided(feasible) => Some(*feasible),
            Self::Best(witness) => Some(problem.verify(witness)),
        }
    }
}

/// One instance read from a file.
#[derive(Debug, Clone)]
pub struct ParsedInstance<P: Problem> {
    /// Identifier from the header, or the instance's ordinal.
    pub id: String,
    /// The validated instance.
    pub problem: P,
    /// The header's status.
    pub expectation: Expectation<P::Witness>,
}

/// An instance header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// One-based line number.
    pub line: usize,
    /// Instance identifier.
    pub id: String,
    /// The domain parameter, if present.
    pub parameter: Option<String>,
    /// The status token, if present.
    pub status: Option<String>,
}

impl Header {
    /// Splits `c <id> <parameter> [status]`; `ordinal` stands in for a
    /// missing id.
    fn parse(text: &str, line: usize, ordinal: usize) -> Self {
        let mut tokens = text.split_whitespace().skip(1).map(str::to_string);
        Self {
            line,
            id: tokens.next().unwrap_or_else(|| ordinal.to_string()),
            parameter: tokens.next(),
            status: tokens.next(),
        }
    }

    /// The parameter parsed as a number.
    ///
    /// # Errors
    ///
    /// [`ParseError::Malformed`] when the header has no parameter and
    /// [`ParseError::InvalidNumber`] when it is not a number.
    pub fn required_parameter<T: FromStr>(&self, what: &'static str) -> Result<T, ParseError> {
        let token = self.parameter.as_deref().ok_or(ParseError::Malformed {
            line: self.line,
            what,
        })?;
        number(token, self.line)
    }
}

/// The non-blank lines of an input, with their original line numbers.
#[derive(Debug)]
pub struct Lines {
    lines: Vec<(usize, String)>,
    next: usize,
}

impl Lines {
    fn read<R: BufRead>(reader: R) -> Result<Self, ParseError> {
        let mut lines = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                lines.push((idx + 1, trimmed.to_string()));
            }
        }
        Ok(Self { lines, next: 0 })
    }

    /// The next line without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<(usize, &str)> {
        self.lines
            .get(self.next)
            .map(|(number, text)| (*number, text.as_str()))
    }

    /// Consumes the next line.
    pub fn advance(&mut self) -> Option<(usize, &str)> {
        let line = self.lines.get(self.next)?;
        self.next += 1;
        Some((line.0, line.1.as_str()))
    }

    /// Consumes the next body line unless the input ended or the next line
    /// starts another instance.
    pub fn body_line(&mut self) -> Option<(usize, &str)> {
        match self.peek() {
            Some((_, text)) if !is_header(text) => self.advance(),
            _ => None,
        }
    }

    /// Consumes the problem line `p <keyword> <fields...>` for one of
    /// `keywords` and returns its fields.
    ///
    /// # Errors
    ///
    /// [`ParseError::MissingProblemLine`] when the next line is anything
    /// else.
    pub fn problem_line(
        &mut self,
        header: &Header,
        keywords: &[&str],
        expected: &'static str,
    ) -> Result<(usize, Vec<String>), ParseError> {
        let Some((line, text)) = self.peek() else {
            return Err(ParseError::MissingProblemLine {
                line: header.line,
                expected,
            });
        };
        let mut tokens = text.split_whitespace();
        let matches = tokens.next() == Some("p")
            && tokens.next().is_some_and(|keyword| keywords.contains(&keyword));
        if !matches {
            return Err(ParseError::MissingProblemLine { line, expected });
        }

        let fields = tokens.map(str::to_string).collect();
        self.next += 1;
        Ok((line, fields))
    }
}

/// Whether a line starts a new instance.
fn is_header(text: &str) -> bool {
    text == "c" || text.starts_with("c ")
}

/// Parses one integer token.
///
/// # Errors
///
/// [`ParseError::InvalidNumber`] carrying the token and its line.
pub fn number<T: FromStr>(token: &str, line: usize) -> Result<T, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

/// Splits a body line on whitespace and commas.
pub fn fields(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
}

/// A domain whose instances can be read from the multi-instance format.
pub trait InstanceFormat: Problem + Sized {
    /// Reads the problem line and body that follow `header`.
    ///
    /// # Errors
    ///
    /// Any malformed line, or an instance that fails validation.
    fn read_instance(header: &Header, lines: &mut Lines) -> Result<Self, ParseError>;

    /// Reads a status token naming an expected witness. Returns `None` for
    /// domains without such tokens.
    fn expected_witness(_token: &str, _line: usize) -> Option<Result<Self::Witness, ParseError>> {
        None
    }
}

fn expectation<P: InstanceFormat>(header: &Header) -> Result<Expectation<P::Witness>, ParseError> {
    let Some(token) = header.status.as_deref() else {
        return Ok(Expectation::Unknown);
    };
    match token.to_ascii_uppercase().as_str() {
        "?" | "0" => Ok(Expectation::Unknown),
        "1" | "S" | "YES" => Ok(Expectation::Decided(true)),
        "-1" | "U" | "NO" => Ok(Expectation::Decided(false)),
        _ => match P::expected_witness(token, header.line) {
            Some(witness) => witness.map(Expectation::Best),
            None => Err(ParseError::Malformed {
                line: header.line,
                what: "instance status",
            }),
        },
    }
}

/// Reads every instance of one domain from `reader`.
///
/// A header on the last line of the input, with no problem line after it,
/// is ignored.
///
/// # Errors
///
/// The first [`ParseError`] encountered; instances before it are discarded.
pub fn parse_instances<P: InstanceFormat, R: BufRead>(
    reader: R,
) -> Result<Vec<ParsedInstance<P>>, ParseError> {
    let mut lines = Lines::read(reader)?;
    let mut instances = Vec::new();

    while let Some((line, text)) = lines.advance() {
        if !is_header(text) {
            continue;
        }
        let header = Header::parse(text, line, instances.len() + 1);
        if lines.peek().is_none() {
            warn!("line {line}: instance {} has no body, ignoring it", header.id);
            break;
        }

        let problem = P::read_instance(&header, &mut lines)?;
        let expectation = expectation::<P>(&header)?;
        debug!(
            "parsed instance {} ({})",
            header.id,
            problem.size_metrics().join(" x ")
        );
        instances.push(ParsedInstance {
            id: header.id,
            problem,
            expectation,
        });
    }

    Ok(instances)
}

/// Opens `path` and reads every instance of one domain from it.
///
/// # Errors
///
/// I/O failures and the errors of [`parse_instances`].
pub fn parse_file<P: InstanceFormat>(path: &Path) -> Result<Vec<ParsedInstance<P>>, ParseError> {
    let file = File::open(path)?;
    parse_instances(BufReader::new(file))
}
