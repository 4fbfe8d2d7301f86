//! CNF instances: `p cnf <n_vars> <n_clauses>` followed by clause lines.

use crate::error::ParseError;
use crate::parse::{fields, number, Header, InstanceFormat, Lines};
use crate::sat::SatInstance;

impl InstanceFormat for SatInstance {
    /// Reads up to `n_clauses` clause lines. A `0` token only terminates a
    /// clause, lines with no literals are skipped and a new header ends the
    /// clause list early.
    fn read_instance(header: &Header, lines: &mut Lines) -> Result<Self, ParseError> {
        let (line, params) = lines.problem_line(header, &["cnf"], "p cnf")?;
        let [variables, clause_count] = params.as_slice() else {
            return Err(ParseError::Malformed {
                line,
                what: "problem line",
            });
        };
        let variables: usize = number(variables, line)?;
        let clause_count: usize = number(clause_count, line)?;

        let mut clauses = Vec::new();
        for _ in 0..clause_count {
            let Some((line, text)) = lines.body_line() else {
                break;
            };
            let literals = fields(text)
                .map(|token| number::<i32>(token, line))
                .filter(|literal| !matches!(literal, Ok(0)))
                .collect::<Result<Vec<_>, _>>()?;
            if !literals.is_empty() {
                clauses.push(literals);
            }
        }

        Self::new(variables, clauses).map_err(|source| ParseError::Invalid {
            id: header.id.clone(),
            source,
        })
    }
}
