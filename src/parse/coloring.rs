//! Graph instances: `p edge <n_vertices> <n_edges>` (`cnf` and `col` are
//! accepted in place of `edge`) followed by one-based `u,v` edge lines. The
//! header parameter is the color budget.

use crate::coloring::GraphInstance;
use crate::error::ParseError;
use crate::parse::{fields, number, Header, InstanceFormat, Lines};

/// Reads a one-based vertex number as a zero-based index.
fn vertex(token: &str, line: usize) -> Result<usize, ParseError> {
    number::<usize>(token, line)?
        .checked_sub(1)
        .ok_or(ParseError::Malformed {
            line,
            what: "edge, vertices are numbered from 1",
        })
}

impl InstanceFormat for GraphInstance {
    fn read_instance(header: &Header, lines: &mut Lines) -> Result<Self, ParseError> {
        let k: usize = header.required_parameter("instance header, missing color count")?;
        let (line, params) = lines.problem_line(header, &["edge", "col", "cnf"], "p edge")?;
        let [vertex_count, edge_count] = params.as_slice() else {
            return Err(ParseError::Malformed {
                line,
                what: "problem line",
            });
        };
        let vertex_count: usize = number(vertex_count, line)?;
        let edge_count: usize = number(edge_count, line)?;

        let mut edges = Vec::new();
        for _ in 0..edge_count {
            let Some((line, text)) = lines.body_line() else {
                break;
            };
            let endpoints: Vec<_> = fields(text).collect();
            let [u, v] = endpoints.as_slice() else {
                return Err(ParseError::Malformed { line, what: "edge" });
            };
            edges.push((vertex(u, line)?, vertex(v, line)?));
        }

        Self::new(vertex_count, edges, k).map_err(|source| ParseError::Invalid {
            id: header.id.clone(),
            source,
        })
    }
}
