//! Undirected graphs with a color budget, and vertex colorings.

use crate::error::ValidationError;
use crate::search::Witness;
use itertools::Itertools;
use rustc_hash::FxHashSet;
use std::fmt::{self, Display};

/// A k-coloring instance over the vertices `0..vertex_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphInstance {
    vertex_count: usize,
    /// Normalized `(min, max)` pairs without duplicates, in first-seen order.
    edges: Vec<(usize, usize)>,
    k: usize,
}

impl GraphInstance {
    /// Builds an instance, dropping duplicate edges.
    ///
    /// `k = 0` is accepted; such an instance is colorable only when it has
    /// no vertices.
    ///
    /// # Errors
    ///
    /// Self-loops and endpoints outside `0..vertex_count`.
    pub fn new(
        vertex_count: usize,
        edges: impl IntoIterator<Item = (usize, usize)>,
        k: usize,
    ) -> Result<Self, ValidationError> {
        let mut seen = FxHashSet::default();
        let mut normalized = Vec::new();

        for (u, v) in edges {
            if u >= vertex_count || v >= vertex_count {
                return Err(ValidationError::VertexOutOfRange { u, v, vertex_count });
            }
            if u == v {
                return Err(ValidationError::SelfLoop(u));
            }
            let edge = (u.min(v), u.max(v));
            if seen.insert(edge) {
                normalized.push(edge);
            }
        }

        Ok(Self {
            vertex_count,
            edges: normalized,
            k,
        })
    }

    /// Number of vertices.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Distinct edges as `(min, max)` pairs.
    #[must_use]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of available colors.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    /// Adjacency lists, neighbours in ascending order.
    #[must_use]
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.vertex_count];
        for &(u, v) in &self.edges {
            adjacency[u].push(v);
            adjacency[v].push(u);
        }
        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
        }
        adjacency
    }

    /// Whether `coloring` colors every vertex with one of the `k` colors and
    /// no edge joins two vertices of the same color.
    #[must_use]
    pub fn is_proper(&self, coloring: &Coloring) -> bool {
        coloring.len() == self.vertex_count
            && coloring.iter().all(|c| c < self.k)
            && self.edges.iter().all(|&(u, v)| coloring[u] != coloring[v])
    }
}

/// One color per vertex, indexed by vertex.
///
/// Best-case results may carry a prefix covering only the first vertices.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Coloring(Vec<usize>);

impl Coloring {
    /// Number of colored vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Colors in vertex order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Number of distinct colors used.
    #[must_use]
    pub fn colors_used(&self) -> usize {
        self.0.iter().unique().count()
    }
}

impl std::ops::Index<usize> for Coloring {
    type Output = usize;

    fn index(&self, vertex: usize) -> &Self::Output {
        &self.0[vertex]
    }
}

impl From<Vec<usize>> for Coloring {
    fn from(colors: Vec<usize>) -> Self {
        Self(colors)
    }
}

impl Display for Coloring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

impl Witness for Coloring {
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
