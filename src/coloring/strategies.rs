//! Search strategies for graph k-coloring.
//!
//! The exhaustive strategies fix vertex order `0..n`. [`brute_force`] walks
//! the `k^n` color sequences lexicographically with vertex 0 varying
//! slowest, [`backtracking`] extends a proper prefix one vertex at a time and
//! [`best_case`] walks the same tree while remembering the longest proper
//! prefix it reached, which it reports when no full coloring exists.
//! [`simple`] is the Welsh–Powell greedy heuristic and can fail on colorable
//! graphs.

use crate::coloring::graph::{Coloring, GraphInstance};
use crate::search::{Domain, Problem, SearchResult};
use itertools::Itertools;

/// Enumerates every color sequence and returns the first proper one.
#[must_use]
pub fn brute_force(instance: &GraphInstance) -> SearchResult<Coloring> {
    let n = instance.vertex_count();
    let k = instance.k();
    if n == 0 {
        return SearchResult::found(Coloring::default(), 1);
    }
    if k == 0 {
        return SearchResult::exhausted(0);
    }

    let mut colors = vec![0; n];
    let mut nodes = 0;
    loop {
        nodes += 1;
        if instance
            .edges()
            .iter()
            .all(|&(u, v)| colors[u] != colors[v])
        {
            return SearchResult::found(Coloring::from(colors), nodes);
        }
        if !advance(&mut colors, k) {
            return SearchResult::exhausted(nodes);
        }
    }
}

/// Moves to the next sequence in base `k`, last vertex fastest. Returns
/// `false` after the last sequence.
fn advance(colors: &mut [usize], k: usize) -> bool {
    for color in colors.iter_mut().rev() {
        *color += 1;
        if *color < k {
            return true;
        }
        *color = 0;
    }
    false
}

/// Colors vertices in index order, checking only edges back to already
/// colored vertices.
#[must_use]
pub fn backtracking(instance: &GraphInstance) -> SearchResult<Coloring> {
    let mut search = PrefixSearch::new(instance, false);
    if search.extend(0) {
        SearchResult::found(Coloring::from(search.colors), search.nodes)
    } else {
        SearchResult::exhausted(search.nodes)
    }
}

/// The backtracking tree, node for node. On failure the witness is the
/// longest proper prefix coloring found, first found on ties.
#[must_use]
pub fn best_case(instance: &GraphInstance) -> SearchResult<Coloring> {
    let mut search = PrefixSearch::new(instance, true);
    if search.extend(0) {
        SearchResult::found(Coloring::from(search.colors), search.nodes)
    } else {
        SearchResult::partial(Coloring::from(search.incumbent), search.nodes)
    }
}

/// Depth-first state shared by [`backtracking`] and [`best_case`].
struct PrefixSearch<'a> {
    instance: &'a GraphInstance,
    /// `earlier[i]`: neighbours of `i` with a smaller index.
    earlier: Vec<Vec<usize>>,
    /// Colors of the vertices `0..colors.len()`.
    colors: Vec<usize>,
    /// Longest proper prefix seen so far.
    incumbent: Vec<usize>,
    /// Whether `incumbent` is maintained.
    keep_incumbent: bool,
    nodes: u64,
}

impl<'a> PrefixSearch<'a> {
    fn new(instance: &'a GraphInstance, keep_incumbent: bool) -> Self {
        let earlier = instance
            .adjacency()
            .into_iter()
            .enumerate()
            .map(|(i, neighbours)| neighbours.into_iter().filter(|&j| j < i).collect())
            .collect();

        Self {
            instance,
            earlier,
            colors: Vec::with_capacity(instance.vertex_count()),
            incumbent: Vec::new(),
            keep_incumbent,
            nodes: 0,
        }
    }

    /// Tries to extend the proper prefix `colors[..vertex]` to a full coloring.
    fn extend(&mut self, vertex: usize) -> bool {
        self.nodes += 1;
        if self.keep_incumbent && self.colors.len() > self.incumbent.len() {
            self.incumbent.clone_from(&self.colors);
        }
        if vertex == self.instance.vertex_count() {
            return true;
        }

        for color in 0..self.instance.k() {
            if self.earlier[vertex].iter().any(|&j| self.colors[j] == color) {
                continue;
            }
            self.colors.push(color);
            if self.extend(vertex + 1) {
                return true;
            }
            self.colors.pop();
        }
        false
    }
}

/// Welsh–Powell: visit vertices by descending degree (ties by index) and give
/// each the smallest color its colored neighbours do not use. Fails when more
/// than `k` colors would be needed.
#[must_use]
pub fn simple(instance: &GraphInstance) -> SearchResult<Coloring> {
    let adjacency = instance.adjacency();
    let order = (0..instance.vertex_count())
        .sorted_by_key(|&v| std::cmp::Reverse(adjacency[v].len()))
        .collect_vec();

    let mut colors: Vec<Option<usize>> = vec![None; instance.vertex_count()];
    let mut nodes = 0;
    for v in order {
        nodes += 1;
        let taken = adjacency[v].iter().filter_map(|&u| colors[u]).collect_vec();
        let color = (0..).find(|c| !taken.contains(c)).unwrap_or(0);
        if color >= instance.k() {
            return SearchResult::exhausted(nodes);
        }
        colors[v] = Some(color);
    }

    let coloring = colors.into_iter().map(|c| c.unwrap_or(0)).collect_vec();
    SearchResult::found(Coloring::from(coloring), nodes)
}

impl Problem for GraphInstance {
    type Witness = Coloring;

    const DOMAIN: Domain = Domain::Coloring;

    fn brute_force(&self) -> SearchResult<Coloring> {
        brute_force(self)
    }

    fn backtracking(&self) -> SearchResult<Coloring> {
        backtracking(self)
    }

    fn simple(&self) -> SearchResult<Coloring> {
        simple(self)
    }

    fn best_case(&self) -> SearchResult<Coloring> {
        best_case(self)
    }

    fn verify(&self, witness: &Coloring) -> bool {
        self.is_proper(witness)
    }

    fn size_metrics(&self) -> Vec<String> {
        vec![
            self.vertex_count().to_string(),
            self.edge_count().to_string(),
            self.k().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Strategy;

    /// Triangle 0-1-2 with vertex 3 attached to 1 and 2.
    fn diamond(k: usize) -> GraphInstance {
        GraphInstance::new(4, [(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)], k).unwrap()
    }

    #[test]
    fn test_diamond_needs_three_colors() {
        for strategy in [Strategy::BruteForce, Strategy::Backtracking, Strategy::BestCase] {
            assert!(!diamond(2).solve(strategy).feasible, "{strategy}");
            let result = diamond(3).solve(strategy);
            assert!(result.feasible, "{strategy}");
            assert!(diamond(3).verify(&result.witness), "{strategy}");
        }
    }

    #[test]
    fn test_brute_force_returns_lexicographically_first() {
        let result = brute_force(&diamond(3));
        assert_eq!(result.witness.to_string(), "[0, 1, 2, 0]");
    }

    #[test]
    fn test_backtracking_matches_brute_force_witness() {
        // Both explore colors in the same lexicographic order.
        assert_eq!(
            backtracking(&diamond(3)).witness,
            brute_force(&diamond(3)).witness
        );
    }

    #[test]
    fn test_backtracking_visits_fewer_nodes() {
        let path = GraphInstance::new(6, (0..5).map(|i| (i, i + 1)), 2).unwrap();
        let bt = backtracking(&path);
        let bf = brute_force(&path);
        assert!(bt.feasible && bf.feasible);
        assert!(bt.nodes < bf.nodes);
    }

    #[test]
    fn test_zero_vertices_always_colorable() {
        let empty = GraphInstance::new(0, [], 0).unwrap();
        for strategy in Strategy::ALL {
            let result = empty.solve(strategy);
            assert!(result.feasible, "{strategy}");
            assert_eq!(result.witness, Coloring::default());
        }
    }

    #[test]
    fn test_zero_colors_infeasible() {
        let single = GraphInstance::new(1, [], 0).unwrap();
        assert!(!brute_force(&single).feasible);
        assert!(!backtracking(&single).feasible);
        assert!(!best_case(&single).feasible);
        assert!(!simple(&single).feasible);
    }

    #[test]
    fn test_best_case_reports_longest_prefix() {
        let result = best_case(&diamond(2));
        assert!(!result.feasible);
        // 0 and 1 can be colored; the triangle closes at vertex 2.
        assert_eq!(result.witness, Coloring::from(vec![0, 1]));
    }

    #[test]
    fn test_best_case_walks_the_backtracking_tree() {
        let k4 = GraphInstance::new(
            4,
            [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
            3,
        )
        .unwrap();
        let bt = backtracking(&k4);
        let bc = best_case(&k4);
        assert!(!bt.feasible && !bc.feasible);
        assert_eq!(bc.nodes, bt.nodes);
        assert_eq!(bt.witness, Coloring::default());
        assert_eq!(bc.witness, Coloring::from(vec![0, 1, 2]));

        for k in 2..=3 {
            let bt = backtracking(&diamond(k));
            let bc = best_case(&diamond(k));
            assert_eq!(bc.nodes, bt.nodes);
            assert_eq!(bc.feasible, bt.feasible);
        }
    }

    #[test]
    fn test_simple_greedy() {
        let star = GraphInstance::new(4, [(0, 1), (0, 2), (0, 3)], 2).unwrap();
        let result = simple(&star);
        assert!(result.feasible);
        assert_eq!(result.witness.to_string(), "[0, 1, 1, 1]");
        assert_eq!(result.witness.colors_used(), 2);
    }

    #[test]
    fn test_simple_can_miss_colorings() {
        // The 6-cycle 0-3-4-1-2-5 is bipartite, but index order among equal
        // degrees colors 0 and 1 alike and strands vertex 4.
        let cycle = GraphInstance::new(
            6,
            [(0, 3), (0, 5), (1, 2), (1, 4), (2, 5), (3, 4)],
            2,
        )
        .unwrap();
        assert!(backtracking(&cycle).feasible);
        assert!(!simple(&cycle).feasible);
    }

    #[test]
    fn test_size_metrics() {
        assert_eq!(diamond(3).size_metrics(), ["4", "5", "3"]);
    }
}
