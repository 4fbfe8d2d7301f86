//! Strategy dispatch shared by all problem domains.
//!
//! Every domain offers the same four strategies behind the [`Problem`]
//! trait. A strategy is a single depth-first traversal (or enumeration) of
//! the domain's search space that ends either in a success carrying a
//! witness, or in exhaustion of the root's alternatives.
//!
//! ```
//! use np_search::knapsack::KnapsackInstance;
//! use np_search::search::{Problem, Strategy};
//!
//! let instance = KnapsackInstance::new(6, [(1, 5), (4, 2)]).unwrap();
//! let result = instance.solve(Strategy::Backtracking);
//! assert!(result.feasible);
//! assert!(instance.verify(&result.witness));
//! ```

use clap::ValueEnum;
use std::fmt::{self, Debug, Display};

/// The four interchangeable search strategies.
///
/// The declaration order is the order in which the orchestrator runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Strategy {
    /// Full enumeration of the candidate space.
    #[value(alias = "brute_force")]
    BruteForce,
    /// Depth-first search that abandons a branch as soon as it is violated.
    #[value(alias = "btracking")]
    Backtracking,
    /// A deliberately weaker heuristic; may miss solutions.
    Simple,
    /// Branch-and-bound that reports its best partial solution on failure.
    #[value(alias = "best_case")]
    BestCase,
}

impl Strategy {
    /// All strategies, in run order.
    pub const ALL: [Self; 4] = [
        Self::BruteForce,
        Self::Backtracking,
        Self::Simple,
        Self::BestCase,
    ];

    /// Label written in the `method` column of result tables.
    #[must_use]
    pub const fn method_label(self) -> &'static str {
        match self {
            Self::BruteForce => "BruteForce",
            Self::Backtracking => "BackTracking",
            Self::Simple => "Simple",
            Self::BestCase => "BestCase",
        }
    }

    /// Short name used in configuration records and result file names.
    #[must_use]
    pub const fn config_name(self) -> &'static str {
        match self {
            Self::BruteForce => "brute_force",
            Self::Backtracking => "btracking",
            Self::Simple => "simple",
            Self::BestCase => "best_case",
        }
    }

    /// Human readable name used in configuration records.
    #[must_use]
    pub const fn config_value(self) -> &'static str {
        match self {
            Self::BruteForce => "Brute Force",
            Self::Backtracking => "Backtracking",
            Self::Simple => "Simple",
            Self::BestCase => "Best Case",
        }
    }

    /// Looks a strategy up by its configuration value (e.g. `"Best Case"`).
    #[must_use]
    pub fn from_config_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.config_value() == value)
    }

    /// Whether a negative answer from this strategy is conclusive.
    ///
    /// The simple strategies are heuristics and may report infeasible for
    /// instances that have a solution.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        !matches!(self, Self::Simple)
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_label())
    }
}

/// The problem domains the harness can solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Domain {
    /// Boolean satisfiability of CNF formulas.
    Sat,
    /// Bounded subset-sum over a coin multiset.
    #[value(alias = "bin_packing")]
    Knapsack,
    /// k-coloring of an undirected graph.
    #[value(alias = "graph_coloring")]
    Coloring,
}

impl Domain {
    /// All supported domains.
    pub const ALL: [Self; 3] = [Self::Sat, Self::Knapsack, Self::Coloring];

    /// Short name used in configuration records.
    #[must_use]
    pub const fn config_name(self) -> &'static str {
        match self {
            Self::Sat => "sat",
            Self::Knapsack => "bin_packing",
            Self::Coloring => "graph_coloring",
        }
    }

    /// Human readable name used in configuration records.
    #[must_use]
    pub const fn config_value(self) -> &'static str {
        match self {
            Self::Sat => "SAT",
            Self::Knapsack => "Bin Packing - the Knapsack Problem",
            Self::Coloring => "Graph Coloring",
        }
    }

    /// Looks a domain up by its configuration value.
    #[must_use]
    pub fn from_config_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.config_value() == value)
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_value())
    }
}

/// A domain-specific candidate solution.
///
/// `Default` is the empty witness reported alongside infeasible results, and
/// `Display` is the deterministic rendering written to result tables.
pub trait Witness: Debug + Display + Clone + Default + PartialEq {
    /// Whether this is the empty witness.
    fn is_empty(&self) -> bool;
}

/// Outcome of one strategy call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<W> {
    /// Whether an exact solution was found.
    pub feasible: bool,
    /// The solution when feasible; empty or a best partial solution otherwise.
    pub witness: W,
    /// Candidates examined or recursive calls made.
    pub nodes: u64,
}

impl<W: Default> SearchResult<W> {
    /// A successful search.
    #[must_use]
    pub const fn found(witness: W, nodes: u64) -> Self {
        Self {
            feasible: true,
            witness,
            nodes,
        }
    }

    /// A search that ran out of alternatives without a witness.
    #[must_use]
    pub fn exhausted(nodes: u64) -> Self {
        Self {
            feasible: false,
            witness: W::default(),
            nodes,
        }
    }

    /// A failed search that still reports its best partial solution.
    #[must_use]
    pub const fn partial(incumbent: W, nodes: u64) -> Self {
        Self {
            feasible: false,
            witness: incumbent,
            nodes,
        }
    }
}

/// One problem instance together with the four strategies that solve it.
pub trait Problem {
    /// The candidate solution type of this domain.
    type Witness: Witness;

    /// The domain this instance belongs to.
    const DOMAIN: Domain;

    /// Enumerates the whole candidate space in a fixed order.
    fn brute_force(&self) -> SearchResult<Self::Witness>;

    /// Depth-first search with pruning.
    fn backtracking(&self) -> SearchResult<Self::Witness>;

    /// The domain's weaker heuristic.
    fn simple(&self) -> SearchResult<Self::Witness>;

    /// Branch-and-bound returning the incumbent on failure.
    fn best_case(&self) -> SearchResult<Self::Witness>;

    /// Checks a witness against the instance's validity predicate.
    fn verify(&self, witness: &Self::Witness) -> bool;

    /// Size columns written to result tables, in table order.
    fn size_metrics(&self) -> Vec<String>;

    /// Whether two witnesses are equally good answers for this instance.
    ///
    /// Used when comparing a best-case result against an expected one.
    fn same_objective(&self, found: &Self::Witness, expected: &Self::Witness) -> bool {
        found == expected
    }

    /// Runs the given strategy.
    fn solve(&self, strategy: Strategy) -> SearchResult<Self::Witness> {
        match strategy {
            Strategy::BruteForce => self.brute_force(),
            Strategy::Backtracking => self.backtracking(),
            Strategy::Simple => self.simple(),
            Strategy::BestCase => self.best_case(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_labels() {
        let labels: Vec<_> = Strategy::ALL.iter().map(|s| s.method_label()).collect();
        assert_eq!(labels, ["BruteForce", "BackTracking", "Simple", "BestCase"]);
        assert_eq!(Strategy::Backtracking.to_string(), "BackTracking");
    }

    #[test]
    fn test_strategy_config_roundtrip() {
        for strategy in Strategy::ALL {
            assert_eq!(
                Strategy::from_config_value(strategy.config_value()),
                Some(strategy)
            );
        }
        assert_eq!(Strategy::from_config_value("Greedy"), None);
    }

    #[test]
    fn test_domain_config_roundtrip() {
        for domain in Domain::ALL {
            assert_eq!(Domain::from_config_value(domain.config_value()), Some(domain));
        }
        assert_eq!(
            Domain::from_config_value("Hamiltonian Path/Cycle: Traveling Salesman Problems"),
            None
        );
    }

    #[test]
    fn test_only_simple_is_incomplete() {
        assert!(Strategy::BruteForce.is_complete());
        assert!(Strategy::Backtracking.is_complete());
        assert!(Strategy::BestCase.is_complete());
        assert!(!Strategy::Simple.is_complete());
    }

    #[test]
    fn test_value_enum_aliases() {
        assert_eq!(
            Strategy::from_str("btracking", true),
            Ok(Strategy::Backtracking)
        );
        assert_eq!(Strategy::from_str("best-case", true), Ok(Strategy::BestCase));
        assert_eq!(Domain::from_str("bin_packing", true), Ok(Domain::Knapsack));
    }
}
