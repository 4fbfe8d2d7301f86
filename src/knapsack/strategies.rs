//! Search strategies for bounded subset-sum.
//!
//! The three exhaustive strategies share one recursion: at each call every
//! coin that still has stock is tried once, in instance order, against the
//! remaining target. They differ only in what they cut:
//!
//! | strategy         | overshoot handling                               |
//! |------------------|--------------------------------------------------|
//! | [`brute_force`]  | none, the subtree is walked until stock runs out |
//! | [`backtracking`] | a call with a negative remainder fails at once   |
//! | [`best_case`]    | children that would overshoot are never entered  |
//!
//! [`best_case`] also keeps the best sum below the target as an incumbent
//! and returns it when the target is unreachable.

use crate::knapsack::coins::{Coin, CoinUsage, KnapsackInstance};
use crate::search::{Domain, Problem, SearchResult};
use itertools::Itertools;

/// Tries every combination reachable by adding one coin at a time.
#[must_use]
pub fn brute_force(instance: &KnapsackInstance) -> SearchResult<CoinUsage> {
    if instance.target() < 0 {
        return SearchResult::exhausted(1);
    }
    CoinSearch::new(instance).exhaustive(false)
}

/// The brute-force recursion, abandoning a branch once it overshoots.
#[must_use]
pub fn backtracking(instance: &KnapsackInstance) -> SearchResult<CoinUsage> {
    CoinSearch::new(instance).exhaustive(true)
}

/// Branch and bound. On failure the witness is the first usage found with the
/// largest sum not above the target.
#[must_use]
pub fn best_case(instance: &KnapsackInstance) -> SearchResult<CoinUsage> {
    best_case_with_trace(instance).0
}

/// [`best_case`], plus the incumbent sum after each improvement.
///
/// # Returns
///
/// The search result and a strictly increasing list of sums, none of which
/// exceeds the target.
#[must_use]
pub fn best_case_with_trace(instance: &KnapsackInstance) -> (SearchResult<CoinUsage>, Vec<i64>) {
    let mut search = CoinSearch::new(instance);
    let found = search.bounded(instance.target(), 0);

    let result = if found {
        SearchResult::found(search.usage(), search.nodes)
    } else {
        SearchResult::partial(
            CoinUsage::from_counts(search.coins, &search.incumbent),
            search.nodes,
        )
    };
    (result, search.trace)
}

/// Recursion state for one solve call.
struct CoinSearch<'a> {
    coins: &'a [Coin],
    target: i64,
    /// Coins of `coins[i]` currently in use.
    used: Vec<usize>,
    incumbent: Vec<usize>,
    incumbent_sum: i64,
    trace: Vec<i64>,
    nodes: u64,
}

impl<'a> CoinSearch<'a> {
    fn new(instance: &'a KnapsackInstance) -> Self {
        let coins = instance.coins();
        Self {
            coins,
            target: instance.target(),
            used: vec![0; coins.len()],
            incumbent: vec![0; coins.len()],
            incumbent_sum: 0,
            trace: Vec::new(),
            nodes: 0,
        }
    }

    fn usage(&self) -> CoinUsage {
        CoinUsage::from_counts(self.coins, &self.used)
    }

    fn exhaustive(mut self, prune_overshoot: bool) -> SearchResult<CoinUsage> {
        if self.descend(self.target, prune_overshoot) {
            SearchResult::found(self.usage(), self.nodes)
        } else {
            SearchResult::exhausted(self.nodes)
        }
    }

    fn descend(&mut self, remaining: i64, prune_overshoot: bool) -> bool {
        self.nodes += 1;
        if remaining == 0 {
            return true;
        }
        if prune_overshoot && remaining < 0 {
            return false;
        }

        for i in 0..self.coins.len() {
            if self.used[i] >= self.coins[i].count {
                continue;
            }
            self.used[i] += 1;
            if self.descend(remaining - self.coins[i].denomination, prune_overshoot) {
                return true;
            }
            self.used[i] -= 1;
        }
        false
    }

    fn bounded(&mut self, remaining: i64, sum: i64) -> bool {
        self.nodes += 1;
        if sum > self.incumbent_sum {
            self.incumbent.clone_from(&self.used);
            self.incumbent_sum = sum;
            self.trace.push(sum);
        }
        if remaining == 0 {
            return true;
        }

        for i in 0..self.coins.len() {
            let denomination = self.coins[i].denomination;
            if self.used[i] >= self.coins[i].count || remaining - denomination < 0 {
                continue;
            }
            self.used[i] += 1;
            if self.bounded(remaining - denomination, sum + denomination) {
                return true;
            }
            self.used[i] -= 1;
        }
        false
    }
}

/// Greedy change-making: largest denomination first, as many coins of each
/// as fit. Misses targets that need a smaller coin in place of a larger one.
#[must_use]
pub fn simple(instance: &KnapsackInstance) -> SearchResult<CoinUsage> {
    let coins = instance.coins();
    let mut remaining = instance.target();
    if remaining < 0 {
        return SearchResult::exhausted(1);
    }

    let mut used = vec![0; coins.len()];
    let mut nodes = 1;
    for i in (0..coins.len()).sorted_by_key(|&i| std::cmp::Reverse(coins[i].denomination)) {
        nodes += 1;
        let coin = coins[i];
        let fit = usize::try_from(remaining / coin.denomination).unwrap_or(0);
        let take = fit.min(coin.count);
        used[i] = take;
        remaining -= coin.denomination * take as i64;
    }

    if remaining == 0 {
        SearchResult::found(CoinUsage::from_counts(coins, &used), nodes)
    } else {
        SearchResult::exhausted(nodes)
    }
}

impl Problem for KnapsackInstance {
    type Witness = CoinUsage;

    const DOMAIN: Domain = Domain::Knapsack;

    fn brute_force(&self) -> SearchResult<CoinUsage> {
        brute_force(self)
    }

    fn backtracking(&self) -> SearchResult<CoinUsage> {
        backtracking(self)
    }

    fn simple(&self) -> SearchResult<CoinUsage> {
        simple(self)
    }

    fn best_case(&self) -> SearchResult<CoinUsage> {
        best_case(self)
    }

    fn verify(&self, witness: &CoinUsage) -> bool {
        self.is_exact(witness)
    }

    fn size_metrics(&self) -> Vec<String> {
        vec![self.target().to_string(), self.coin_count().to_string()]
    }

    /// Usages are equally good when they reach the same sum.
    fn same_objective(&self, found: &CoinUsage, expected: &CoinUsage) -> bool {
        found.total() == expected.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Strategy;

    fn coins(target: i64, coins: &[(i64, i64)]) -> KnapsackInstance {
        KnapsackInstance::new(target, coins.iter().copied()).unwrap()
    }

    #[test]
    fn test_small_target_feasible_everywhere() {
        let instance = coins(6, &[(1, 5), (4, 2)]);
        for strategy in Strategy::ALL {
            let result = instance.solve(strategy);
            assert!(result.feasible, "{strategy}");
            assert!(instance.verify(&result.witness), "{strategy}");
        }
        assert_eq!(brute_force(&instance).witness.to_string(), "{1:2,4:1}");
    }

    #[test]
    fn test_eleven_uses_both_fours() {
        let instance = coins(11, &[(1, 5), (4, 2)]);
        let result = backtracking(&instance);
        assert!(result.feasible);
        assert_eq!(result.witness.to_string(), "{1:3,4:2}");
    }

    #[test]
    fn test_target_above_total_reports_everything() {
        let instance = coins(14, &[(1, 5), (4, 2)]);
        assert!(!brute_force(&instance).feasible);
        assert!(!backtracking(&instance).feasible);

        let result = best_case(&instance);
        assert!(!result.feasible);
        assert_eq!(result.witness.to_string(), "{1:5,4:2}");
        assert_eq!(result.witness.total(), 13);
        assert_eq!(brute_force(&instance).witness, CoinUsage::default());
    }

    #[test]
    fn test_best_case_closest_below_target() {
        let instance = coins(32, &[(3, 2), (11, 5)]);
        let result = best_case(&instance);
        assert!(!result.feasible);
        assert_eq!(result.witness.total(), 28);
        assert_eq!(result.witness.to_string(), "{3:2,11:2}");
    }

    #[test]
    fn test_best_case_trace_is_monotone() {
        let instance = coins(32, &[(3, 2), (11, 5)]);
        let (result, trace) = best_case_with_trace(&instance);
        assert!(!trace.is_empty());
        assert!(trace.iter().tuple_windows().all(|(a, b)| a < b));
        assert!(trace.iter().all(|&sum| sum <= instance.target()));
        assert_eq!(trace.last().copied(), Some(result.witness.total()));
    }

    #[test]
    fn test_zero_target_feasible_with_no_coins() {
        for instance in [coins(0, &[]), coins(0, &[(2, 3)])] {
            for strategy in Strategy::ALL {
                let result = instance.solve(strategy);
                assert!(result.feasible, "{strategy}");
                assert_eq!(result.witness.to_string(), "{}");
            }
        }
    }

    #[test]
    fn test_no_coins_nonzero_target() {
        let instance = coins(5, &[]);
        for strategy in Strategy::ALL {
            let result = instance.solve(strategy);
            assert!(!result.feasible, "{strategy}");
            assert_eq!(result.witness, CoinUsage::default());
        }
    }

    #[test]
    fn test_negative_target_infeasible() {
        let instance = coins(-4, &[(1, 3), (2, 2)]);
        for strategy in Strategy::ALL {
            let result = instance.solve(strategy);
            assert!(!result.feasible, "{strategy}");
            assert_eq!(result.witness, CoinUsage::default());
        }
    }

    #[test]
    fn test_backtracking_dominates_brute_force() {
        let instance = coins(14, &[(1, 5), (4, 2)]);
        let bt = backtracking(&instance);
        let bf = brute_force(&instance);
        assert!(bt.nodes <= bf.nodes);

        let overshooting = coins(7, &[(5, 2), (3, 2)]);
        let bt = backtracking(&overshooting);
        let bf = brute_force(&overshooting);
        assert!(!bt.feasible && !bf.feasible);
        assert!(bt.nodes < bf.nodes);
    }

    #[test]
    fn test_brute_force_and_backtracking_same_witness() {
        for target in 0..=15 {
            let instance = coins(target, &[(2, 3), (5, 1), (3, 2)]);
            let bt = backtracking(&instance);
            let bf = brute_force(&instance);
            assert_eq!(bt.feasible, bf.feasible, "target {target}");
            assert_eq!(bt.witness, bf.witness, "target {target}");
        }
    }

    #[test]
    fn test_simple_greedy_false_negative() {
        let instance = coins(6, &[(4, 1), (3, 2)]);
        assert!(!simple(&instance).feasible);
        let exact = backtracking(&instance);
        assert!(exact.feasible);
        assert_eq!(exact.witness.to_string(), "{3:2}");
    }

    #[test]
    fn test_simple_takes_largest_first() {
        let instance = coins(16, &[(3, 3), (5, 2), (11, 1)]);
        let result = simple(&instance);
        assert!(result.feasible);
        assert_eq!(result.witness.to_string(), "{5:1,11:1}");

        // 11 + 5 leaves 1, although 11 + 3 + 3 would have worked.
        assert!(!simple(&coins(17, &[(3, 3), (5, 2), (11, 1)])).feasible);
    }

    #[test]
    fn test_same_objective_compares_sums() {
        let instance = coins(10, &[(1, 10), (5, 2)]);
        let a: CoinUsage = [(5, 2)].into_iter().collect();
        let b: CoinUsage = [(1, 5), (5, 1)].into_iter().collect();
        assert!(instance.same_objective(&a, &b));
    }

    #[test]
    fn test_size_metrics() {
        assert_eq!(coins(17, &[(3, 3), (5, 2)]).size_metrics(), ["17", "5"]);
    }
}
