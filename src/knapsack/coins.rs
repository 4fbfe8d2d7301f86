//! Coin multisets and coin usages.

use crate::error::ValidationError;
use crate::search::Witness;
use itertools::Itertools;
use std::fmt::{self, Display};

/// A denomination and how many coins of it are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coin {
    /// Value of one coin; always positive.
    pub denomination: i64,
    /// Coins of this value available.
    pub count: usize,
}

/// A bounded subset-sum instance: reach `target` exactly using at most
/// `count` coins of each denomination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnapsackInstance {
    target: i64,
    /// In the order the denominations were given; every strategy
    /// enumerates coins in this order.
    coins: Vec<Coin>,
}

impl KnapsackInstance {
    /// Builds an instance from `(denomination, count)` pairs.
    ///
    /// A negative `target` is accepted and is simply infeasible.
    ///
    /// # Errors
    ///
    /// Non-positive denominations, negative counts and denominations given
    /// more than once.
    pub fn new(
        target: i64,
        coins: impl IntoIterator<Item = (i64, i64)>,
    ) -> Result<Self, ValidationError> {
        let mut validated: Vec<Coin> = Vec::new();
        for (denomination, count) in coins {
            if denomination <= 0 {
                return Err(ValidationError::NonPositiveDenomination(denomination));
            }
            let Ok(count) = usize::try_from(count) else {
                return Err(ValidationError::NegativeCount {
                    denomination,
                    count,
                });
            };
            if validated.iter().any(|c| c.denomination == denomination) {
                return Err(ValidationError::DuplicateDenomination(denomination));
            }
            validated.push(Coin {
                denomination,
                count,
            });
        }

        Ok(Self {
            target,
            coins: validated,
        })
    }

    /// The sum to reach.
    #[must_use]
    pub const fn target(&self) -> i64 {
        self.target
    }

    /// Available coins in enumeration order.
    #[must_use]
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Total number of coins across all denominations.
    #[must_use]
    pub fn coin_count(&self) -> usize {
        self.coins.iter().map(|c| c.count).sum()
    }

    /// Whether `usage` only draws available coins and sums to the target.
    #[must_use]
    pub fn is_exact(&self, usage: &CoinUsage) -> bool {
        self.is_within_stock(usage) && usage.total() == self.target
    }

    /// Whether every denomination in `usage` exists with enough coins.
    #[must_use]
    pub fn is_within_stock(&self, usage: &CoinUsage) -> bool {
        usage.iter().all(|(denomination, used)| {
            self.coins
                .iter()
                .any(|c| c.denomination == denomination && used <= c.count)
        })
    }
}

/// How many coins of each denomination a solution uses, in instance order.
/// Denominations with zero coins used are left out.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct CoinUsage(Vec<(i64, usize)>);

impl CoinUsage {
    /// Pairs `coins[i]` with `used[i]`, skipping unused denominations.
    #[must_use]
    pub fn from_counts(coins: &[Coin], used: &[usize]) -> Self {
        coins
            .iter()
            .zip(used)
            .map(|(coin, &n)| (coin.denomination, n))
            .collect()
    }

    /// Value of all coins used.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.0
            .iter()
            .map(|&(denomination, used)| denomination * used as i64)
            .sum()
    }

    /// Coins of `denomination` used.
    #[must_use]
    pub fn count(&self, denomination: i64) -> usize {
        self.0
            .iter()
            .find(|&&(d, _)| d == denomination)
            .map_or(0, |&(_, used)| used)
    }

    /// `(denomination, used)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (i64, usize)> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<(i64, usize)> for CoinUsage {
    fn from_iter<T: IntoIterator<Item = (i64, usize)>>(iter: T) -> Self {
        Self(iter.into_iter().filter(|&(_, used)| used > 0).collect())
    }
}

impl Display for CoinUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.0
                .iter()
                .format_with(",", |(d, used), g| g(&format_args!("{d}:{used}")))
        )
    }
}

impl Witness for CoinUsage {
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_input_order() {
        let instance = KnapsackInstance::new(17, [(3, 3), (5, 2), (11, 1)]).unwrap();
        let denominations: Vec<_> = instance.coins().iter().map(|c| c.denomination).collect();
        assert_eq!(denominations, [3, 5, 11]);
        assert_eq!(instance.coin_count(), 6);
        assert_eq!(instance.target(), 17);
    }

    #[test]
    fn test_new_rejects_invalid_coins() {
        assert_eq!(
            KnapsackInstance::new(5, [(0, 1)]).unwrap_err(),
            ValidationError::NonPositiveDenomination(0)
        );
        assert_eq!(
            KnapsackInstance::new(5, [(2, -1)]).unwrap_err(),
            ValidationError::NegativeCount {
                denomination: 2,
                count: -1
            }
        );
        assert_eq!(
            KnapsackInstance::new(5, [(2, 1), (3, 1), (2, 4)]).unwrap_err(),
            ValidationError::DuplicateDenomination(2)
        );
    }

    #[test]
    fn test_negative_target_is_valid() {
        assert!(KnapsackInstance::new(-3, [(1, 1)]).is_ok());
    }

    #[test]
    fn test_usage_omits_zero_counts() {
        let instance = KnapsackInstance::new(8, [(3, 2), (4, 1), (5, 1)]).unwrap();
        let usage = CoinUsage::from_counts(instance.coins(), &[1, 0, 1]);
        assert_eq!(usage.to_string(), "{3:1,5:1}");
        assert_eq!(usage.total(), 8);
        assert_eq!(usage.count(4), 0);
        assert_eq!(usage.count(5), 1);
        assert!(instance.is_exact(&usage));
    }

    #[test]
    fn test_is_exact_checks_stock() {
        let instance = KnapsackInstance::new(6, [(3, 1), (6, 1)]).unwrap();
        let overdrawn: CoinUsage = [(3, 2)].into_iter().collect();
        assert_eq!(overdrawn.total(), 6);
        assert!(!instance.is_exact(&overdrawn));

        let unknown: CoinUsage = [(2, 3)].into_iter().collect();
        assert!(!instance.is_exact(&unknown));
    }

    #[test]
    fn test_empty_usage() {
        let usage = CoinUsage::default();
        assert_eq!(usage.to_string(), "{}");
        assert_eq!(usage.total(), 0);
        assert!(Witness::is_empty(&usage));
    }
}
