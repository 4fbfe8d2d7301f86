//! Choose coins from a multiset, each denomination at most as often as it is
//! available, so that they add up to a target.

pub mod coins;
pub mod strategies;

pub use coins::{Coin, CoinUsage, KnapsackInstance};
