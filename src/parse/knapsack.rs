//! Coin instances: `p knap <rows>` followed by `value count` rows. The header
//! parameter is the target.

use crate::error::{ParseError, ValidationError};
use crate::knapsack::{CoinUsage, KnapsackInstance};
use crate::parse::{fields, number, Header, InstanceFormat, Lines};
use itertools::Itertools;

impl InstanceFormat for KnapsackInstance {
    /// A row with a single value stands for one coin. Rows repeating a
    /// denomination add to its count; every row's count must be
    /// non-negative on its own.
    fn read_instance(header: &Header, lines: &mut Lines) -> Result<Self, ParseError> {
        let target: i64 = header.required_parameter("instance header, missing target")?;
        let (line, params) = lines.problem_line(header, &["knap"], "p knap")?;
        let [rows] = params.as_slice() else {
            return Err(ParseError::Malformed {
                line,
                what: "problem line",
            });
        };
        let rows: usize = number(rows, line)?;

        let mut coins: Vec<(i64, i64)> = Vec::new();
        for _ in 0..rows {
            let Some((line, text)) = lines.body_line() else {
                break;
            };
            let (denomination, count): (i64, i64) = match fields(text).collect_vec().as_slice() {
                [value] => (number(value, line)?, 1),
                [value, count] => (number(value, line)?, number(count, line)?),
                _ => return Err(ParseError::Malformed { line, what: "coin row" }),
            };
            if count < 0 {
                return Err(ParseError::Invalid {
                    id: header.id.clone(),
                    source: ValidationError::NegativeCount {
                        denomination,
                        count,
                    },
                });
            }
            match coins.iter_mut().find(|(d, _)| *d == denomination) {
                Some((_, total)) => {
                    *total = total.checked_add(count).ok_or(ParseError::Malformed {
                        line,
                        what: "coin row, count overflows",
                    })?;
                }
                None => coins.push((denomination, count)),
            }
        }

        Self::new(target, coins).map_err(|source| ParseError::Invalid {
            id: header.id.clone(),
            source,
        })
    }

    /// Accepts `{value,count,...}` and `{value:count,...}`.
    fn expected_witness(token: &str, line: usize) -> Option<Result<CoinUsage, ParseError>> {
        let inner = token.strip_prefix('{')?.strip_suffix('}')?;
        let numbers = inner
            .split([',', ':'])
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| number::<i64>(t, line))
            .collect::<Result<Vec<_>, _>>();

        Some(numbers.and_then(|numbers| {
            if numbers.len() % 2 != 0 {
                return Err(ParseError::Malformed {
                    line,
                    what: "expected coin usage",
                });
            }
            numbers
                .into_iter()
                .tuples()
                .map(|(denomination, used)| {
                    usize::try_from(used)
                        .map(|used| (denomination, used))
                        .map_err(|_| ParseError::Malformed {
                            line,
                            what: "expected coin usage",
                        })
                })
                .collect()
        }))
    }
}
