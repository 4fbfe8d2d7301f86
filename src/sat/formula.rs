//! CNF formulas and truth assignments.

use crate::error::ValidationError;
use crate::search::Witness;
use bit_vec::BitVec;
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::{self, Display};

/// A disjunction of non-zero literals; `v` is variable `v`, `-v` its negation.
pub type Clause = SmallVec<[i32; 8]>;

/// The variable a literal refers to.
#[must_use]
pub const fn variable_of(literal: i32) -> usize {
    literal.unsigned_abs() as usize
}

/// A CNF formula over the variables `1..=variable_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SatInstance {
    variable_count: usize,
    clauses: Vec<Clause>,
}

impl SatInstance {
    /// Builds a formula, rejecting zero literals and literals outside
    /// `1..=variable_count`.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn new<I, C>(variable_count: usize, clauses: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = i32>,
    {
        let clauses = clauses
            .into_iter()
            .map(|clause| clause.into_iter().collect::<Clause>())
            .collect_vec();

        for &literal in clauses.iter().flatten() {
            if literal == 0 {
                return Err(ValidationError::ZeroLiteral);
            }
            if variable_of(literal) > variable_count {
                return Err(ValidationError::LiteralOutOfRange {
                    literal,
                    variable_count,
                });
            }
        }

        Ok(Self {
            variable_count,
            clauses,
        })
    }

    /// Number of declared variables.
    #[must_use]
    pub const fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// The clauses, in input order.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Number of clauses.
    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Whether every clause has a literal that is true under `assignment`.
    ///
    /// Variables the assignment does not cover make their literals false.
    #[must_use]
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.clauses.iter().all(|clause| {
            clause
                .iter()
                .any(|&lit| assignment.literal_value(lit) == Some(true))
        })
    }
}

/// A truth assignment; bit `i` holds the value of variable `i + 1`.
///
/// The empty assignment is the witness of unsatisfiable results.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Assignment(BitVec);

impl Assignment {
    /// Assignment giving every one of `variable_count` variables `value`.
    #[must_use]
    pub fn uniform(variable_count: usize, value: bool) -> Self {
        Self(BitVec::from_elem(variable_count, value))
    }

    /// Number of variables covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Value of `variable` (one-based), if covered.
    #[must_use]
    pub fn value(&self, variable: usize) -> Option<bool> {
        variable.checked_sub(1).and_then(|i| self.0.get(i))
    }

    /// Truth value of a literal, if its variable is covered.
    #[must_use]
    pub fn literal_value(&self, literal: i32) -> Option<bool> {
        self.value(variable_of(literal))
            .map(|value| if literal > 0 { value } else { !value })
    }

    /// Sets `variable` (one-based) to `value`.
    ///
    /// # Panics
    ///
    /// If the variable is not covered by the assignment.
    pub fn set(&mut self, variable: usize, value: bool) {
        self.0.set(variable - 1, value);
    }

    /// Iterates `(variable, value)` pairs in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.0.iter().enumerate().map(|(i, value)| (i + 1, value))
    }
}

impl From<BitVec> for Assignment {
    fn from(bits: BitVec) -> Self {
        Self(bits)
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter().format_with(", ", |(var, value), g| {
                g(&format_args!("{var}: {}", if value { "True" } else { "False" }))
            })
        )
    }
}

impl Witness for Assignment {
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_literal() {
        let err = SatInstance::new(2, [vec![1, 0]]).unwrap_err();
        assert_eq!(err, ValidationError::ZeroLiteral);
    }

    #[test]
    fn test_new_rejects_out_of_range_literal() {
        let err = SatInstance::new(2, [vec![1, 2], vec![-3]]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::LiteralOutOfRange {
                literal: -3,
                variable_count: 2
            }
        );
    }

    #[test]
    fn test_clauses_keep_order() {
        let formula = SatInstance::new(3, [vec![3, -1], vec![2]]).unwrap();
        assert_eq!(formula.clause_count(), 2);
        assert_eq!(formula.clauses()[0].as_slice(), &[3, -1]);
        assert_eq!(formula.clauses()[1].as_slice(), &[2]);
    }

    #[test]
    fn test_is_satisfied_by() {
        let formula = SatInstance::new(2, [vec![1, 2], vec![-1, -2]]).unwrap();
        let mut assignment = Assignment::uniform(2, false);
        assert!(!formula.is_satisfied_by(&assignment));
        assignment.set(1, true);
        assert!(formula.is_satisfied_by(&assignment));
        assignment.set(2, true);
        assert!(!formula.is_satisfied_by(&assignment));
    }

    #[test]
    fn test_uncovered_variables_falsify_literals() {
        let formula = SatInstance::new(2, [vec![-2]]).unwrap();
        assert!(!formula.is_satisfied_by(&Assignment::default()));
    }

    #[test]
    fn test_literal_value() {
        let mut assignment = Assignment::uniform(3, false);
        assignment.set(2, true);
        assert_eq!(assignment.literal_value(2), Some(true));
        assert_eq!(assignment.literal_value(-2), Some(false));
        assert_eq!(assignment.literal_value(-3), Some(true));
        assert_eq!(assignment.literal_value(4), None);
        assert_eq!(assignment.value(0), None);
    }

    #[test]
    fn test_display() {
        let mut assignment = Assignment::uniform(3, false);
        assignment.set(1, true);
        assert_eq!(assignment.to_string(), "{1: True, 2: False, 3: False}");
        assert_eq!(Assignment::default().to_string(), "{}");
    }
}
