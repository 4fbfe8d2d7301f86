//! Search strategies for CNF satisfiability.
//!
//! - [`brute_force`] walks every assignment as a binary counter.
//! - [`backtracking`] assigns variables in index order and checks a clause
//!   as soon as its highest variable is assigned, abandoning the branch when
//!   the clause is falsified.
//! - [`best_case`] explores the backtracking tree. SAT has no partial
//!   objective, so there is no incumbent to report on failure.
//! - [`simple`] is a WalkSAT-style local search with a fixed seed and a flip
//!   budget. It never reports a wrong model, but it gives up (and answers
//!   unsatisfiable) when the budget runs out.

use crate::sat::formula::{variable_of, Assignment, SatInstance};
use crate::search::{Domain, Problem, SearchResult};
use bit_vec::BitVec;

/// Seed of the local search in [`simple`]; fixed so runs are reproducible.
const WALK_SEED: u64 = 0x5EED_F5A7;

/// Flips allowed per variable before [`simple`] gives up.
const FLIPS_PER_VARIABLE: usize = 100;

/// Enumerates all `2^n` assignments in increasing integer encoding and
/// returns the first model.
#[must_use]
pub fn brute_force(instance: &SatInstance) -> SearchResult<Assignment> {
    let mut bits = BitVec::from_elem(instance.variable_count(), false);
    let mut nodes = 0;

    loop {
        nodes += 1;
        let satisfied = instance.clauses().iter().all(|clause| {
            clause
                .iter()
                .any(|&lit| bits[variable_of(lit) - 1] == (lit > 0))
        });
        if satisfied {
            return SearchResult::found(Assignment::from(bits), nodes);
        }
        if !increment(&mut bits) {
            return SearchResult::exhausted(nodes);
        }
    }
}

/// Adds one to the little-endian counter. Returns `false` on wrap-around.
fn increment(bits: &mut BitVec) -> bool {
    for i in 0..bits.len() {
        if bits[i] {
            bits.set(i, false);
        } else {
            bits.set(i, true);
            return true;
        }
    }
    false
}

/// Depth-first search over variables in index order, `false` before `true`.
#[must_use]
pub fn backtracking(instance: &SatInstance) -> SearchResult<Assignment> {
    Backtracker::new(instance).run()
}

/// Same search tree as [`backtracking`]; returns the first model or the
/// empty assignment.
#[must_use]
pub fn best_case(instance: &SatInstance) -> SearchResult<Assignment> {
    Backtracker::new(instance).run()
}

/// Chronological backtracking state for one solve call.
struct Backtracker<'a> {
    instance: &'a SatInstance,
    /// `closing[v]` lists the clauses whose highest variable is `v`; index 0
    /// holds the empty clauses.
    closing: Vec<Vec<usize>>,
    values: Assignment,
    nodes: u64,
}

impl<'a> Backtracker<'a> {
    fn new(instance: &'a SatInstance) -> Self {
        let n = instance.variable_count();
        let mut closing = vec![Vec::new(); n + 1];
        for (idx, clause) in instance.clauses().iter().enumerate() {
            let highest = clause.iter().map(|&l| variable_of(l)).max().unwrap_or(0);
            closing[highest].push(idx);
        }

        Self {
            instance,
            closing,
            values: Assignment::uniform(n, false),
            nodes: 0,
        }
    }

    fn run(mut self) -> SearchResult<Assignment> {
        if !self.closing[0].is_empty() {
            return SearchResult::exhausted(1);
        }
        if self.search(1) {
            SearchResult::found(self.values, self.nodes)
        } else {
            SearchResult::exhausted(self.nodes)
        }
    }

    fn search(&mut self, var: usize) -> bool {
        self.nodes += 1;
        if var > self.instance.variable_count() {
            return true;
        }

        for value in [false, true] {
            self.values.set(var, value);
            if self.closed_clauses_hold(var) && self.search(var + 1) {
                return true;
            }
        }
        false
    }

    /// Checks the clauses that became fully assigned with `var`.
    fn closed_clauses_hold(&self, var: usize) -> bool {
        self.closing[var].iter().all(|&idx| {
            self.instance.clauses()[idx]
                .iter()
                .any(|&lit| self.values.literal_value(lit) == Some(true))
        })
    }
}

/// Seeded WalkSAT: repeatedly picks an unsatisfied clause and flips either a
/// random variable of it or the one that leaves the fewest clauses
/// unsatisfied.
#[must_use]
pub fn simple(instance: &SatInstance) -> SearchResult<Assignment> {
    let clauses = instance.clauses();
    if clauses.iter().any(|clause| clause.is_empty()) {
        return SearchResult::exhausted(0);
    }

    let n = instance.variable_count();
    let mut rng = fastrand::Rng::with_seed(WALK_SEED);
    let mut values = Assignment::uniform(n, false);
    for var in 1..=n {
        values.set(var, rng.bool());
    }

    let budget = FLIPS_PER_VARIABLE * n.max(1);
    let mut nodes = 0;
    for _ in 0..=budget {
        nodes += 1;
        let unsatisfied = unsatisfied_clauses(instance, &values);
        if unsatisfied.is_empty() {
            return SearchResult::found(values, nodes);
        }

        let clause = &clauses[unsatisfied[rng.usize(..unsatisfied.len())]];
        let var = if rng.bool() {
            variable_of(clause[rng.usize(..clause.len())])
        } else {
            greediest_flip(instance, &mut values, clause.iter().map(|&l| variable_of(l)))
        };
        flip(&mut values, var);
    }

    SearchResult::exhausted(nodes)
}

fn unsatisfied_clauses(instance: &SatInstance, values: &Assignment) -> Vec<usize> {
    instance
        .clauses()
        .iter()
        .enumerate()
        .filter(|(_, clause)| {
            !clause
                .iter()
                .any(|&lit| values.literal_value(lit) == Some(true))
        })
        .map(|(idx, _)| idx)
        .collect()
}

fn flip(values: &mut Assignment, var: usize) {
    let current = values.value(var).unwrap_or(false);
    values.set(var, !current);
}

/// The candidate whose flip leaves the fewest unsatisfied clauses; the
/// first one wins ties. `values` is restored before returning.
fn greediest_flip(
    instance: &SatInstance,
    values: &mut Assignment,
    candidates: impl Iterator<Item = usize>,
) -> usize {
    let mut best = (usize::MAX, 0);
    for var in candidates {
        flip(values, var);
        let broken = unsatisfied_clauses(instance, values).len();
        flip(values, var);
        if broken < best.0 {
            best = (broken, var);
        }
    }
    best.1
}

impl Problem for SatInstance {
    type Witness = Assignment;

    const DOMAIN: Domain = Domain::Sat;

    fn brute_force(&self) -> SearchResult<Assignment> {
        brute_force(self)
    }

    fn backtracking(&self) -> SearchResult<Assignment> {
        backtracking(self)
    }

    fn simple(&self) -> SearchResult<Assignment> {
        simple(self)
    }

    fn best_case(&self) -> SearchResult<Assignment> {
        best_case(self)
    }

    fn verify(&self, witness: &Assignment) -> bool {
        witness.len() == self.variable_count() && self.is_satisfied_by(witness)
    }

    fn size_metrics(&self) -> Vec<String> {
        vec![
            self.variable_count().to_string(),
            self.clause_count().to_string(),
        ]
    }
}
