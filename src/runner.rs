//! Runs the selected strategies over input files and writes result tables.

use crate::coloring::GraphInstance;
use crate::error::{Error, Result};
use crate::knapsack::KnapsackInstance;
use crate::parse::{parse_file, Expectation, InstanceFormat};
use crate::report::{assemble, ResultTable};
use crate::sat::SatInstance;
use crate::search::{Domain, Problem, SearchResult, Strategy};
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// What to run and where to put the tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Domain of every input file.
    pub domain: Domain,
    /// Strategies to run; executed in [`Strategy::ALL`] order.
    pub strategies: Vec<Strategy>,
    /// Directory receiving the result tables; created when missing.
    pub results_dir: PathBuf,
}

/// Totals for one strategy across all files of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategySummary {
    /// The strategy.
    pub strategy: Strategy,
    /// Instances solved.
    pub instances: usize,
    /// Instances reported feasible.
    pub feasible: usize,
    /// Results contradicting the instance's stated expectation.
    pub mismatches: usize,
    /// Feasible results whose witness failed verification.
    pub unverified: usize,
    /// Search nodes over all calls.
    pub nodes: u64,
    /// Time spent inside strategy calls.
    pub solve_time: Duration,
}

impl StrategySummary {
    const fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            instances: 0,
            feasible: 0,
            mismatches: 0,
            unverified: 0,
            nodes: 0,
            solve_time: Duration::ZERO,
        }
    }
}

/// Outcome of [`Runner::run_path`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Input files processed.
    pub files: usize,
    /// Instances read over all files.
    pub instances: usize,
    /// Time spent parsing.
    pub parse_time: Duration,
    /// One entry per selected strategy, in run order.
    pub strategies: Vec<StrategySummary>,
    /// Tables written, in order.
    pub tables: Vec<PathBuf>,
}

impl RunSummary {
    /// Expectation mismatches over all strategies.
    #[must_use]
    pub fn mismatches(&self) -> usize {
        self.strategies.iter().map(|s| s.mismatches).sum()
    }

    /// Verification failures over all strategies.
    #[must_use]
    pub fn unverified(&self) -> usize {
        self.strategies.iter().map(|s| s.unverified).sum()
    }

    /// Whether every result verified and matched its expectation.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.mismatches() == 0 && self.unverified() == 0
    }

    /// Time spent in strategy calls over all strategies.
    #[must_use]
    pub fn solve_time(&self) -> Duration {
        self.strategies.iter().map(|s| s.solve_time).sum()
    }
}

/// Whether `result` agrees with `expectation`.
///
/// A complete strategy must match the expected feasibility exactly, and a
/// best-case result must also reach the expected witness's objective. The
/// simple strategy is only wrong when it claims a solution for an instance
/// known to have none.
pub fn meets_expectation<P: Problem>(
    problem: &P,
    strategy: Strategy,
    result: &SearchResult<P::Witness>,
    expectation: &Expectation<P::Witness>,
) -> bool {
    let Some(expected) = expectation.feasibility(problem) else {
        return true;
    };
    if !strategy.is_complete() {
        return expected || !result.feasible;
    }
    if result.feasible != expected {
        return false;
    }
    match (strategy, expectation) {
        (Strategy::BestCase, Expectation::Best(witness)) => {
            problem.same_objective(&result.witness, witness)
        }
        _ => true,
    }
}

/// Drives one run.
#[derive(Debug, Clone)]
pub struct Runner {
    options: RunOptions,
}

impl Runner {
    /// A runner for `options`. Duplicate strategies are dropped and the
    /// rest put in run order.
    #[must_use]
    pub fn new(mut options: RunOptions) -> Self {
        options.strategies.sort_unstable();
        options.strategies.dedup();
        Self { options }
    }

    /// The options in effect.
    #[must_use]
    pub const fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Solves a single input file, or every `.cnf` file below a directory in
    /// file name order.
    ///
    /// # Errors
    ///
    /// The first parse, walk or write failure. Tables written before it
    /// stay on disk.
    pub fn run_path(&self, path: &Path) -> Result<RunSummary> {
        let inputs = input_files(path)?;
        if inputs.is_empty() {
            warn!("no .cnf input files found under {}", path.display());
        }
        fs::create_dir_all(&self.options.results_dir)?;

        let mut summary = RunSummary {
            strategies: self
                .options
                .strategies
                .iter()
                .map(|&s| StrategySummary::new(s))
                .collect(),
            ..RunSummary::default()
        };

        for input in &inputs {
            match self.options.domain {
                Domain::Sat => self.run_file::<SatInstance>(input, &mut summary)?,
                Domain::Coloring => self.run_file::<GraphInstance>(input, &mut summary)?,
                Domain::Knapsack => self.run_file::<KnapsackInstance>(input, &mut summary)?,
            }
            summary.files += 1;
        }

        Ok(summary)
    }

    fn run_file<P: InstanceFormat>(&self, input: &Path, summary: &mut RunSummary) -> Result<()> {
        let start = Instant::now();
        let instances = parse_file::<P>(input).map_err(|source| Error::Parse {
            path: input.to_path_buf(),
            source,
        })?;
        summary.parse_time += start.elapsed();
        summary.instances += instances.len();
        info!(
            "parsed {} {} instances from {}",
            instances.len(),
            P::DOMAIN,
            input.display()
        );

        for totals in &mut summary.strategies {
            let strategy = totals.strategy;
            let mut table = ResultTable::new(P::DOMAIN, strategy);

            for instance in &instances {
                let (result, row) = assemble(&instance.id, &instance.problem, strategy);
                totals.instances += 1;
                totals.nodes += result.nodes;
                totals.solve_time += row.elapsed;

                if result.feasible {
                    totals.feasible += 1;
                    if !instance.problem.verify(&result.witness) {
                        totals.unverified += 1;
                        error!(
                            "{strategy} returned an invalid witness {} for instance {}",
                            result.witness, instance.id
                        );
                    }
                }
                if !meets_expectation(&instance.problem, strategy, &result, &instance.expectation) {
                    totals.mismatches += 1;
                    warn!(
                        "{strategy} disagrees with the expected result of instance {} in {}",
                        instance.id,
                        input.display()
                    );
                }
                table.push(row);
            }

            let path = table.save(&self.options.results_dir, input)?;
            info!("results written to {}", path.display());
            summary.tables.push(path);
        }

        Ok(())
    }
}

/// `path` itself when it is a file, otherwise the `.cnf` files below it
/// sorted by file name.
fn input_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        let is_cnf = entry.path().extension().is_some_and(|ext| ext == "cnf");
        if entry.file_type().is_file() && is_cnf {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
