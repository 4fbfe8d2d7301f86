#![allow(clippy::cast_precision_loss)]

use anyhow::{bail, Context};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use log::LevelFilter;
use np_search::config::{ConfigFile, Selection, DEFAULT_CONFIG_PATH};
use np_search::runner::{RunOptions, RunSummary, Runner};
use np_search::search::{Domain, Strategy};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tikv_jemalloc_ctl::{epoch, stats};

/// Command-line interface of the search harness.
#[derive(Parser, Debug)]
#[command(
    name = "np-search",
    version,
    about = "Brute force, backtracking, greedy and branch-and-bound search over SAT, graph coloring and knapsack instances"
)]
pub(crate) struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Logging options applicable to all commands.
    #[command(flatten)]
    pub verbosity: Verbosity,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve every instance of an input file, or of every `.cnf` file below a
    /// directory, and write one result table per strategy.
    Run {
        /// Input file or directory.
        path: PathBuf,

        /// Problem and strategy selection.
        #[command(flatten)]
        selection: SelectionOptions,

        /// Directory receiving the result tables.
        #[arg(long, default_value = "results")]
        results: PathBuf,

        /// Exit with status 1 when a result contradicts the expected status
        /// or a witness fails verification.
        #[arg(long, default_value_t = false)]
        check: bool,

        /// Print run statistics after solving.
        #[arg(long, default_value_t = false)]
        stats: bool,
    },

    /// Write the configuration record used by `run` when no problem is given.
    Configure {
        /// Problem and strategy selection to store.
        #[command(flatten)]
        selection: SelectionOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Problem and strategy selection shared by `run` and `configure`.
#[derive(Args, Debug, Clone)]
pub(crate) struct SelectionOptions {
    /// The problem domain of the input.
    #[arg(short = 'P', long, value_enum)]
    pub problem: Option<Domain>,

    /// A strategy to run; repeat for several. Defaults to the configuration
    /// record, or to all four strategies.
    #[arg(short, long = "strategy", value_enum)]
    pub strategies: Vec<Strategy>,

    /// Path of the configuration record.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

/// Global verbosity flags.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct Verbosity {
    /// Log more; repeat for debug and trace output.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

impl Verbosity {
    /// The log level requested on the command line.
    pub(crate) const fn level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Initialises `env_logger` at the requested level. `RUST_LOG`, when set,
/// takes precedence.
pub(crate) fn init_logging(verbosity: &Verbosity) {
    env_logger::Builder::new()
        .filter_level(verbosity.level())
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .init();
}

/// Resolves the selection from flags and the configuration record.
///
/// # Errors
///
/// When no problem is given on the command line and the configuration
/// record is missing or unusable.
pub(crate) fn resolve_selection(options: &SelectionOptions) -> anyhow::Result<Selection> {
    let stored = if options.problem.is_none() || options.strategies.is_empty() {
        match ConfigFile::load(&options.config) {
            Ok(config) => Some(config.selection()?),
            Err(e) if options.problem.is_some() => {
                log::debug!("not using the configuration record: {e}");
                None
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    "no problem selected; pass --problem or run `np-search configure`"
                });
            }
        }
    } else {
        None
    };

    let domain = match (options.problem, &stored) {
        (Some(domain), _) => domain,
        (None, Some(selection)) => selection.domain,
        (None, None) => bail!("no problem selected; pass --problem or run `np-search configure`"),
    };

    let strategies = if !options.strategies.is_empty() {
        options.strategies.clone()
    } else {
        match stored {
            Some(selection) if selection.domain == domain && !selection.strategies.is_empty() => {
                selection.strategies
            }
            _ => Strategy::ALL.to_vec(),
        }
    };

    Ok(Selection { domain, strategies })
}

/// Writes the configuration record.
///
/// # Errors
///
/// When no problem is given or the record cannot be written.
pub(crate) fn configure(options: &SelectionOptions) -> anyhow::Result<()> {
    let Some(domain) = options.problem else {
        bail!("`configure` needs a problem, e.g. `--problem sat`");
    };
    let strategies = if options.strategies.is_empty() {
        Strategy::ALL.to_vec()
    } else {
        options.strategies.clone()
    };

    ConfigFile::new(domain, &strategies)
        .save(&options.config)
        .with_context(|| format!("unable to write {}", options.config.display()))?;
    println!("Configuration written to {}", options.config.display());
    Ok(())
}

/// Runs the harness on `path` and reports the outcome.
///
/// # Errors
///
/// Selection, parse and write failures.
///
/// # Returns
///
/// Whether the run was clean: every witness verified and every result met
/// its expectation.
pub(crate) fn run(
    path: &Path,
    options: &SelectionOptions,
    results: &Path,
    show_stats: bool,
) -> anyhow::Result<bool> {
    let selection = resolve_selection(options)?;
    log::info!(
        "solving {} with {}",
        selection.domain,
        selection.strategies.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    );

    let runner = Runner::new(RunOptions {
        domain: selection.domain,
        strategies: selection.strategies,
        results_dir: results.to_path_buf(),
    });

    let summary = runner
        .run_path(path)
        .with_context(|| format!("failed to solve {}", path.display()))?;

    for table in &summary.tables {
        println!("Results written to {}", table.display());
    }

    if show_stats {
        let (allocated, resident) = memory_usage();
        print_stats(&summary, allocated, resident);
    }

    Ok(summary.is_clean())
}

/// Allocated and resident memory in MiB, or zero when jemalloc cannot
/// report them.
fn memory_usage() -> (f64, f64) {
    if epoch::advance().is_err() {
        return (0.0, 0.0);
    }
    let read = |mib: Result<usize, tikv_jemalloc_ctl::Error>| {
        mib.map_or(0.0, |bytes| bytes as f64 / (1024.0 * 1024.0))
    };
    (read(stats::allocated::read()), read(stats::resident::read()))
}

/// Helper function to print a single statistic line in a formatted table row.
///
/// # Arguments
/// * `label` - The description of the statistic.
/// * `value` - The value of the statistic, implementing `std::fmt::Display`.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Prints a statistic line that includes a rate (value/second).
///
/// # Arguments
/// * `label` - The description of the statistic.
/// * `value` - The raw count for the statistic.
/// * `elapsed` - The elapsed time, used to calculate the rate.
pub(crate) fn stat_line_with_rate(label: &str, value: u64, elapsed: Duration) {
    let secs = elapsed.as_secs_f64();
    let rate = if secs > 0.0 { value as f64 / secs } else { 0.0 };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of input and search statistics.
///
/// # Arguments
/// * `summary` - The outcome of the run.
/// * `allocated` - Allocated memory in MiB.
/// * `resident` - Resident memory in MiB.
pub(crate) fn print_stats(summary: &RunSummary, allocated: f64, resident: f64) {
    println!("\n========================[ Input Statistics ]=========================");
    stat_line("Files", summary.files);
    stat_line("Instances", summary.instances);
    stat_line(
        "Parse time (s)",
        format!("{:.3}", summary.parse_time.as_secs_f64()),
    );

    for s in &summary.strategies {
        println!("{:=^69}", format!("[ {} ]", s.strategy));
        stat_line("Instances solved", s.instances);
        stat_line("Feasible", s.feasible);
        stat_line_with_rate("Nodes", s.nodes, s.solve_time);
        stat_line("Expectation mismatches", s.mismatches);
        stat_line("Verification failures", s.unverified);
        stat_line("Solve time (s)", format!("{:.3}", s.solve_time.as_secs_f64()));
    }

    println!("=====================================================================");
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line(
        "Total solve time (s)",
        format!("{:.3}", summary.solve_time().as_secs_f64()),
    );
    println!("=====================================================================");

    if summary.is_clean() {
        println!("\nALL RESULTS CONSISTENT");
    } else {
        println!(
            "\n{} MISMATCHES, {} VERIFICATION FAILURES",
            summary.mismatches(),
            summary.unverified()
        );
    }
}

/// Writes completions for `shell` to standard output.
pub(crate) fn print_completions(shell: clap_complete::Shell) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(args: &[&str]) -> SelectionOptions {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Run { selection, .. } | Commands::Configure { selection } => selection,
            Commands::Completions { .. } => panic!("no selection"),
        }
    }

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_everything() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("none.json");
        let options = selection(&[
            "np-search",
            "run",
            "in.cnf",
            "-P",
            "graph_coloring",
            "-s",
            "btracking",
            "-s",
            "best-case",
            "--config",
            config.to_str().unwrap(),
        ]);
        let resolved = resolve_selection(&options).unwrap();
        assert_eq!(resolved.domain, Domain::Coloring);
        assert_eq!(
            resolved.strategies,
            [Strategy::Backtracking, Strategy::BestCase]
        );
    }

    #[test]
    fn test_problem_without_config_runs_all_strategies() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("none.json");
        let options = selection(&[
            "np-search",
            "run",
            "in.cnf",
            "--problem",
            "sat",
            "--config",
            config.to_str().unwrap(),
        ]);
        let resolved = resolve_selection(&options).unwrap();
        assert_eq!(resolved.strategies, Strategy::ALL);
    }

    #[test]
    fn test_configuration_record_fills_in() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("conf.json");
        ConfigFile::new(Domain::Knapsack, &[Strategy::Simple])
            .save(&config)
            .unwrap();

        let options = selection(&["np-search", "run", "in.cnf", "--config", config.to_str().unwrap()]);
        let resolved = resolve_selection(&options).unwrap();
        assert_eq!(resolved.domain, Domain::Knapsack);
        assert_eq!(resolved.strategies, [Strategy::Simple]);
    }

    #[test]
    fn test_missing_selection_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("none.json");
        let options = selection(&["np-search", "run", "in.cnf", "--config", config.to_str().unwrap()]);
        assert!(resolve_selection(&options).is_err());
    }

    #[test]
    fn test_configure_writes_record() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("configuration").join("student_config.json");
        let options = selection(&[
            "np-search",
            "configure",
            "-P",
            "knapsack",
            "-s",
            "brute-force",
            "--config",
            config.to_str().unwrap(),
        ]);
        configure(&options).unwrap();
        let stored = ConfigFile::load(&config).unwrap().selection().unwrap();
        assert_eq!(stored.domain, Domain::Knapsack);
        assert_eq!(stored.strategies, [Strategy::BruteForce]);
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = Cli::try_parse_from(["np-search", "-vv", "completions", "bash"]).unwrap();
        assert_eq!(cli.verbosity.level(), LevelFilter::Debug);
        let cli = Cli::try_parse_from(["np-search", "completions", "zsh", "-q"]).unwrap();
        assert_eq!(cli.verbosity.level(), LevelFilter::Error);
    }
}
