//! # np-search
//!
//! Command-line harness running brute force, backtracking, simple and best
//! case search over multi-instance input files for three problems: CNF
//! satisfiability, graph k-coloring and bounded subset-sum ("knapsack").
//!
//! ## Usage
//!
//! ```sh
//! # Solve every instance of a file with all four strategies
//! np-search run input/kSAT.cnf --problem sat
//!
//! # Only backtracking and best case, tables into ./out, with statistics
//! np-search run input/ -P knapsack -s btracking -s best-case --results out --stats
//!
//! # Store the selection once, then run without flags
//! np-search configure -P graph_coloring -s brute-force -s simple
//! np-search run input/graphs.cnf
//!
//! # Fail (exit status 1) when a result contradicts an instance's status
//! np-search run tests/check_sat.cnf -P sat --check
//! ```
//!
//! Each strategy writes `<strategy>_<input stem>_<domain results>.csv` into
//! the results directory. `-v` (repeatable) and `-q` control logging;
//! `RUST_LOG` overrides both.

use clap::Parser;
use command_line::cli::{self, Cli, Commands};

mod command_line;

/// Global allocator using `tikv-jemallocator` for potentially better performance
/// and memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli::init_logging(&cli.verbosity);

    match cli.command {
        Commands::Run {
            path,
            selection,
            results,
            check,
            stats,
        } => {
            let clean = cli::run(&path, &selection, &results, stats)?;
            if check && !clean {
                eprintln!("Some results did not match their expected status");
                std::process::exit(1);
            }
        }
        Commands::Configure { selection } => cli::configure(&selection)?,
        Commands::Completions { shell } => cli::print_completions(shell),
    }

    Ok(())
}
