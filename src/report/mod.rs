//! Timing of strategy calls and the CSV result tables they feed.
//!
//! Every strategy gets its own table per input file. Column layouts differ
//! per domain:
//!
//! ```text
//! instance_id,n_vars,n_clauses,method,satisfiable,time_seconds,solution
//! instance_id,n_vertices,n_edges,k,method,colorable,time_seconds,coloring
//! instance_id,target,n_coins,method,feasible,time_seconds,coin_combination
//! ```

use crate::error::{Error, Result};
use crate::search::{Domain, Problem, SearchResult, Strategy};
use itertools::Itertools;
use log::debug;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// One line of a result table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Identifier of the instance.
    pub instance_id: String,
    /// The instance's size columns, see [`Problem::size_metrics`].
    pub metrics: Vec<String>,
    /// The strategy that produced the row.
    pub strategy: Strategy,
    /// Whether the strategy found a solution.
    pub feasible: bool,
    /// Wall-clock time of the strategy call.
    pub elapsed: Duration,
    /// The rendered witness.
    pub witness: String,
}

/// Runs `strategy` on `problem` and times it.
///
/// Only the strategy call itself is timed; rendering the witness is not.
///
/// # Returns
///
/// The search result together with the row describing it.
pub fn assemble<P: Problem>(
    id: &str,
    problem: &P,
    strategy: Strategy,
) -> (SearchResult<P::Witness>, ReportRow) {
    let start = Instant::now();
    let result = problem.solve(strategy);
    let elapsed = start.elapsed();

    debug!(
        "{} {strategy} instance {id}: feasible={} nodes={} in {elapsed:?}",
        P::DOMAIN,
        result.feasible,
        result.nodes,
    );

    let row = ReportRow {
        instance_id: id.to_string(),
        metrics: problem.size_metrics(),
        strategy,
        feasible: result.feasible,
        elapsed,
        witness: result.witness.to_string(),
    };
    (result, row)
}

/// Column names of a domain's table.
#[must_use]
pub const fn columns(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Sat => &[
            "instance_id",
            "n_vars",
            "n_clauses",
            "method",
            "satisfiable",
            "time_seconds",
            "solution",
        ],
        Domain::Coloring => &[
            "instance_id",
            "n_vertices",
            "n_edges",
            "k",
            "method",
            "colorable",
            "time_seconds",
            "coloring",
        ],
        Domain::Knapsack => &[
            "instance_id",
            "target",
            "n_coins",
            "method",
            "feasible",
            "time_seconds",
            "coin_combination",
        ],
    }
}

/// Suffix of a domain's result file names.
#[must_use]
pub const fn results_name(domain: Domain) -> &'static str {
    match domain {
        Domain::Sat => "sat_solver_results",
        Domain::Coloring => "graph_coloring_results",
        Domain::Knapsack => "knapsack_results",
    }
}

fn feasibility_token(domain: Domain, feasible: bool) -> &'static str {
    match (domain, feasible) {
        (Domain::Sat, true) => "S",
        (Domain::Sat, false) => "U",
        (_, true) => "YES",
        (_, false) => "NO",
    }
}

fn seconds(domain: Domain, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    match domain {
        Domain::Sat => shortest_float(secs),
        _ => format!("{secs:.6}"),
    }
}

/// Shortest round-trip rendering with the layout of the existing SAT
/// tables: `0.5`, `2.0`, and `2.48e-05` once the value drops below `1e-4`
/// (or reaches `1e16`).
fn shortest_float(value: f64) -> String {
    if value != 0.0 && (value.abs() < 1e-4 || value.abs() >= 1e16) {
        let text = format!("{value:e}");
        return match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => text,
        };
    }
    let text = value.to_string();
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}

/// Quotes a field containing a comma, quote or line break, doubling any
/// quotes inside it.
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// The rows one strategy produced for one input file.
#[derive(Debug, Clone)]
pub struct ResultTable {
    domain: Domain,
    strategy: Strategy,
    rows: Vec<ReportRow>,
}

impl ResultTable {
    /// An empty table.
    #[must_use]
    pub const fn new(domain: Domain, strategy: Strategy) -> Self {
        Self {
            domain,
            strategy,
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    /// Rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// `<strategy>_<input stem>_<results name>.csv`.
    #[must_use]
    pub fn file_name(&self, input: &Path) -> String {
        let stem = input
            .file_stem()
            .map_or(Cow::Borrowed("input"), |stem| stem.to_string_lossy());
        format!(
            "{}_{stem}_{}.csv",
            self.strategy.config_name(),
            results_name(self.domain)
        )
    }

    fn record(&self, row: &ReportRow) -> String {
        let feasibility = feasibility_token(self.domain, row.feasible);
        let time = seconds(self.domain, row.elapsed);
        std::iter::once(row.instance_id.as_str())
            .chain(row.metrics.iter().map(String::as_str))
            .chain([
                self.strategy.method_label(),
                feasibility,
                time.as_str(),
                row.witness.as_str(),
            ])
            .map(escape)
            .join(",")
    }

    /// Writes the header and all rows as CSV.
    ///
    /// # Errors
    ///
    /// Whatever `out` fails with.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "{}", columns(self.domain).join(","))?;
        for row in &self.rows {
            writeln!(out, "{}", self.record(row))?;
        }
        out.flush()
    }

    /// Writes the table into `dir` under [`Self::file_name`].
    ///
    /// # Errors
    ///
    /// [`Error::Report`] when the file cannot be created or written.
    pub fn save(&self, dir: &Path, input: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name(input));
        let written = File::create(&path).and_then(|file| self.write_to(BufWriter::new(file)));
        match written {
            Ok(()) => Ok(path),
            Err(source) => Err(Error::Report { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coloring::GraphInstance;
    use crate::knapsack::KnapsackInstance;
    use crate::sat::SatInstance;

    fn row(id: &str, metrics: &[&str], strategy: Strategy, feasible: bool, witness: &str) -> ReportRow {
        ReportRow {
            instance_id: id.to_string(),
            metrics: metrics.iter().map(ToString::to_string).collect(),
            strategy,
            feasible,
            elapsed: Duration::from_micros(145),
            witness: witness.to_string(),
        }
    }

    fn render(table: &ResultTable) -> String {
        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_knapsack_table() {
        let mut table = ResultTable::new(Domain::Knapsack, Strategy::BruteForce);
        table.push(row("1", &["17", "5"], Strategy::BruteForce, true, "{3:1,5:1}"));
        table.push(row("2", &["29", "6"], Strategy::BruteForce, false, "{}"));
        assert_eq!(
            render(&table),
            "instance_id,target,n_coins,method,feasible,time_seconds,coin_combination\n\
             1,17,5,BruteForce,YES,0.000145,\"{3:1,5:1}\"\n\
             2,29,6,BruteForce,NO,0.000145,{}\n"
        );
    }

    #[test]
    fn test_sat_table_uses_short_tokens() {
        let mut table = ResultTable::new(Domain::Sat, Strategy::Backtracking);
        table.push(row("3", &["2", "2"], Strategy::Backtracking, false, "{}"));
        let text = render(&table);
        assert!(text.starts_with("instance_id,n_vars,n_clauses,method,satisfiable,"));
        assert!(text.ends_with("3,2,2,BackTracking,U,0.000145,{}\n"));
    }

    #[test]
    fn test_coloring_table() {
        let mut table = ResultTable::new(Domain::Coloring, Strategy::BestCase);
        table.push(row("g", &["4", "5", "3"], Strategy::BestCase, true, "[0, 1, 2, 0]"));
        assert!(render(&table).ends_with("g,4,5,3,BestCase,YES,0.000145,\"[0, 1, 2, 0]\"\n"));
    }

    #[test]
    fn test_sat_time_layout() {
        let sat = |d| seconds(Domain::Sat, d);
        assert_eq!(sat(Duration::from_micros(145)), "0.000145");
        assert_eq!(sat(Duration::from_nanos(24_800)), "2.48e-05");
        assert_eq!(sat(Duration::from_nanos(5)), "5e-09");
        assert_eq!(sat(Duration::from_millis(1500)), "1.5");
        assert_eq!(sat(Duration::from_secs(2)), "2.0");
        assert_eq!(sat(Duration::ZERO), "0.0");
        assert_eq!(seconds(Domain::Knapsack, Duration::from_nanos(24_800)), "0.000025");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_file_name() {
        let table = ResultTable::new(Domain::Coloring, Strategy::Backtracking);
        assert_eq!(
            table.file_name(Path::new("data/graphs.cnf")),
            "btracking_graphs_graph_coloring_results.csv"
        );
        let table = ResultTable::new(Domain::Sat, Strategy::BestCase);
        assert_eq!(
            table.file_name(Path::new("kSAT.cnf")),
            "best_case_kSAT_sat_solver_results.csv"
        );
    }

    #[test]
    fn test_assemble_fills_row() {
        let instance = KnapsackInstance::new(6, [(1, 5), (4, 2)]).unwrap();
        let (result, row) = assemble("1", &instance, Strategy::Backtracking);
        assert!(result.feasible);
        assert_eq!(row.instance_id, "1");
        assert_eq!(row.metrics, ["6", "7"]);
        assert_eq!(row.strategy, Strategy::Backtracking);
        assert!(row.feasible);
        assert_eq!(row.witness, "{1:2,4:1}");

        let graph = GraphInstance::new(3, [(0, 1), (1, 2), (0, 2)], 2).unwrap();
        let (result, row) = assemble("t", &graph, Strategy::BruteForce);
        assert!(!result.feasible);
        assert_eq!(row.witness, "[]");

        let formula = SatInstance::new(1, [vec![1]]).unwrap();
        let (_, row) = assemble("s", &formula, Strategy::Simple);
        assert_eq!(row.witness, "{1: True}");
    }

    #[test]
    fn test_save_writes_into_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = ResultTable::new(Domain::Knapsack, Strategy::Simple);
        table.push(row("1", &["6", "7"], Strategy::Simple, true, "{4:1,1:2}"));
        let path = table.save(dir.path(), Path::new("coins.cnf")).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("simple_coins_knapsack_results.csv")
        );
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_save_reports_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let table = ResultTable::new(Domain::Sat, Strategy::Simple);
        let err = table
            .save(&dir.path().join("missing"), Path::new("x.cnf"))
            .unwrap_err();
        assert!(matches!(err, Error::Report { .. }));
    }
}
