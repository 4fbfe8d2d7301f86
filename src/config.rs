//! The persisted selection of a problem domain and its strategies.
//!
//! The record is JSON:
//!
//! ```json
//! {
//!   "Project Configuration": {
//!     "Selection": { "name": "sat", "value": "SAT" },
//!     "Sub Problem": [
//!       { "name": "brute_force", "value": "Brute Force" },
//!       { "name": "best_case", "value": "Best Case" }
//!     ]
//!   }
//! }
//! ```
//!
//! Entries are recognised by their `value`.

use crate::error::ConfigError;
use crate::search::{Domain, Strategy};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Where `configure` writes the record unless told otherwise.
pub const DEFAULT_CONFIG_PATH: &str = "configuration/student_config.json";

/// A `{ "name", "value" }` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedChoice {
    /// Short machine name, e.g. `btracking`.
    pub name: String,
    /// Display name, e.g. `Backtracking`.
    pub value: String,
}

/// The body of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfiguration {
    /// The problem domain.
    #[serde(rename = "Selection")]
    pub selection: NamedChoice,
    /// The strategies to run.
    #[serde(rename = "Sub Problem", default)]
    pub sub_problems: Vec<NamedChoice>,
}

/// The configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// The only top-level key.
    #[serde(rename = "Project Configuration")]
    pub project: ProjectConfiguration,
}

/// A resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// The domain to solve.
    pub domain: Domain,
    /// Strategies in run order, without duplicates.
    pub strategies: Vec<Strategy>,
}

impl ConfigFile {
    /// A record selecting `domain` and `strategies`.
    #[must_use]
    pub fn new(domain: Domain, strategies: &[Strategy]) -> Self {
        Self {
            project: ProjectConfiguration {
                selection: NamedChoice {
                    name: domain.config_name().to_string(),
                    value: domain.config_value().to_string(),
                },
                sub_problems: strategies
                    .iter()
                    .map(|s| NamedChoice {
                        name: s.config_name().to_string(),
                        value: s.config_value().to_string(),
                    })
                    .collect(),
            },
        }
    }

    /// Reads the record at `path`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Missing`] when the file does not exist, otherwise I/O
    /// and JSON errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Writes the record to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// I/O and serialization errors.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Resolves the record to a domain and its strategies. Strategies this
    /// crate does not know are skipped with a warning.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownProblem`] for an unsupported domain.
    pub fn selection(&self) -> Result<Selection, ConfigError> {
        let value = &self.project.selection.value;
        let domain = Domain::from_config_value(value)
            .ok_or_else(|| ConfigError::UnknownProblem(value.clone()))?;

        let mut strategies = Vec::new();
        for choice in &self.project.sub_problems {
            match Strategy::from_config_value(&choice.value) {
                Some(strategy) => strategies.push(strategy),
                None => warn!("ignoring unknown strategy `{}`", choice.value),
            }
        }
        strategies.sort_unstable();
        strategies.dedup();

        Ok(Selection { domain, strategies })
    }
}
