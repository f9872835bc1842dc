//! Benchmark configuration
//!
//! A `BenchConfig` is built once (defaults, then an optional `tpcb.toml`,
//! then command-line overrides) and handed by reference to the seeder, the
//! harness and the reporter. Nothing reads configuration from globals.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::schema::Scale;

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "tpcb.toml";

/// Default number of records written per seeding transaction.
pub const DEFAULT_BATCH_SIZE: u64 = 1000;

/// Commit durability requested from the storage engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Durability {
    /// fsync on every commit
    #[default]
    Immediate,
    /// fsync eventually; a crash may lose recent commits
    Eventual,
    /// Never fsync. redb keeps such commits only until the next durable
    /// commit; if none follows, they are rolled back when the file is
    /// reopened, so a dataset seeded this way is not reused by a later run.
    None,
}

impl FromStr for Durability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "immediate" => Ok(Durability::Immediate),
            "eventual" => Ok(Durability::Eventual),
            "none" => Ok(Durability::None),
            other => Err(Error::config(format!(
                "Invalid durability '{}'. Expected \"immediate\", \"eventual\" or \"none\".",
                other
            ))),
        }
    }
}

/// Which operation every worker repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Balance lookup only
    ReadOnly,
    /// Transfer touching all four collections
    ReadWrite,
}

impl Mode {
    /// Name shown in the result row
    pub fn name(&self) -> &'static str {
        match self {
            Mode::ReadOnly => "tpcb-readonly",
            Mode::ReadWrite => "tpcb-like",
        }
    }
}

/// Benchmark configuration.
///
/// # Example
///
/// ```toml
/// concurrency = 24
/// benchtime = "60s"
/// scale = 1000
/// rw_mode = true
/// init = true
/// db_path = "tpcb.redb"
/// batch_size = 1000
/// durability = "immediate"
/// # cache_size_mb = 1024
/// # seed = 42
/// # progress_interval = "10s"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Number of parallel workers
    pub concurrency: usize,
    /// Total run duration
    #[serde(with = "duration_str")]
    pub benchtime: Duration,
    /// Dataset scale factor
    pub scale: u64,
    /// `true` runs transfers, `false` runs balance lookups
    pub rw_mode: bool,
    /// Seed the dataset before the run
    pub init: bool,
    /// Database file
    pub db_path: PathBuf,
    /// Records per seeding transaction
    pub batch_size: u64,
    /// Commit durability
    pub durability: Durability,
    /// Page cache size handed to the storage engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_size_mb: Option<usize>,
    /// Base seed for worker RNGs; entropy-seeded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Log live progress at this interval
    #[serde(with = "opt_duration_str", skip_serializing_if = "Option::is_none")]
    pub progress_interval: Option<Duration>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            concurrency: 24,
            benchtime: Duration::from_secs(60),
            scale: 1000,
            rw_mode: true,
            init: true,
            db_path: PathBuf::from("tpcb.redb"),
            batch_size: DEFAULT_BATCH_SIZE,
            durability: Durability::Immediate,
            cache_size_mb: None,
            seed: None,
            progress_interval: None,
        }
    }
}

impl BenchConfig {
    /// Operation mode selected by `rw_mode`
    pub fn mode(&self) -> Mode {
        if self.rw_mode {
            Mode::ReadWrite
        } else {
            Mode::ReadOnly
        }
    }

    /// Dataset shape for the configured scale
    pub fn scale(&self) -> Result<Scale> {
        Scale::new(self.scale)
    }

    /// Check every field that would make a run meaningless.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::config("concurrency must be at least 1"));
        }
        if self.benchtime.is_zero() {
            return Err(Error::config("benchtime must be greater than zero"));
        }
        if Instant::now().checked_add(self.benchtime).is_none() {
            return Err(Error::config(format!(
                "benchtime {} is out of range",
                humantime::format_duration(self.benchtime)
            )));
        }
        if self.batch_size == 0 {
            return Err(Error::config("batch_size must be at least 1"));
        }
        if matches!(self.progress_interval, Some(d) if d.is_zero()) {
            return Err(Error::config("progress_interval must be greater than zero"));
        }
        self.scale()?;
        Ok(())
    }

    /// Read and parse config from a TOML file. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))
    }
}

/// Human-readable durations ("60s", "1m 30s") for `Duration` fields.
mod duration_str {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&humantime::format_duration(*d).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(d)?;
        humantime::parse_duration(&text).map_err(de::Error::custom)
    }
}

mod opt_duration_str {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_str(&humantime::format_duration(*d).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let text = Option::<String>::deserialize(d)?;
        text.map(|t| humantime::parse_duration(&t).map_err(de::Error::custom))
            .transpose()
    }
}
