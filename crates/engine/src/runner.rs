//! End-to-end benchmark run
//!
//! Open the store, create the collections, seed if requested, run the
//! workload and compute the result row.

use std::time::Duration;

use tpcb_core::{BenchConfig, Result};
use tpcb_storage::{Store, StoreOptions};
use tracing::{info, warn};

use crate::harness::{Harness, RunStats};
use crate::metrics::BenchReport;
use crate::ops::Workload;
use crate::policy::ErrorPolicy;
use crate::seed::{create_schema, seed_dataset, SeedOutcome};

/// Everything a finished run produced
#[derive(Debug)]
pub struct BenchOutcome {
    /// Per-collection seeding result; empty when `init` was off
    pub seeded: Vec<SeedOutcome>,
    /// Final harness counters
    pub stats: RunStats,
    /// Computed result row
    pub report: BenchReport,
}

/// Open the database named by `config` with its storage options.
pub fn open_store(config: &BenchConfig) -> Result<Store> {
    Store::open(
        &config.db_path,
        StoreOptions {
            durability: config.durability,
            cache_size_mb: config.cache_size_mb,
        },
    )
}

/// Run a benchmark against an already open store.
///
/// # Errors
///
/// Returns the first seeding failure, or the error that collapsed the run
/// under `policy`. No report is produced in either case.
pub fn run_on(store: &Store, config: &BenchConfig, policy: &dyn ErrorPolicy) -> Result<BenchOutcome> {
    config.validate()?;
    let scale = config.scale()?;
    if config.benchtime < Duration::from_millis(100) {
        warn!(benchtime = ?config.benchtime, "very short benchtime; results will be noisy");
    }

    create_schema(store)?;
    let seeded = if config.init {
        seed_dataset(store, scale, config.batch_size)?
    } else {
        info!("skipping seeding");
        Vec::new()
    };

    let workload = Workload::new(config.mode(), scale);
    info!(mode = workload.mode.name(), "testing");
    let stats = Harness::new(store, policy, config).run(&workload)?;
    let report = BenchReport::from_run(config, &stats);
    Ok(BenchOutcome {
        seeded,
        stats,
        report,
    })
}

/// Open the configured store and run a benchmark on it.
pub fn run(config: &BenchConfig, policy: &dyn ErrorPolicy) -> Result<BenchOutcome> {
    config.validate()?;
    let store = open_store(config)?;
    run_on(&store, config, policy)
}
