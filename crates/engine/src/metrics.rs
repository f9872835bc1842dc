//! Throughput and latency from final run counters
//!
//! The harness runs for the full configured duration, so the configured
//! `benchtime` is used as elapsed time:
//!
//! ```text
//! latency_us     = benchtime_us / iterations * concurrency
//! throughput_rps = iterations / benchtime_s
//! ```
//!
//! `iterations` is the total across all workers; multiplying by
//! `concurrency` turns aggregate time-per-operation back into the latency
//! of a single operation, assuming every worker ran at the same rate.

use std::time::Duration;

use serde::Serialize;
use tpcb_core::{BenchConfig, Mode};

use crate::harness::RunStats;

/// One result row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchReport {
    /// Workload name, `tpcb-like` or `tpcb-readonly`
    pub name: &'static str,
    /// Average operation latency in microseconds; `None` when nothing ran
    pub latency_us: Option<f64>,
    /// Completed operations per second of configured benchtime
    pub throughput_rps: f64,
    /// Completed operations across all workers
    pub iterations: u64,
    /// Always zero; there is no retry-on-conflict mode
    pub conflicts: u64,
    /// Worker count
    pub concurrency: usize,
    /// Configured benchtime in seconds
    pub benchtime_secs: f64,
}

impl BenchReport {
    /// Derive the row from final counters. Uses the configured benchtime,
    /// not the measured wall time.
    pub fn compute(
        mode: Mode,
        iterations: u64,
        conflicts: u64,
        benchtime: Duration,
        concurrency: usize,
    ) -> Self {
        let secs = benchtime.as_secs_f64();
        let latency_us = (iterations > 0)
            .then(|| secs * 1_000_000.0 / iterations as f64 * concurrency as f64);
        let throughput_rps = if secs > 0.0 {
            iterations as f64 / secs
        } else {
            0.0
        };
        BenchReport {
            name: mode.name(),
            latency_us,
            throughput_rps,
            iterations,
            conflicts,
            concurrency,
            benchtime_secs: secs,
        }
    }

    /// Report for a finished run under `config`
    pub fn from_run(config: &BenchConfig, stats: &RunStats) -> Self {
        Self::compute(
            config.mode(),
            stats.iterations,
            stats.conflicts,
            config.benchtime,
            config.concurrency,
        )
    }
}
