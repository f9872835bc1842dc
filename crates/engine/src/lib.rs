//! TPC-B-like workload engine
//!
//! - [`seed`]: idempotent, resumable dataset seeding
//! - [`ops`]: balance lookup and transfer transactions
//! - [`harness`]: concurrent, deadline-bounded execution
//! - [`metrics`]: throughput and latency from final counters
//! - [`policy`]: what workers do when an operation fails
//! - [`runner`]: the whole pipeline for one run

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod harness;
pub mod metrics;
pub mod ops;
pub mod policy;
pub mod runner;
pub mod seed;

pub use harness::{Counters, Deadline, Harness, Operation, RunStats, WorkerStats};
pub use metrics::BenchReport;
pub use ops::{
    apply_transfer, random_read, random_transfer, read_balance, transfer, TransferDraw, Workload,
    DELTA_RANGE,
};
pub use policy::{CollectErrors, ErrorPolicy, FailFast, Verdict, WorkerError};
pub use runner::{open_store, run, run_on, BenchOutcome};
pub use seed::{create_schema, ensure_filled, seed_dataset, SeedOutcome};
