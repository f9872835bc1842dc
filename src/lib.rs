//! tpcb - TPC-B-like transactional workload generator
//!
//! Measures throughput and latency of an embedded transactional store under
//! concurrent load. A run seeds a fixed-shape dataset (accounts, tellers,
//! branches, history), drives a number of workers through either balance
//! lookups or bank transfers for a fixed duration, and reports aggregate
//! throughput and average latency.
//!
//! # Quick Start
//!
//! ```ignore
//! use tpcb::{BenchConfig, FailFast};
//! use std::time::Duration;
//!
//! let config = BenchConfig {
//!     scale: 1,
//!     concurrency: 4,
//!     benchtime: Duration::from_secs(5),
//!     ..BenchConfig::default()
//! };
//! let outcome = tpcb::run(&config, &FailFast::new())?;
//! println!("{:.3} rps", outcome.report.throughput_rps);
//! ```
//!
//! # Architecture
//!
//! - `tpcb-core`: record types, codec, configuration, errors
//! - `tpcb-storage`: collections and transactions over redb
//! - `tpcb-engine`: seeder, transaction mix, harness, metrics

pub use tpcb_core::*;
pub use tpcb_engine::*;
pub use tpcb_storage::{ReadTxn, Readable, Store, StoreOptions, WriteTxn};
