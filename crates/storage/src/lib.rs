//! Collection store for the TPC-B-like workload
//!
//! Thin transactional layer over redb exposing what the workload needs:
//! named collections, point reads and writes, ordered scans and a
//! per-collection sequence generator, all inside atomic transactions.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod store;
pub mod txn;

pub use store::{Store, StoreOptions};
pub use txn::{ReadTxn, Readable, WriteTxn};
