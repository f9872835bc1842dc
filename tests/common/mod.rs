//! Shared test utilities for the integration suites.
//!
//! Pulled into each suite with `#[path = "../common/mod.rs"] mod common;`.

#![allow(dead_code)]

use std::time::Duration;

use tempfile::TempDir;
pub use tpcb::{
    create_schema, BenchConfig, Durability, Readable, Scale, Store, StoreOptions,
};

/// Store on a throwaway file; dropped with the directory.
pub struct TestStore {
    pub store: Store,
    pub dir: TempDir,
}

impl TestStore {
    /// Fresh store with the four collections created. Commits skip fsync.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let store = Store::open(
            dir.path().join("tpcb.redb"),
            StoreOptions {
                durability: Durability::None,
                cache_size_mb: None,
            },
        )
        .expect("open store");
        create_schema(&store).expect("create schema");
        TestStore { store, dir }
    }

    /// Record count of `collection`
    pub fn count(&self, collection: &str) -> u64 {
        self.store
            .view(|txn| txn.count(collection))
            .expect("count")
    }

    /// All raw records of `collection`, key order
    pub fn dump(&self, collection: &str) -> Vec<(String, Vec<u8>)> {
        self.store
            .view(|txn| txn.scan(collection))
            .expect("scan")
    }
}

/// Config for short runs against a test store.
pub fn quick_config(scale: u64, concurrency: usize, millis: u64, rw_mode: bool) -> BenchConfig {
    BenchConfig {
        concurrency,
        benchtime: Duration::from_millis(millis),
        scale,
        rw_mode,
        init: true,
        batch_size: 10_000,
        durability: Durability::None,
        seed: Some(1234),
        ..BenchConfig::default()
    }
}
