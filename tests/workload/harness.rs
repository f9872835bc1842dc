//! Harness accounting against a seeded store

use std::sync::atomic::{AtomicU64, Ordering};

use crate::common::*;
use tpcb::{
    run_on, seed_dataset, CollectErrors, Error, FailFast, Harness, Mode, Operation, Workload,
};

#[test]
fn iterations_equal_worker_sum_under_transfers() {
    let test_store = TestStore::new();
    let config = quick_config(1, 3, 300, true);
    seed_dataset(&test_store.store, config.scale().unwrap(), config.batch_size).unwrap();

    let policy = FailFast::new();
    let workload = Workload::new(Mode::ReadWrite, config.scale().unwrap());
    let stats = Harness::new(&test_store.store, &policy, &config)
        .run(&workload)
        .unwrap();

    let sum: u64 = stats.workers.iter().map(|w| w.iterations).sum();
    assert_eq!(stats.iterations, sum);
    assert_eq!(test_store.count("history"), stats.iterations);
    for worker in &stats.workers {
        if let Some(last) = worker.last_start {
            assert!(last < config.benchtime);
        }
    }
}

#[test]
fn unseeded_store_collapses_under_fail_fast() {
    let test_store = TestStore::new();
    let config = tpcb::BenchConfig {
        init: false,
        ..quick_config(1, 2, 2_000, false)
    };
    let err = run_on(&test_store.store, &config, &FailFast::new()).unwrap_err();
    assert!(matches!(err, Error::RecordMissing { collection: "accounts", .. }));
}

#[test]
fn collect_errors_reports_every_failure() {
    let test_store = TestStore::new();
    let config = quick_config(1, 4, 100, false);
    let policy = CollectErrors::new();
    let seen = AtomicU64::new(0);
    let op = |store: &Store, rng: &mut rand::rngs::StdRng| -> tpcb::Result<()> {
        seen.fetch_add(1, Ordering::Relaxed);
        Workload::new(Mode::ReadOnly, Scale::new(1).unwrap()).execute(store, rng)
    };

    let stats = Harness::new(&test_store.store, &policy, &config)
        .run(&op)
        .unwrap();
    assert_eq!(stats.iterations, 0);
    assert_eq!(stats.errors.len(), 4);
    assert_eq!(seen.load(Ordering::Relaxed), 4);
    assert!(stats.errors.iter().all(|e| e.error.is_invariant_violation()));
}
