//! Full runs: seed, drive workers, report

use std::time::Duration;

use crate::common::*;
use tpcb::{run, run_on, FailFast};

#[test]
fn read_only_run_seeds_and_reports() {
    let test_store = TestStore::new();
    let config = BenchConfig {
        concurrency: 1,
        benchtime: Duration::from_secs(1),
        scale: 1,
        rw_mode: false,
        init: true,
        durability: Durability::None,
        ..BenchConfig::default()
    };

    let outcome = run_on(&test_store.store, &config, &FailFast::new()).unwrap();

    let written: Vec<_> = outcome
        .seeded
        .iter()
        .map(|o| (o.collection, o.written))
        .collect();
    assert_eq!(
        written,
        vec![("accounts", 100_000), ("tellers", 10), ("branches", 1)]
    );
    assert_eq!(test_store.count("accounts"), 100_000);
    assert_eq!(test_store.count("tellers"), 10);
    assert_eq!(test_store.count("branches"), 1);
    assert_eq!(test_store.count("history"), 0);

    let report = &outcome.report;
    assert_eq!(report.name, "tpcb-readonly");
    assert!(outcome.stats.iterations > 0);
    assert_eq!(report.iterations, outcome.stats.iterations);
    assert_eq!(report.throughput_rps, outcome.stats.iterations as f64);
    let latency = report.latency_us.unwrap();
    assert!(latency.is_finite() && latency > 0.0);
}

#[test]
fn read_write_run_appends_one_history_per_iteration() {
    let test_store = TestStore::new();
    let config = quick_config(1, 4, 500, true);

    let outcome = run_on(&test_store.store, &config, &FailFast::new()).unwrap();

    assert_eq!(outcome.report.name, "tpcb-like");
    assert!(outcome.stats.iterations > 0);
    assert_eq!(test_store.count("history"), outcome.stats.iterations);
    assert_eq!(
        test_store
            .store
            .view(|txn| txn.last_sequence("history"))
            .unwrap(),
        outcome.stats.iterations
    );
    assert_eq!(outcome.stats.conflicts, 0);
}

#[test]
fn rerun_without_init_reuses_dataset() {
    let test_store = TestStore::new();
    let path = test_store.dir.path().join("rerun.redb");
    let first = BenchConfig {
        db_path: path.clone(),
        ..quick_config(1, 2, 200, true)
    };
    let outcome = run(&first, &FailFast::new()).unwrap();
    let history_after_first = outcome.stats.iterations;

    let second = BenchConfig {
        init: false,
        ..first.clone()
    };
    let outcome = run(&second, &FailFast::new()).unwrap();
    assert!(outcome.seeded.is_empty());

    let store = Store::open(&path, StoreOptions::default()).unwrap();
    let history = store.view(|txn| txn.count("history")).unwrap();
    assert_eq!(history, history_after_first + outcome.stats.iterations);
}

#[test]
fn invalid_config_is_rejected_before_opening() {
    let test_store = TestStore::new();
    let path = test_store.dir.path().join("never.redb");
    let config = BenchConfig {
        concurrency: 0,
        db_path: path.clone(),
        ..BenchConfig::default()
    };
    assert!(run(&config, &FailFast::new()).is_err());
    assert!(!path.exists());
}
