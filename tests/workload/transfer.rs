//! Transfer atomicity and balance conservation

use std::sync::Arc;
use std::thread;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::common::*;
use tpcb::{
    apply_transfer, decode, random_transfer, seed_dataset, transfer, Account, Branch, Error,
    History, Teller, TransferDraw,
};

fn seeded() -> TestStore {
    let test_store = TestStore::new();
    seed_dataset(&test_store.store, Scale::new(1).unwrap(), 20_000).unwrap();
    test_store
}

fn balances(store: &Store, draw: &TransferDraw) -> (i64, i64, i64) {
    store
        .view(|txn| {
            Ok((
                txn.load::<Account>(draw.account)?.balance,
                txn.load::<Teller>(draw.teller)?.balance,
                txn.load::<Branch>(draw.branch)?.balance,
            ))
        })
        .unwrap()
}

#[test]
fn committed_transfer_moves_every_balance_by_delta() {
    let test_store = seeded();
    let store = &test_store.store;

    let earlier = TransferDraw {
        account: 17,
        teller: 2,
        branch: 0,
        delta: 300,
    };
    let first_seq = transfer(store, &earlier).unwrap();

    let draw = TransferDraw {
        account: 17,
        teller: 8,
        branch: 0,
        delta: -4_999,
    };
    let before = balances(store, &draw);
    let seq = transfer(store, &draw).unwrap();
    let after = balances(store, &draw);

    assert_eq!(after.0, before.0 - 4_999);
    assert_eq!(after.1, before.1 - 4_999);
    assert_eq!(after.2, before.2 - 4_999);
    assert!(seq > first_seq);
    assert_eq!(test_store.count("history"), 2);

    let entry: History = store.view(|txn| txn.load(seq)).unwrap();
    assert_eq!(entry.account_id, 17);
    assert_eq!(entry.teller_id, 8);
    assert_eq!(entry.branch_id, 0);
    assert_eq!(entry.delta, -4_999);
}

#[test]
fn failed_transaction_leaves_no_trace() {
    let test_store = seeded();
    let store = &test_store.store;
    let draw = TransferDraw {
        account: 99_999,
        teller: 9,
        branch: 0,
        delta: 1_234,
    };
    let before = balances(store, &draw);
    let seq_before = store.view(|txn| txn.last_sequence("history")).unwrap();

    let result: tpcb::Result<u64> = store.update(|txn| {
        apply_transfer(txn, &draw, Utc::now())?;
        Err(Error::Injected("after all four writes".into()))
    });
    assert!(matches!(result, Err(Error::Injected(_))));

    assert_eq!(balances(store, &draw), before);
    assert_eq!(test_store.count("history"), 0);
    assert_eq!(
        store.view(|txn| txn.last_sequence("history")).unwrap(),
        seq_before
    );
}

#[test]
fn missing_teller_aborts_account_write() {
    let test_store = seeded();
    let store = &test_store.store;
    let err = transfer(
        store,
        &TransferDraw {
            account: 5,
            teller: 10,
            branch: 0,
            delta: 50,
        },
    )
    .unwrap_err();
    assert!(err.is_invariant_violation());
    let account: Account = store.view(|txn| txn.load(5)).unwrap();
    assert_eq!(account.balance, 0);
}

#[test]
fn concurrent_transfers_conserve_totals() {
    let test_store = seeded();
    let store = Arc::new(test_store.store);
    let scale = Scale::new(1).unwrap();

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(t);
                for _ in 0..50 {
                    random_transfer(&store, scale, &mut rng).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let sum = |collection: &str| -> i64 {
        store
            .view(|txn| txn.scan(collection))
            .unwrap()
            .iter()
            .map(|(_, bytes)| match collection {
                "accounts" => decode::<Account>(bytes).unwrap().balance,
                "tellers" => decode::<Teller>(bytes).unwrap().balance,
                "branches" => decode::<Branch>(bytes).unwrap().balance,
                _ => decode::<History>(bytes).unwrap().delta,
            })
            .sum()
    };

    let history = sum("history");
    assert_eq!(sum("accounts"), history);
    assert_eq!(sum("tellers"), history);
    assert_eq!(sum("branches"), history);
    assert_eq!(
        store.view(|txn| txn.last_sequence("history")).unwrap(),
        200
    );
}
