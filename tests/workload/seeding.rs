//! Seeding: idempotence, completeness, resumability

use crate::common::*;
use tpcb::{decode, ensure_filled, key_for, parse_key, seed_dataset, Account, Teller};

fn tagged_teller(tag: &'static str) -> impl Fn(u64) -> Teller {
    move |id| Teller {
        filler: tag.to_string(),
        ..Teller::seed(id)
    }
}

#[test]
fn second_seed_changes_nothing() {
    let test_store = TestStore::new();
    let scale = Scale::new(1).unwrap();

    seed_dataset(&test_store.store, scale, 1000).unwrap();
    let accounts = test_store.dump("accounts");
    let tellers = test_store.dump("tellers");
    let branches = test_store.dump("branches");

    let outcomes = seed_dataset(&test_store.store, scale, 1000).unwrap();
    assert!(outcomes.iter().all(|o| o.written == 0));
    assert_eq!(test_store.dump("accounts"), accounts);
    assert_eq!(test_store.dump("tellers"), tellers);
    assert_eq!(test_store.dump("branches"), branches);
}

#[test]
fn seeded_keys_are_exactly_zero_to_target() {
    let test_store = TestStore::new();
    ensure_filled(&test_store.store, 2_345, 1000, Account::seed).unwrap();

    let records = test_store.dump("accounts");
    assert_eq!(records.len(), 2_345);

    let mut ids: Vec<u64> = records
        .iter()
        .map(|(key, value)| {
            let id = parse_key(key).expect("canonical key");
            let account: Account = decode(value).expect("decodable account");
            assert_eq!(account.id, id);
            id
        })
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (0..2_345).collect::<Vec<_>>());
}

#[test]
fn resume_leaves_existing_records_untouched() {
    let test_store = TestStore::new();
    ensure_filled(&test_store.store, 1_500, 1000, tagged_teller("first")).unwrap();

    let outcome = ensure_filled(&test_store.store, 4_200, 1000, tagged_teller("second")).unwrap();
    assert_eq!(outcome.existing, 1_500);
    assert_eq!(outcome.written, 2_700);
    assert_eq!(test_store.count("tellers"), 4_200);

    test_store
        .store
        .view(|txn| {
            for id in [0u64, 1_000, 1_499] {
                assert_eq!(txn.load::<Teller>(id)?.filler, "first");
            }
            for id in [1_500u64, 3_000, 4_199] {
                assert_eq!(txn.load::<Teller>(id)?.filler, "second");
            }
            assert!(txn.get_raw("tellers", &key_for(4_200))?.is_none());
            Ok(())
        })
        .unwrap();
}

#[test]
fn seeding_survives_reopen() {
    let test_store = TestStore::new();
    let path = test_store.dir.path().join("reopen.redb");
    {
        let store = Store::open(&path, StoreOptions::default()).unwrap();
        create_schema(&store).unwrap();
        ensure_filled(&store, 700, 250, Teller::seed).unwrap();
    }
    let store = Store::open(&path, StoreOptions::default()).unwrap();
    create_schema(&store).unwrap();
    let outcome = ensure_filled(&store, 1_000, 250, Teller::seed).unwrap();
    assert_eq!(outcome.existing, 700);
    assert_eq!(outcome.written, 300);
}
