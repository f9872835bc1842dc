//! Dataset seeding
//!
//! Seeding only appends. For each collection the current record count is
//! read first; if it already meets the target nothing is written, so a rerun
//! after a completed seed is a no-op. Otherwise records are written starting
//! at the first missing id, `batch_size` per transaction. A crash mid-seed
//! loses at most the batch in flight and the next run resumes from the
//! committed count.
//!
//! Keys are assumed dense: a collection holding `k` records holds ids
//! `0..k`. That holds for anything this module wrote.

use tpcb_core::{Account, Branch, Record, Result, Scale, Teller, COLLECTIONS};
use tpcb_storage::{Readable, Store};
use tracing::{debug, info};

/// What seeding did to one collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Collection name
    pub collection: &'static str,
    /// Records present before seeding
    pub existing: u64,
    /// Records written by this call
    pub written: u64,
}

impl SeedOutcome {
    /// True when the collection was already complete
    pub fn was_complete(&self) -> bool {
        self.written == 0
    }
}

/// Create the four collections if absent.
pub fn create_schema(store: &Store) -> Result<()> {
    store.create_collections(&COLLECTIONS)
}

/// Ensure the collection for `R` holds ids `0..target`.
///
/// Missing ids are produced by `generator(id)` and written `batch_size` per
/// transaction. Existing records are never rewritten.
///
/// # Errors
///
/// Any storage or codec failure is returned as is. Batches committed before
/// the failure stay committed.
pub fn ensure_filled<R, F>(store: &Store, target: u64, batch_size: u64, generator: F) -> Result<SeedOutcome>
where
    R: Record,
    F: Fn(u64) -> R,
{
    let batch_size = batch_size.max(1);
    let existing = store.view(|txn| txn.count(R::COLLECTION))?;
    let mut outcome = SeedOutcome {
        collection: R::COLLECTION,
        existing,
        written: 0,
    };
    if existing >= target {
        debug!(collection = R::COLLECTION, existing, target, "collection already filled");
        return Ok(outcome);
    }

    info!(collection = R::COLLECTION, target, created = existing, "filling collection");
    let mut created = existing;
    while created < target {
        let end = created.saturating_add(batch_size).min(target);
        store.update(|txn| {
            for id in created..end {
                txn.store(id, &generator(id))?;
            }
            Ok(())
        })?;
        outcome.written += end - created;
        created = created.saturating_add(batch_size);
        debug!(collection = R::COLLECTION, target, created = end, "batch committed");
    }
    info!(collection = R::COLLECTION, written = outcome.written, "collection filled");
    Ok(outcome)
}

/// Seed accounts, tellers and branches for `scale`.
///
/// History is not seeded; it only grows through transfers.
pub fn seed_dataset(store: &Store, scale: Scale, batch_size: u64) -> Result<Vec<SeedOutcome>> {
    info!(scale = scale.factor(), "seeding dataset");
    Ok(vec![
        ensure_filled(store, scale.accounts(), batch_size, Account::seed)?,
        ensure_filled(store, scale.tellers(), batch_size, Teller::seed)?,
        ensure_filled(store, scale.branches(), batch_size, Branch::seed)?,
    ])
}
