//! Transaction mix
//!
//! Two operations, each one atomic transaction:
//!
//! - **Balance lookup** (read-only): read one random account.
//! - **Transfer** (read-write): add a random delta to one random account,
//!   one random teller and one random branch, then append a history entry
//!   under a fresh sequence number.
//!
//! The account, teller and branch of a transfer are independent draws; the
//! account need not belong to the branch. A missing row is a broken dataset
//! and surfaces as `Error::RecordMissing`. No retry is attempted on any
//! error.

use std::ops::Range;

use chrono::{DateTime, Utc};
use rand::Rng;
use tpcb_core::{Account, Balance, Branch, History, Mode, Result, Scale, Teller};
use tpcb_storage::{Readable, Store, WriteTxn};

/// Transfer amounts are drawn uniformly from this range.
pub const DELTA_RANGE: Range<i64> = -5000..5000;

/// Random inputs of one transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferDraw {
    /// Account to adjust
    pub account: u64,
    /// Teller to adjust
    pub teller: u64,
    /// Branch to adjust, drawn independently of the account's branch
    pub branch: u64,
    /// Amount added to each balance
    pub delta: i64,
}

impl TransferDraw {
    /// Draw ids uniformly from the dataset and a delta from [`DELTA_RANGE`]
    pub fn random<G: Rng + ?Sized>(scale: Scale, rng: &mut G) -> Self {
        TransferDraw {
            account: rng.gen_range(0..scale.accounts()),
            teller: rng.gen_range(0..scale.tellers()),
            branch: rng.gen_range(0..scale.branches()),
            delta: rng.gen_range(DELTA_RANGE),
        }
    }
}

/// Read the balance of account `account`.
pub fn read_balance(store: &Store, account: u64) -> Result<i64> {
    store.view(|txn| Ok(txn.load::<Account>(account)?.balance))
}

/// Read the balance of a uniformly drawn account.
pub fn random_read<G: Rng + ?Sized>(store: &Store, scale: Scale, rng: &mut G) -> Result<i64> {
    let account = rng.gen_range(0..scale.accounts());
    read_balance(store, account)
}

fn adjust<R: Balance>(txn: &mut WriteTxn, id: u64, delta: i64) -> Result<()> {
    let mut row = txn.load::<R>(id)?;
    let balance = row.balance_mut();
    *balance = balance.wrapping_add(delta);
    txn.store(id, &row)
}

/// Apply a transfer inside an open write transaction.
///
/// Returns the history sequence number allocated for it. Nothing is durable
/// until the enclosing transaction commits.
pub fn apply_transfer(txn: &mut WriteTxn, draw: &TransferDraw, now: DateTime<Utc>) -> Result<u64> {
    adjust::<Account>(txn, draw.account, draw.delta)?;
    adjust::<Teller>(txn, draw.teller, draw.delta)?;
    adjust::<Branch>(txn, draw.branch, draw.delta)?;
    txn.append(&History {
        teller_id: draw.teller,
        branch_id: draw.branch,
        account_id: draw.account,
        delta: draw.delta,
        mtime: now,
        filler: String::new(),
    })
}

/// Run `draw` as one atomic transfer, returning its history sequence number.
pub fn transfer(store: &Store, draw: &TransferDraw) -> Result<u64> {
    store.update(|txn| apply_transfer(txn, draw, Utc::now()))
}

/// Draw and run one transfer.
pub fn random_transfer<G: Rng + ?Sized>(store: &Store, scale: Scale, rng: &mut G) -> Result<u64> {
    let draw = TransferDraw::random(scale, rng);
    transfer(store, &draw)
}

/// One operation of the configured mode against a fixed dataset shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workload {
    /// Lookup or transfer
    pub mode: Mode,
    /// Id ranges to draw from
    pub scale: Scale,
}

impl Workload {
    /// Workload repeating `mode` over a dataset of `scale`
    pub fn new(mode: Mode, scale: Scale) -> Self {
        Workload { mode, scale }
    }

    /// Execute one operation
    pub fn run_once<G: Rng + ?Sized>(&self, store: &Store, rng: &mut G) -> Result<()> {
        match self.mode {
            Mode::ReadOnly => random_read(store, self.scale, rng).map(drop),
            Mode::ReadWrite => random_transfer(store, self.scale, rng).map(drop),
        }
    }
}
