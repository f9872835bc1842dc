//! Record types and dataset shape
//!
//! Four collections make up the dataset, each keyed by the decimal form of
//! an integer id:
//!
//! | Collection | Key | Cardinality |
//! |------------|-----|-------------|
//! | `accounts` | account id | scale × 100 000 |
//! | `tellers`  | teller id  | scale × 10 |
//! | `branches` | branch id  | scale |
//! | `history`  | sequence number | grows by one per transfer |
//!
//! Balances are signed and may go negative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::Record;
use crate::error::{Error, Result};

/// Accounts per unit of scale
pub const ACCOUNTS_PER_BRANCH: u64 = 100_000;
/// Tellers per unit of scale
pub const TELLERS_PER_BRANCH: u64 = 10;

/// Collection names, in creation order
pub const COLLECTIONS: [&str; 4] = [
    Account::COLLECTION,
    Teller::COLLECTION,
    Branch::COLLECTION,
    History::COLLECTION,
];

/// A bank account row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account id, also the record key
    #[serde(rename = "aid")]
    pub id: u64,
    /// Home branch
    #[serde(rename = "bid")]
    pub branch_id: u64,
    /// Signed balance, zero when seeded
    #[serde(rename = "abalance")]
    pub balance: i64,
    /// Padding; empty in seeded rows
    #[serde(default)]
    pub filler: String,
}

/// A teller row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teller {
    /// Teller id, also the record key
    #[serde(rename = "tid")]
    pub id: u64,
    /// Branch the teller works at
    #[serde(rename = "bid")]
    pub branch_id: u64,
    /// Signed balance, zero when seeded
    #[serde(rename = "tbalance")]
    pub balance: i64,
    /// Padding; empty in seeded rows
    #[serde(default)]
    pub filler: String,
}

/// A branch row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Branch id, also the record key
    #[serde(rename = "bid")]
    pub id: u64,
    /// Signed balance, zero when seeded
    #[serde(rename = "bbalance")]
    pub balance: i64,
    /// Padding; empty in seeded rows
    #[serde(default)]
    pub filler: String,
}

/// One append-only audit entry, written per transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    /// Teller drawn for the transfer
    #[serde(rename = "tid")]
    pub teller_id: u64,
    /// Branch drawn for the transfer
    #[serde(rename = "bid")]
    pub branch_id: u64,
    /// Account drawn for the transfer
    #[serde(rename = "aid")]
    pub account_id: u64,
    /// Amount added to all three balances
    pub delta: i64,
    /// Wall-clock time the transfer ran
    pub mtime: DateTime<Utc>,
    /// Padding
    #[serde(default)]
    pub filler: String,
}

impl Record for Account {
    const COLLECTION: &'static str = "accounts";
}

impl Record for Teller {
    const COLLECTION: &'static str = "tellers";
}

impl Record for Branch {
    const COLLECTION: &'static str = "branches";
}

impl Record for History {
    const COLLECTION: &'static str = "history";
}

impl Account {
    /// Seed row for account `id`
    pub fn seed(id: u64) -> Self {
        Account {
            id,
            branch_id: id / ACCOUNTS_PER_BRANCH,
            balance: 0,
            filler: String::new(),
        }
    }
}

impl Teller {
    /// Seed row for teller `id`
    pub fn seed(id: u64) -> Self {
        Teller {
            id,
            branch_id: id / TELLERS_PER_BRANCH,
            balance: 0,
            filler: String::new(),
        }
    }
}

impl Branch {
    /// Seed row for branch `id`
    pub fn seed(id: u64) -> Self {
        Branch {
            id,
            balance: 0,
            filler: String::new(),
        }
    }
}

/// Rows whose balance a transfer adjusts
pub trait Balance: Record {
    /// Mutable access to the balance column
    fn balance_mut(&mut self) -> &mut i64;
}

impl Balance for Account {
    fn balance_mut(&mut self) -> &mut i64 {
        &mut self.balance
    }
}

impl Balance for Teller {
    fn balance_mut(&mut self) -> &mut i64 {
        &mut self.balance
    }
}

impl Balance for Branch {
    fn balance_mut(&mut self) -> &mut i64 {
        &mut self.balance
    }
}

/// Dataset scale factor and the cardinalities derived from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale(u64);

impl Scale {
    /// Build a scale, rejecting zero and sizes whose account count overflows
    pub fn new(factor: u64) -> Result<Self> {
        if factor == 0 {
            return Err(Error::config("scale must be at least 1"));
        }
        factor
            .checked_mul(ACCOUNTS_PER_BRANCH)
            .ok_or_else(|| Error::config(format!("scale {} overflows the account range", factor)))?;
        Ok(Scale(factor))
    }

    /// Scale factor, equal to the number of branches
    pub fn factor(&self) -> u64 {
        self.0
    }

    /// Number of accounts, ids `0..accounts()`
    pub fn accounts(&self) -> u64 {
        self.0 * ACCOUNTS_PER_BRANCH
    }

    /// Number of tellers
    pub fn tellers(&self) -> u64 {
        self.0 * TELLERS_PER_BRANCH
    }

    /// Number of branches
    pub fn branches(&self) -> u64 {
        self.0
    }
}
