//! Database handle and transaction entry points
//!
//! `Store` owns the redb database file. All access goes through two closure
//! runners:
//!
//! - [`Store::view`] runs a read-only snapshot transaction
//! - [`Store::update`] runs a read-write transaction that commits when the
//!   closure returns `Ok` and rolls back when it returns `Err`
//!
//! redb serializes write transactions internally; concurrent `update` calls
//! block until the writer ahead of them commits or aborts. Readers never
//! block writers.

use std::path::{Path, PathBuf};

use redb::{Builder, Database};
use tpcb_core::{Durability, Error, Result};
use tracing::{debug, warn};

use crate::txn::{collection_def, ReadTxn, WriteTxn, SEQUENCES};

/// Open-time settings for a [`Store`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Durability applied to every write transaction
    pub durability: Durability,
    /// Page cache size; engine default when `None`
    pub cache_size_mb: Option<usize>,
}

/// Handle to the on-disk transactional store.
///
/// `Store` is `Send + Sync`; share it across workers behind an `Arc`.
pub struct Store {
    db: Database,
    path: PathBuf,
    durability: redb::Durability,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("durability", &self.durability)
            .finish()
    }
}

impl Store {
    /// Open the database file at `path`, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the file cannot be opened or is not a
    /// valid database.
    pub fn open(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut builder = Builder::new();
        if let Some(mb) = options.cache_size_mb {
            builder.set_cache_size(mb.saturating_mul(1024 * 1024));
        }
        let db = builder.create(&path).map_err(Error::storage)?;
        debug!(path = %path.display(), durability = ?options.durability, "opened store");
        Ok(Store {
            db,
            path,
            durability: match options.durability {
                Durability::Immediate => redb::Durability::Immediate,
                Durability::Eventual => redb::Durability::Eventual,
                Durability::None => redb::Durability::None,
            },
        })
    }

    /// Database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create each named collection if it does not exist yet.
    ///
    /// Also creates the sequence table so that `last_sequence` works from
    /// read transactions before the first allocation.
    pub fn create_collections(&self, names: &[&str]) -> Result<()> {
        self.update(|txn| {
            for name in names {
                txn.inner().open_table(collection_def(name)).map_err(Error::storage)?;
            }
            txn.inner().open_table(SEQUENCES).map_err(Error::storage)?;
            Ok(())
        })
    }

    /// Run `f` inside a read-only transaction.
    pub fn view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ReadTxn) -> Result<T>,
    {
        let txn = ReadTxn::new(self.db.begin_read().map_err(Error::storage)?);
        f(&txn)
    }

    /// Run `f` inside a read-write transaction.
    ///
    /// Commits if `f` returns `Ok`. If `f` returns `Err` every write made
    /// by `f` is discarded, including sequence numbers it allocated, and the
    /// error is returned unchanged.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut WriteTxn) -> Result<T>,
    {
        let mut inner = self.db.begin_write().map_err(Error::storage)?;
        inner.set_durability(self.durability);
        let mut txn = WriteTxn::new(inner);
        match f(&mut txn) {
            Ok(value) => {
                txn.into_inner().commit().map_err(Error::storage)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(abort_err) = txn.into_inner().abort() {
                    warn!(error = %abort_err, "rollback failed");
                }
                Err(e)
            }
        }
    }
}
