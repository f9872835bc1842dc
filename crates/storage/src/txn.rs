//! Transaction handles
//!
//! [`ReadTxn`] and [`WriteTxn`] wrap the engine's transactions and address
//! collections by name. Both implement [`Readable`], which carries the
//! typed accessors the workload uses (`get`, `load`) on top of raw byte
//! access.
//!
//! Collections map one-to-one onto redb tables keyed by `&str` with byte
//! values. Sequence counters live in the reserved `__sequences` table, one
//! row per collection, and are updated inside the caller's write
//! transaction.

use redb::{ReadableTable, TableDefinition, TableError};
use tpcb_core::{decode, encode, key_for, Error, Record, Result};

/// Reserved table holding the last issued sequence number per collection
pub(crate) const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("__sequences");

pub(crate) fn collection_def(name: &str) -> TableDefinition<'_, &'static str, &'static [u8]> {
    TableDefinition::new(name)
}

fn table_err(name: &str, e: TableError) -> Error {
    match e {
        TableError::TableDoesNotExist(_) => Error::CollectionMissing(name.to_string()),
        other => Error::storage(other),
    }
}

/// Operations available in both read-only and read-write transactions
pub trait Readable {
    /// Raw value stored under `key`, if any
    fn get_raw(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Number of records, counted by scanning from the first key
    fn count(&self, collection: &str) -> Result<u64>;

    /// All records in key order
    fn scan(&self, collection: &str) -> Result<Vec<(String, Vec<u8>)>>;

    /// Last sequence number issued for `collection`; 0 if none
    fn last_sequence(&self, collection: &str) -> Result<u64>;

    /// Decode the record with id `id`, if present
    fn get<R: Record>(&self, id: u64) -> Result<Option<R>> {
        self.get_raw(R::COLLECTION, &key_for(id))?
            .map(|bytes| decode::<R>(&bytes))
            .transpose()
    }

    /// Decode the record with id `id`; absence is `Error::RecordMissing`
    fn load<R: Record>(&self, id: u64) -> Result<R> {
        self.get::<R>(id)?.ok_or_else(|| Error::RecordMissing {
            collection: R::COLLECTION,
            key: key_for(id),
        })
    }
}

/// Read-only snapshot transaction
pub struct ReadTxn {
    inner: redb::ReadTransaction,
}

impl ReadTxn {
    pub(crate) fn new(inner: redb::ReadTransaction) -> Self {
        ReadTxn { inner }
    }
}

impl std::fmt::Debug for ReadTxn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadTxn").finish_non_exhaustive()
    }
}

impl Readable for ReadTxn {
    fn get_raw(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let table = self
            .inner
            .open_table(collection_def(collection))
            .map_err(|e| table_err(collection, e))?;
        let value = table
            .get(key)
            .map_err(Error::storage)?
            .map(|guard| guard.value().to_vec());
        Ok(value)
    }

    fn count(&self, collection: &str) -> Result<u64> {
        let table = self
            .inner
            .open_table(collection_def(collection))
            .map_err(|e| table_err(collection, e))?;
        count_entries(&table)
    }

    fn scan(&self, collection: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let table = self
            .inner
            .open_table(collection_def(collection))
            .map_err(|e| table_err(collection, e))?;
        collect_entries(&table)
    }

    fn last_sequence(&self, collection: &str) -> Result<u64> {
        let table = match self.inner.open_table(SEQUENCES) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(0),
            Err(e) => return Err(Error::storage(e)),
        };
        let last = table
            .get(collection)
            .map_err(Error::storage)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        Ok(last)
    }
}

/// Read-write transaction. Committed or rolled back by [`crate::Store::update`].
pub struct WriteTxn {
    inner: redb::WriteTransaction,
}

impl WriteTxn {
    pub(crate) fn new(inner: redb::WriteTransaction) -> Self {
        WriteTxn { inner }
    }

    pub(crate) fn inner(&self) -> &redb::WriteTransaction {
        &self.inner
    }

    pub(crate) fn into_inner(self) -> redb::WriteTransaction {
        self.inner
    }

    /// Create or overwrite `key` in `collection`
    pub fn put(&mut self, collection: &str, key: &str, value: &[u8]) -> Result<()> {
        let mut table = self
            .inner
            .open_table(collection_def(collection))
            .map_err(|e| table_err(collection, e))?;
        table.insert(key, value).map_err(Error::storage)?;
        Ok(())
    }

    /// Encode `record` and store it under id `id`
    pub fn store<R: Record>(&mut self, id: u64, record: &R) -> Result<()> {
        let bytes = encode(record)?;
        self.put(R::COLLECTION, &key_for(id), &bytes)
    }

    /// Allocate the next sequence number for `collection`.
    ///
    /// Numbers start at 1 and increase by one per call. The allocation is
    /// part of this transaction: a rollback returns the number to the pool.
    pub fn next_sequence(&mut self, collection: &str) -> Result<u64> {
        let mut table = self.inner.open_table(SEQUENCES).map_err(Error::storage)?;
        let current = table
            .get(collection)
            .map_err(Error::storage)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let next = current
            .checked_add(1)
            .ok_or_else(|| Error::storage(format!("sequence exhausted for {}", collection)))?;
        table.insert(collection, next).map_err(Error::storage)?;
        Ok(next)
    }

    /// Allocate a sequence number and store `record` under it
    pub fn append<R: Record>(&mut self, record: &R) -> Result<u64> {
        let seq = self.next_sequence(R::COLLECTION)?;
        self.store(seq, record)?;
        Ok(seq)
    }
}

impl std::fmt::Debug for WriteTxn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteTxn").finish_non_exhaustive()
    }
}

impl Readable for WriteTxn {
    fn get_raw(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let table = self
            .inner
            .open_table(collection_def(collection))
            .map_err(|e| table_err(collection, e))?;
        let value = table
            .get(key)
            .map_err(Error::storage)?
            .map(|guard| guard.value().to_vec());
        Ok(value)
    }

    fn count(&self, collection: &str) -> Result<u64> {
        let table = self
            .inner
            .open_table(collection_def(collection))
            .map_err(|e| table_err(collection, e))?;
        count_entries(&table)
    }

    fn scan(&self, collection: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let table = self
            .inner
            .open_table(collection_def(collection))
            .map_err(|e| table_err(collection, e))?;
        collect_entries(&table)
    }

    fn last_sequence(&self, collection: &str) -> Result<u64> {
        let table = self.inner.open_table(SEQUENCES).map_err(Error::storage)?;
        let last = table
            .get(collection)
            .map_err(Error::storage)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        Ok(last)
    }
}

fn count_entries<T>(table: &T) -> Result<u64>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    let mut count = 0u64;
    for entry in table.iter().map_err(Error::storage)? {
        entry.map_err(Error::storage)?;
        count += 1;
    }
    Ok(count)
}

fn collect_entries<T>(table: &T) -> Result<Vec<(String, Vec<u8>)>>
where
    T: ReadableTable<&'static str, &'static [u8]>,
{
    let mut entries = Vec::new();
    for entry in table.iter().map_err(Error::storage)? {
        let (key, value) = entry.map_err(Error::storage)?;
        entries.push((key.value().to_string(), value.value().to_vec()));
    }
    Ok(entries)
}
