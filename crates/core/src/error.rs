//! Error types for the workload generator
//!
//! Every failure the benchmark can observe is collected here.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for workload operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the workload generator
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (database file, config file)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error raised by the storage engine (open, transaction, commit)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A collection was read before it was created
    #[error("Collection not found: {0}")]
    CollectionMissing(String),

    /// A seeded record is absent; the dataset violates its schema
    #[error("{collection} record not found for key {key}")]
    RecordMissing {
        /// Collection that was read
        collection: &'static str,
        /// Key that was looked up
        key: String,
    },

    /// Record could not be encoded or decoded
    #[error("Codec error in {collection}: {reason}")]
    Codec {
        /// Collection the record belongs to
        collection: &'static str,
        /// Underlying serializer message
        reason: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Failure injected by a caller to exercise rollback
    #[error("Injected failure: {0}")]
    Injected(String),

    /// The run was collapsed after another worker failed
    #[error("Run aborted after a worker failure")]
    Aborted,
}

impl Error {
    /// Build a storage error from any displayable engine error
    pub fn storage(e: impl std::fmt::Display) -> Self {
        Error::Storage(e.to_string())
    }

    /// Build a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// True for errors that mean the seeded dataset is corrupt
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Error::RecordMissing { .. } | Error::Codec { .. })
    }
}
