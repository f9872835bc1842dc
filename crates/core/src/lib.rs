//! Core types for the TPC-B-like workload
//!
//! This crate defines the foundational types used throughout the system:
//! - Record types for the four collections and the dataset scale
//! - Key and value codec
//! - Benchmark configuration
//! - Error type

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod codec;
pub mod config;
pub mod error;
pub mod schema;

pub use codec::{decode, encode, key_for, parse_key, Record};
pub use config::{BenchConfig, Durability, Mode, CONFIG_FILE_NAME, DEFAULT_BATCH_SIZE};
pub use error::{Error, Result};
pub use schema::{
    Account, Balance, Branch, History, Scale, Teller, ACCOUNTS_PER_BRANCH, COLLECTIONS,
    TELLERS_PER_BRANCH,
};
