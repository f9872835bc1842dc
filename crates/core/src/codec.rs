//! Key and value encoding
//!
//! Keys are the canonical decimal text of a non-negative id (no sign, no
//! leading zeros). Values are the JSON form of the record.
//!
//! A value that fails to decode was written by this program, so decode
//! failures are reported as corruption rather than bad input.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// A row type bound to the collection that stores it
pub trait Record: Serialize + DeserializeOwned {
    /// Name of the collection holding this record type
    const COLLECTION: &'static str;
}

/// Canonical key for an id
pub fn key_for(id: u64) -> String {
    id.to_string()
}

/// Parse a key back to its id, accepting only the canonical form
pub fn parse_key(key: &str) -> Option<u64> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Serialize a record for its collection
pub fn encode<R: Record>(record: &R) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| Error::Codec {
        collection: R::COLLECTION,
        reason: e.to_string(),
    })
}

/// Deserialize a record read from its collection
pub fn decode<R: Record>(bytes: &[u8]) -> Result<R> {
    serde_json::from_slice(bytes).map_err(|e| Error::Codec {
        collection: R::COLLECTION,
        reason: e.to_string(),
    })
}
