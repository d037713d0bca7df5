//! JSON encoding of the persisted record sets.
//!
//! # Responsibility
//! - Name the stable storage keys.
//! - Serialize record collections and decode them leniently.
//!
//! # Invariants
//! - Decoding never fails: a missing, `null`, or non-array value is an empty
//!   collection, and individual malformed records are skipped.

use crate::repo::storage::PersistenceResult;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Storage key holding the full shelf collection.
pub const SHELVES_KEY: &str = "shelves";
/// Storage key holding the full flashcard collection.
pub const FLASHCARDS_KEY: &str = "flashcards";

/// Records recovered from one storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub records: Vec<T>,
    /// Number of entries that were present but could not be decoded.
    pub skipped: usize,
    /// The stored value as a whole was unreadable.
    pub corrupt: bool,
}

impl<T> Decoded<T> {
    fn empty(corrupt: bool) -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
            corrupt,
        }
    }

    /// Whether anything had to be discarded while decoding.
    pub fn is_lossy(&self) -> bool {
        self.corrupt || self.skipped > 0
    }
}

/// Serializes a record collection for storage.
pub fn encode_records<T: Serialize>(records: &[T]) -> PersistenceResult<String> {
    Ok(serde_json::to_string(records)?)
}

/// Decodes a stored collection, degrading to empty on any structural damage.
pub fn decode_records<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Decoded<T> {
    let Some(raw) = raw else {
        return Decoded::empty(false);
    };

    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(Value::Null) => return Decoded::empty(false),
        Ok(_) => {
            warn!("event=records_decode module=repo status=error key={key} reason=not_an_array");
            return Decoded::empty(true);
        }
        Err(err) => {
            warn!("event=records_decode module=repo status=error key={key} reason=invalid_json error={err}");
            return Decoded::empty(true);
        }
    };

    let total = items.len();
    let records = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<T>(item).ok())
        .collect::<Vec<_>>();
    let skipped = total - records.len();
    if skipped > 0 {
        warn!("event=records_decode module=repo status=partial key={key} skipped={skipped}");
    }

    Decoded {
        records,
        skipped,
        corrupt: false,
    }
}
