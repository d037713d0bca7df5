//! Entity identifiers and their generator.
//!
//! # Responsibility
//! - Provide the opaque id type shared by shelves and flashcards.
//! - Issue ids that never collide with issued or loaded ids.
//!
//! # Invariants
//! - `IdGenerator::next_id` never returns a reserved id.
//! - Two ids issued within the same millisecond still differ by sequence.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

const RANDOM_SUFFIX_CHARS: usize = 8;

/// Opaque, immutable identifier for a shelf or flashcard.
///
/// Stored as text so ids written by older builds (plain millisecond
/// strings) load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// Issues unique entity ids for one store.
///
/// Ids have the shape `<epoch-ms>-<sequence>-<random>`. The millisecond
/// prefix keeps storage dumps roughly chronological, the process-wide
/// sequence separates ids created in the same millisecond, and the random
/// suffix separates processes.
#[derive(Debug, Default)]
pub struct IdGenerator {
    reserved: HashSet<EntityId>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an externally known id (e.g. loaded from storage) as taken.
    ///
    /// Returns `false` when the id was already reserved.
    pub fn reserve(&mut self, id: &EntityId) -> bool {
        self.reserved.insert(id.clone())
    }

    /// Returns whether `id` was issued or reserved by this generator.
    pub fn is_reserved(&self, id: &EntityId) -> bool {
        self.reserved.contains(id)
    }

    /// Returns a fresh id and reserves it.
    pub fn next_id(&mut self) -> EntityId {
        loop {
            let candidate = candidate_id();
            if self.reserved.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

fn candidate_id() -> EntityId {
    let sequence = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let random = Uuid::new_v4().simple().to_string();
    EntityId(format!(
        "{}-{sequence:06}-{}",
        epoch_millis(),
        &random[..RANDOM_SUFFIX_CHARS]
    ))
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0)
}
