//! In-memory key-value storage with an optional byte quota.
//!
//! Mirrors browser local storage: usage is the sum of key and value byte
//! lengths, and a write that would push usage past the quota is rejected
//! without changing anything.

use crate::repo::storage::{PersistenceAdapter, PersistenceError, PersistenceResult};
use std::collections::HashMap;

/// `HashMap`-backed adapter used by tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
    unavailable: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage that rejects writes beyond `quota_bytes` total.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Replaces the quota; `None` lifts it. Existing entries are kept even if
    /// they already exceed the new limit.
    pub fn set_quota(&mut self, quota_bytes: Option<usize>) {
        self.quota_bytes = quota_bytes;
    }

    /// Makes every subsequent write fail with `PersistenceError::Unavailable`.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Writes raw text, bypassing quota checks. Used to seed hand-edited state.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }

    fn ensure_writable(&self) -> PersistenceResult<()> {
        if self.unavailable {
            return Err(PersistenceError::Unavailable(
                "memory storage is marked unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn check_quota<'a>(
        &self,
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> PersistenceResult<()> {
        let Some(quota) = self.quota_bytes else {
            return Ok(());
        };

        let mut projected = self.used_bytes();
        for (key, value) in entries {
            let previous = self.entries.get(key).map_or(0, |old| key.len() + old.len());
            projected = projected.saturating_sub(previous) + key.len() + value.len();
            if projected > quota {
                return Err(PersistenceError::QuotaExceeded {
                    key: key.to_string(),
                    needed: projected,
                    quota,
                });
            }
        }
        Ok(())
    }
}

impl PersistenceAdapter for MemoryStorage {
    fn save(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        self.ensure_writable()?;
        self.check_quota([(key, value)])?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    /// All-or-nothing: the quota is checked against the combined write.
    fn save_all(&mut self, entries: &[(&str, String)]) -> PersistenceResult<()> {
        self.ensure_writable()?;
        self.check_quota(entries.iter().map(|(key, value)| (*key, value.as_str())))?;
        for (key, value) in entries {
            self.entries.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStorage;
    use crate::repo::storage::{PersistenceAdapter, PersistenceError};

    #[test]
    fn save_then_load_returns_value() {
        let mut storage = MemoryStorage::new();
        storage.save("shelves", "[]").unwrap();
        assert_eq!(storage.load("shelves").as_deref(), Some("[]"));
        assert_eq!(storage.load("flashcards"), None);
    }

    #[test]
    fn overwrite_counts_only_new_value_against_quota() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.save("k", "123456789").unwrap();
        storage.save("k", "987654321").unwrap();
        assert_eq!(storage.used_bytes(), 10);
    }

    #[test]
    fn quota_violation_leaves_entries_untouched() {
        let mut storage = MemoryStorage::with_quota(12);
        storage.save("a", "12345").unwrap();

        let err = storage
            .save_all(&[("a", "1".to_string()), ("b", "1234567890".to_string())])
            .unwrap_err();
        assert!(matches!(err, PersistenceError::QuotaExceeded { ref key, .. } if key == "b"));
        assert_eq!(storage.get("a"), Some("12345"));
        assert_eq!(storage.get("b"), None);
    }

    #[test]
    fn unavailable_storage_rejects_writes() {
        let mut storage = MemoryStorage::new();
        storage.set_unavailable(true);
        let err = storage.save("k", "v").unwrap_err();
        assert!(matches!(err, PersistenceError::Unavailable(_)));
    }

    #[test]
    fn changing_quota_applies_to_later_writes() {
        let mut storage = MemoryStorage::with_quota(8);
        assert!(storage.save("k", "12345678").is_err());

        storage.set_quota(None);
        storage.save("k", "12345678").unwrap();

        storage.set_quota(Some(4));
        assert!(matches!(
            storage.save("j", "1"),
            Err(PersistenceError::QuotaExceeded { needed: 11, quota: 4, .. })
        ));
        assert_eq!(storage.get("k"), Some("12345678"));
    }
}
