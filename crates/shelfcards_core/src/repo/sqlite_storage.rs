//! SQLite-backed key-value storage.
//!
//! # Responsibility
//! - Persist library records in the `kv_entries` table.
//! - Commit multi-key writes in a single transaction.
//!
//! # Invariants
//! - Only connections migrated to `latest_version()` are accepted.
//! - Read errors are logged and reported as absent values.
//! - After a read error on a key, writes are refused with
//!   `PersistenceError::Unavailable` until that key loads cleanly, so an
//!   unreadable library is never overwritten by an empty one.

use crate::db::migrations::{current_version, latest_version};
use crate::db::{DbError, DbResult};
use crate::repo::storage::{PersistenceAdapter, PersistenceError, PersistenceResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeSet;

const UPSERT_SQL: &str = "INSERT INTO kv_entries (key, value, updated_at)
     VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
     ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at;";

/// Key-value adapter over a migrated SQLite connection.
pub struct SqliteStorage<'conn> {
    conn: &'conn Connection,
    failed_reads: RefCell<BTreeSet<String>>,
}

impl<'conn> SqliteStorage<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn try_new(conn: &'conn Connection) -> DbResult<Self> {
        let actual_version = current_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(DbError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self {
            conn,
            failed_reads: RefCell::new(BTreeSet::new()),
        })
    }

    /// Keys whose last load hit a read error.
    pub fn failed_reads(&self) -> Vec<String> {
        self.failed_reads.borrow().iter().cloned().collect()
    }

    fn ensure_reads_clean(&self) -> PersistenceResult<()> {
        let failed = self.failed_reads.borrow();
        if failed.is_empty() {
            return Ok(());
        }
        let keys = failed.iter().map(String::as_str).collect::<Vec<_>>().join(",");
        Err(PersistenceError::Unavailable(format!(
            "refusing to write after failed read of `{keys}`"
        )))
    }

    /// Lists stored keys in ascending order.
    pub fn keys(&self) -> DbResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_entries ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

impl PersistenceAdapter for SqliteStorage<'_> {
    fn save(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        self.ensure_reads_clean()?;
        self.conn.execute(UPSERT_SQL, params![key, value])?;
        Ok(())
    }

    fn load(&self, key: &str) -> Option<String> {
        let result = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional();

        match result {
            Ok(value) => {
                if self.failed_reads.borrow_mut().remove(key) {
                    info!("event=storage_load module=repo status=recovered backend=sqlite key={key}");
                }
                value
            }
            Err(err) => {
                error!(
                    "event=storage_load module=repo status=error backend=sqlite key={key} error={err}"
                );
                self.failed_reads.borrow_mut().insert(key.to_string());
                None
            }
        }
    }

    fn save_all(&mut self, entries: &[(&str, String)]) -> PersistenceResult<()> {
        self.ensure_reads_clean()?;
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in entries {
            tx.execute(UPSERT_SQL, params![key, value])?;
        }
        tx.commit()?;
        Ok(())
    }
}
