//! Core library state for Shelfcards.
//! This crate is the single source of truth for shelf/flashcard invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::flashcard::{CardText, Flashcard};
pub use model::id::{EntityId, IdGenerator};
pub use model::shelf::Shelf;
pub use model::validation::{
    normalize_text, TextField, ValidationError, MAX_ANSWER_CHARS, MAX_QUESTION_CHARS,
    MAX_SHELF_TITLE_CHARS,
};
pub use repo::memory_storage::MemoryStorage;
pub use repo::records::{FLASHCARDS_KEY, SHELVES_KEY};
pub use repo::sqlite_storage::SqliteStorage;
pub use repo::storage::{PersistenceAdapter, PersistenceError, PersistenceResult};
pub use service::library_store::{LibraryStore, LoadReport, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
