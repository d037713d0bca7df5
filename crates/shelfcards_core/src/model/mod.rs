//! Library domain model: shelves, flashcards and their identifiers.
//!
//! # Responsibility
//! - Define the canonical records owned by the library store.
//! - Own the text rules shared by every write path.
//!
//! # Invariants
//! - Every entity is identified by a stable `EntityId` that is never reused.
//! - Stored text is always trimmed and within its field limit.

pub mod flashcard;
pub mod id;
pub mod shelf;
pub mod validation;
