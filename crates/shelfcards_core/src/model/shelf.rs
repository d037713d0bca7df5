//! Shelf domain model.
//!
//! # Invariants
//! - `id` is immutable once issued.
//! - `title` is trimmed and 1..=50 characters long.

use crate::model::id::EntityId;
use crate::model::validation::{normalize_text, TextField, ValidationError};
use serde::{Deserialize, Serialize};

/// Named subject grouping that owns zero or more flashcards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelf {
    pub id: EntityId,
    pub title: String,
}

impl Shelf {
    /// Builds a shelf from raw title input, trimming and validating it.
    pub fn new(id: EntityId, title: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            title: normalize_text(TextField::ShelfTitle, title)?,
        })
    }
}
