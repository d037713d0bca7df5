//! Flashcard domain model.
//!
//! # Invariants
//! - `shelf_id` names exactly one shelf present in the owning store.
//! - `question` is 1..=150 and `answer` 1..=500 characters after trim.
//!
//! Serialized with `shelfId` so records written by earlier builds load as-is.

use crate::model::id::EntityId;
use crate::model::validation::{normalize_text, TextField, ValidationError};
use serde::{Deserialize, Serialize};

/// Question/answer pair belonging to one shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: EntityId,
    pub shelf_id: EntityId,
    pub question: String,
    pub answer: String,
}

/// Validated question/answer pair, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardText {
    pub question: String,
    pub answer: String,
}

impl CardText {
    /// Validates both fields together; nothing is returned unless both pass.
    pub fn parse(question: &str, answer: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            question: normalize_text(TextField::Question, question)?,
            answer: normalize_text(TextField::Answer, answer)?,
        })
    }
}

impl Flashcard {
    pub fn new(id: EntityId, shelf_id: EntityId, text: CardText) -> Self {
        Self {
            id,
            shelf_id,
            question: text.question,
            answer: text.answer,
        }
    }
}
