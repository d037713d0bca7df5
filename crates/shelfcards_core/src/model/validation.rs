//! Text normalization rules for user-entered fields.
//!
//! # Invariants
//! - Surrounding whitespace is trimmed before the length check.
//! - Length is measured in Unicode scalar values.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum shelf title length after trimming.
pub const MAX_SHELF_TITLE_CHARS: usize = 50;
/// Maximum flashcard question length after trimming.
pub const MAX_QUESTION_CHARS: usize = 150;
/// Maximum flashcard answer length after trimming.
pub const MAX_ANSWER_CHARS: usize = 500;

/// User-entered text field subject to validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    ShelfTitle,
    Question,
    Answer,
}

impl TextField {
    pub fn max_chars(self) -> usize {
        match self {
            Self::ShelfTitle => MAX_SHELF_TITLE_CHARS,
            Self::Question => MAX_QUESTION_CHARS,
            Self::Answer => MAX_ANSWER_CHARS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ShelfTitle => "shelf title",
            Self::Question => "question",
            Self::Answer => "answer",
        }
    }
}

impl Display for TextField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Rejected text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty after trimming.
    Empty(TextField),
    /// Field exceeds its limit after trimming.
    TooLong {
        field: TextField,
        max: usize,
        actual: usize,
    },
}

impl ValidationError {
    pub fn field(&self) -> TextField {
        match self {
            Self::Empty(field) => *field,
            Self::TooLong { field, .. } => *field,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(field) => write!(f, "{field} cannot be empty"),
            Self::TooLong { field, max, actual } => write!(
                f,
                "{field} cannot exceed {max} characters (got {actual})"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and checks it against the limit of `field`.
///
/// Returns the trimmed text that should be stored.
pub fn normalize_text(field: TextField, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty(field));
    }

    let actual = trimmed.chars().count();
    let max = field.max_chars();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }

    Ok(trimmed.to_string())
}
