//! CLI argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_DB_FILE_NAME: &str = "shelfcards.sqlite3";

/// Shelfcards - flashcards organized on subject shelves.
#[derive(Debug, Parser)]
#[command(name = "shelfcards")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Library database file (defaults to shelfcards.sqlite3 in the temp dir)
    #[arg(long, global = true, env = "SHELFCARDS_DB_PATH")]
    pub db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "SHELFCARDS_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(
        long,
        global = true,
        env = "SHELFCARDS_LOG_LEVEL",
        default_value = shelfcards_core::default_log_level()
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List shelves in display order
    Shelves,

    /// Create a shelf
    AddShelf { title: String },

    /// Rename a shelf
    RenameShelf { id: String, title: String },

    /// Remove a shelf and every card on it
    RemoveShelf { id: String },

    /// List the cards on a shelf
    Cards { shelf_id: String },

    /// Add a card to a shelf
    AddCard {
        shelf_id: String,
        question: String,
        answer: String,
    },

    /// Replace a card's question and answer
    RenameCard {
        id: String,
        question: String,
        answer: String,
    },

    /// Remove a card
    RemoveCard { id: String },

    /// Show a card's question, then flip it to its answer
    Flip { card_id: String },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn parses_add_card_with_db_override() {
        let cli = Cli::try_parse_from([
            "shelfcards",
            "--db",
            "/tmp/lib.sqlite3",
            "add-card",
            "s1",
            "What is 2+2?",
            "4",
        ])
        .unwrap();

        assert_eq!(cli.resolved_db_path(), PathBuf::from("/tmp/lib.sqlite3"));
        match cli.command {
            Command::AddCard {
                shelf_id,
                question,
                answer,
            } => {
                assert_eq!(shelf_id, "s1");
                assert_eq!(question, "What is 2+2?");
                assert_eq!(answer, "4");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["shelfcards"]).is_err());
    }
}
