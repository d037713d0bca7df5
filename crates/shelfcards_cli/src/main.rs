//! Command-line front end for a Shelfcards library.
//!
//! # Responsibility
//! - Parse commands and route every change through `LibraryStore`.
//! - Render shelves and cards as plain text.

mod args;

use anyhow::{Context, Result};
use args::{Cli, Command};
use clap::Parser;
use log::debug;
use shelfcards_core::db::open_db;
use shelfcards_core::{init_logging, EntityId, LibraryStore, PersistenceAdapter, SqliteStorage};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        init_logging(&cli.log_level, log_dir).context("logging setup failed")?;
    }

    let db_path = cli.resolved_db_path();
    debug!("event=cli_start module=cli db_path={}", db_path.display());
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open library at `{}`", db_path.display()))?;
    let storage = SqliteStorage::try_new(&conn).context("library storage is not ready")?;
    let mut store = LibraryStore::open(storage);

    execute(&mut store, cli.command)
}

fn execute<P: PersistenceAdapter>(store: &mut LibraryStore<P>, command: Command) -> Result<()> {
    match command {
        Command::Shelves => {
            if store.shelf_count() == 0 {
                println!("No shelves yet.");
            }
            for shelf in store.shelves() {
                let cards = store.cards_in_shelf(&shelf.id)?.len();
                println!("{}  {}  ({cards} cards)", shelf.id, shelf.title);
            }
        }
        Command::AddShelf { title } => {
            let shelf = store.add_shelf(&title)?;
            println!("Created shelf {}  {}", shelf.id, shelf.title);
        }
        Command::RenameShelf { id, title } => {
            let shelf = store.rename_shelf(&EntityId::from(id), &title)?;
            println!("Renamed shelf {}  {}", shelf.id, shelf.title);
        }
        Command::RemoveShelf { id } => {
            store.remove_shelf(&EntityId::from(id))?;
            println!("Removed shelf and its cards.");
        }
        Command::Cards { shelf_id } => {
            let shelf_id = EntityId::from(shelf_id);
            let cards = store.cards_in_shelf(&shelf_id)?;
            if cards.is_empty() {
                println!("No cards on this shelf.");
            }
            for card in cards {
                println!("{}\n  Q: {}\n  A: {}", card.id, card.question, card.answer);
            }
        }
        Command::AddCard {
            shelf_id,
            question,
            answer,
        } => {
            let card = store.add_card(&EntityId::from(shelf_id), &question, &answer)?;
            println!("Created card {}", card.id);
        }
        Command::RenameCard {
            id,
            question,
            answer,
        } => {
            let card = store.rename_card(&EntityId::from(id), &question, &answer)?;
            println!("Updated card {}", card.id);
        }
        Command::RemoveCard { id } => {
            store.remove_card(&EntityId::from(id))?;
            println!("Removed card.");
        }
        Command::Flip { card_id } => {
            let card_id = EntityId::from(card_id);
            let card = store
                .flashcard(&card_id)
                .with_context(|| format!("flashcard not found: {card_id}"))?;
            println!("Q: {}", card.question);
            println!("A: {}", card.answer);
        }
    }

    if store.is_dirty() {
        store.save().context("library changes could not be saved")?;
    }
    Ok(())
}
