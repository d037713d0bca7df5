//! Library store: the single owner of shelf and flashcard state.
//!
//! # Responsibility
//! - Provide create/rename/remove for shelves and flashcards.
//! - Persist both collections after every successful mutation.
//! - Rebuild a consistent library from whatever storage holds.
//!
//! # Invariants
//! - Every flashcard references a shelf present in `shelves`.
//! - Ids are unique per collection and never reissued.
//! - Insertion order is display order; renames keep position.
//! - A failed save keeps the mutation and marks the store dirty.

use crate::model::flashcard::{CardText, Flashcard};
use crate::model::id::{EntityId, IdGenerator};
use crate::model::shelf::Shelf;
use crate::model::validation::{normalize_text, TextField, ValidationError};
use crate::repo::records::{
    decode_records, encode_records, Decoded, FLASHCARDS_KEY, SHELVES_KEY,
};
use crate::repo::storage::{PersistenceAdapter, PersistenceError, PersistenceResult};
use log::{error, info, warn};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by library store operations. All are recoverable.
#[derive(Debug)]
pub enum StoreError {
    /// Text input was empty or over-length after trimming.
    Validation(ValidationError),
    /// No shelf has the given id.
    ShelfNotFound(EntityId),
    /// No flashcard has the given id.
    CardNotFound(EntityId),
    /// The mutation was applied in memory but could not be saved.
    Persistence(PersistenceError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ShelfNotFound(_) | Self::CardNotFound(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ShelfNotFound(id) => write!(f, "shelf not found: {id}"),
            Self::CardNotFound(id) => write!(f, "flashcard not found: {id}"),
            Self::Persistence(err) => write!(f, "change applied but not saved: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::ShelfNotFound(_) | Self::CardNotFound(_) => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistenceError> for StoreError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

/// Counts of what `load` kept and discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub shelves: usize,
    pub flashcards: usize,
    pub dropped_shelves: usize,
    pub dropped_flashcards: usize,
    /// Text was re-trimmed on otherwise valid records.
    pub normalized: usize,
}

impl LoadReport {
    pub fn is_repaired(&self) -> bool {
        self.dropped_shelves > 0 || self.dropped_flashcards > 0 || self.normalized > 0
    }
}

/// Owner of the shelf and flashcard collections.
pub struct LibraryStore<P: PersistenceAdapter> {
    storage: P,
    ids: IdGenerator,
    shelves: Vec<Shelf>,
    shelf_index: HashMap<EntityId, usize>,
    flashcards: Vec<Flashcard>,
    card_index: HashMap<EntityId, usize>,
    dirty: bool,
}

impl<P: PersistenceAdapter> LibraryStore<P> {
    /// Creates an empty store. Call `load` to read existing state.
    pub fn new(storage: P) -> Self {
        Self {
            storage,
            ids: IdGenerator::new(),
            shelves: Vec::new(),
            shelf_index: HashMap::new(),
            flashcards: Vec::new(),
            card_index: HashMap::new(),
            dirty: false,
        }
    }

    /// Creates a store and loads persisted state into it.
    pub fn open(storage: P) -> Self {
        let mut store = Self::new(storage);
        store.load();
        store
    }

    pub fn storage(&self) -> &P {
        &self.storage
    }

    pub fn into_storage(self) -> P {
        self.storage
    }

    /// Whether in-memory state is ahead of storage.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn shelves(&self) -> &[Shelf] {
        &self.shelves
    }

    pub fn flashcards(&self) -> &[Flashcard] {
        &self.flashcards
    }

    pub fn shelf_count(&self) -> usize {
        self.shelves.len()
    }

    pub fn card_count(&self) -> usize {
        self.flashcards.len()
    }

    pub fn shelf(&self, id: &EntityId) -> Option<&Shelf> {
        self.shelf_index.get(id).map(|&position| &self.shelves[position])
    }

    pub fn flashcard(&self, id: &EntityId) -> Option<&Flashcard> {
        self.card_index.get(id).map(|&position| &self.flashcards[position])
    }

    /// Cards owned by one shelf, in insertion order.
    pub fn cards_in_shelf(&self, shelf_id: &EntityId) -> StoreResult<Vec<&Flashcard>> {
        if !self.shelf_index.contains_key(shelf_id) {
            return Err(StoreError::ShelfNotFound(shelf_id.clone()));
        }
        Ok(self
            .flashcards
            .iter()
            .filter(|card| &card.shelf_id == shelf_id)
            .collect())
    }

    /// Creates a shelf with a trimmed `title` of 1..=50 characters.
    pub fn add_shelf(&mut self, title: &str) -> StoreResult<Shelf> {
        let shelf = Shelf::new(self.ids.next_id(), title)?;
        self.shelf_index.insert(shelf.id.clone(), self.shelves.len());
        self.shelves.push(shelf.clone());
        info!(
            "event=shelf_add module=store status=ok shelf_id={} title_chars={}",
            shelf.id,
            shelf.title.chars().count()
        );

        self.persist("shelf_add")?;
        Ok(shelf)
    }

    /// Replaces a shelf title in place; id and position are unchanged.
    pub fn rename_shelf(&mut self, id: &EntityId, new_title: &str) -> StoreResult<Shelf> {
        let position = self.shelf_position(id)?;
        let title = normalize_text(TextField::ShelfTitle, new_title)?;

        let shelf = &mut self.shelves[position];
        shelf.title = title;
        let renamed = shelf.clone();
        info!(
            "event=shelf_rename module=store status=ok shelf_id={} title_chars={}",
            renamed.id,
            renamed.title.chars().count()
        );

        self.persist("shelf_rename")?;
        Ok(renamed)
    }

    /// Removes a shelf together with every flashcard it owns.
    pub fn remove_shelf(&mut self, id: &EntityId) -> StoreResult<()> {
        let position = self.shelf_position(id)?;
        let shelf = self.shelves.remove(position);

        let before = self.flashcards.len();
        self.flashcards.retain(|card| card.shelf_id != shelf.id);
        let removed_cards = before - self.flashcards.len();
        self.rebuild_indexes();
        info!(
            "event=shelf_remove module=store status=ok shelf_id={} removed_cards={removed_cards}",
            shelf.id
        );

        self.persist("shelf_remove").map_err(Into::into)
    }

    /// Creates a flashcard under an existing shelf.
    pub fn add_card(
        &mut self,
        shelf_id: &EntityId,
        question: &str,
        answer: &str,
    ) -> StoreResult<Flashcard> {
        self.shelf_position(shelf_id)?;
        let text = CardText::parse(question, answer)?;

        let card = Flashcard::new(self.ids.next_id(), shelf_id.clone(), text);
        self.card_index.insert(card.id.clone(), self.flashcards.len());
        self.flashcards.push(card.clone());
        info!(
            "event=card_add module=store status=ok card_id={} shelf_id={} question_chars={} answer_chars={}",
            card.id,
            card.shelf_id,
            card.question.chars().count(),
            card.answer.chars().count()
        );

        self.persist("card_add")?;
        Ok(card)
    }

    /// Replaces question and answer together; neither changes unless both are valid.
    pub fn rename_card(
        &mut self,
        id: &EntityId,
        new_question: &str,
        new_answer: &str,
    ) -> StoreResult<Flashcard> {
        let position = self.card_position(id)?;
        let text = CardText::parse(new_question, new_answer)?;

        let card = &mut self.flashcards[position];
        card.question = text.question;
        card.answer = text.answer;
        let renamed = card.clone();
        info!(
            "event=card_rename module=store status=ok card_id={} question_chars={} answer_chars={}",
            renamed.id,
            renamed.question.chars().count(),
            renamed.answer.chars().count()
        );

        self.persist("card_rename")?;
        Ok(renamed)
    }

    /// Removes one flashcard.
    pub fn remove_card(&mut self, id: &EntityId) -> StoreResult<()> {
        let position = self.card_position(id)?;
        let card = self.flashcards.remove(position);
        self.rebuild_card_index();
        info!(
            "event=card_remove module=store status=ok card_id={} shelf_id={}",
            card.id, card.shelf_id
        );

        self.persist("card_remove").map_err(Into::into)
    }

    /// Writes both collections to storage.
    ///
    /// Used to retry after a failed save, or to persist load-time repairs.
    pub fn save(&mut self) -> PersistenceResult<()> {
        self.persist("store_save")
    }

    /// Replaces in-memory state with what storage holds.
    ///
    /// Missing or unreadable data yields an empty library. Records that
    /// break an invariant are dropped, never reported as errors.
    pub fn load(&mut self) -> LoadReport {
        let raw_shelves = self.storage.load(SHELVES_KEY);
        let raw_cards = self.storage.load(FLASHCARDS_KEY);
        let shelves = decode_records::<Shelf>(SHELVES_KEY, raw_shelves.as_deref());
        let cards = decode_records::<Flashcard>(FLASHCARDS_KEY, raw_cards.as_deref());

        let mut report = LoadReport::default();
        let lossy = shelves.is_lossy() || cards.is_lossy();
        self.shelves = self.repair_shelves(shelves, &mut report);
        self.flashcards = self.repair_cards(cards, &mut report);
        self.rebuild_indexes();

        report.shelves = self.shelves.len();
        report.flashcards = self.flashcards.len();
        self.dirty = lossy || report.is_repaired();

        info!(
            "event=store_load module=store status=ok shelves={} cards={} dropped_shelves={} dropped_cards={} normalized={} dirty={}",
            report.shelves,
            report.flashcards,
            report.dropped_shelves,
            report.dropped_flashcards,
            report.normalized,
            self.dirty
        );
        report
    }

    fn repair_shelves(&mut self, decoded: Decoded<Shelf>, report: &mut LoadReport) -> Vec<Shelf> {
        report.dropped_shelves += decoded.skipped;
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(decoded.records.len());

        // Invalid records never claim an id, so a later valid duplicate survives.
        for shelf in decoded.records {
            let title = match normalize_text(TextField::ShelfTitle, &shelf.title) {
                Ok(title) => title,
                Err(err) => {
                    warn!(
                        "event=store_load module=store status=repair reason=invalid_shelf shelf_id={} error={err}",
                        shelf.id
                    );
                    report.dropped_shelves += 1;
                    continue;
                }
            };
            if !seen.insert(shelf.id.clone()) {
                warn!(
                    "event=store_load module=store status=repair reason=duplicate_shelf shelf_id={}",
                    shelf.id
                );
                report.dropped_shelves += 1;
                continue;
            }
            if title != shelf.title {
                report.normalized += 1;
            }
            self.ids.reserve(&shelf.id);
            kept.push(Shelf { title, ..shelf });
        }
        kept
    }

    /// Must run after `self.shelves` holds the repaired shelf list.
    fn repair_cards(
        &mut self,
        decoded: Decoded<Flashcard>,
        report: &mut LoadReport,
    ) -> Vec<Flashcard> {
        report.dropped_flashcards += decoded.skipped;
        let shelf_ids = self
            .shelves
            .iter()
            .map(|shelf| &shelf.id)
            .collect::<HashSet<_>>();
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(decoded.records.len());

        for card in decoded.records {
            if !shelf_ids.contains(&card.shelf_id) {
                warn!(
                    "event=store_load module=store status=repair reason=dangling_card card_id={} shelf_id={}",
                    card.id, card.shelf_id
                );
                report.dropped_flashcards += 1;
                continue;
            }
            let text = match CardText::parse(&card.question, &card.answer) {
                Ok(text) => text,
                Err(err) => {
                    warn!(
                        "event=store_load module=store status=repair reason=invalid_card card_id={} error={err}",
                        card.id
                    );
                    report.dropped_flashcards += 1;
                    continue;
                }
            };
            if !seen.insert(card.id.clone()) {
                warn!(
                    "event=store_load module=store status=repair reason=duplicate_card card_id={}",
                    card.id
                );
                report.dropped_flashcards += 1;
                continue;
            }
            if text.question != card.question || text.answer != card.answer {
                report.normalized += 1;
            }
            self.ids.reserve(&card.id);
            kept.push(Flashcard::new(card.id, card.shelf_id, text));
        }
        kept
    }

    fn persist(&mut self, event: &str) -> PersistenceResult<()> {
        match self.write_snapshot() {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                self.dirty = true;
                error!("event={event} module=store status=error error_code=save_failed error={err}");
                Err(err)
            }
        }
    }

    fn write_snapshot(&mut self) -> PersistenceResult<()> {
        let shelves = encode_records(&self.shelves)?;
        let flashcards = encode_records(&self.flashcards)?;
        self.storage
            .save_all(&[(SHELVES_KEY, shelves), (FLASHCARDS_KEY, flashcards)])
    }

    fn shelf_position(&self, id: &EntityId) -> StoreResult<usize> {
        self.shelf_index
            .get(id)
            .copied()
            .ok_or_else(|| StoreError::ShelfNotFound(id.clone()))
    }

    fn card_position(&self, id: &EntityId) -> StoreResult<usize> {
        self.card_index
            .get(id)
            .copied()
            .ok_or_else(|| StoreError::CardNotFound(id.clone()))
    }

    fn rebuild_indexes(&mut self) {
        self.shelf_index = self
            .shelves
            .iter()
            .enumerate()
            .map(|(position, shelf)| (shelf.id.clone(), position))
            .collect();
        self.rebuild_card_index();
    }

    fn rebuild_card_index(&mut self) {
        self.card_index = self
            .flashcards
            .iter()
            .enumerate()
            .map(|(position, card)| (card.id.clone(), position))
            .collect();
    }
}
