//! In-memory flashcard store.

use crate::error::{Result, SyncError};
use crate::sync::{ExternalId, SyncClient};
use crate::types::{Card, TagSet};
use serde::Serialize;
use std::cell::{Cell, RefCell};

/// A note held by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredNote {
    pub id: ExternalId,
    pub deck: String,
    pub front: String,
    pub back: String,
    pub tags: TagSet,
}

/// Store that behaves like Anki for the calls the sync policy makes.
///
/// Lookups only see the configured deck, while duplicate detection on create
/// spans every deck, matching Anki's default duplicate scope.
#[derive(Debug)]
pub struct MemoryStore {
    deck: String,
    notes: RefCell<Vec<StoredNote>>,
    next_id: Cell<ExternalId>,
    calls: Cell<usize>,
}

impl MemoryStore {
    pub fn new(deck: impl Into<String>) -> Self {
        Self {
            deck: deck.into(),
            notes: RefCell::new(Vec::new()),
            next_id: Cell::new(1_000),
            calls: Cell::new(0),
        }
    }

    /// Put a note straight into the store, bypassing duplicate checks.
    ///
    /// Not counted in [`Self::calls`].
    pub fn insert(&self, deck: &str, front: &str, back: &str) -> ExternalId {
        let id = self.allocate_id();
        self.notes.borrow_mut().push(StoredNote {
            id,
            deck: deck.to_string(),
            front: front.to_string(),
            back: back.to_string(),
            tags: TagSet::new(),
        });
        id
    }

    /// Snapshot of every stored note in insertion order.
    pub fn notes(&self) -> Vec<StoredNote> {
        self.notes.borrow().clone()
    }

    pub fn note(&self, id: ExternalId) -> Option<StoredNote> {
        self.notes.borrow().iter().find(|n| n.id == id).cloned()
    }

    /// Number of [`SyncClient`] calls served.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn allocate_id(&self) -> ExternalId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn count_call(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl SyncClient for MemoryStore {
    fn find_notes(&self, front: &str) -> Result<Vec<ExternalId>> {
        self.count_call();
        Ok(self
            .notes
            .borrow()
            .iter()
            .filter(|n| n.deck == self.deck && n.front == front)
            .map(|n| n.id)
            .collect())
    }

    fn create(&self, card: &Card) -> Result<ExternalId> {
        self.count_call();
        if self.notes.borrow().iter().any(|n| n.front == card.front) {
            return Err(SyncError::DuplicateNote(card.front.clone()));
        }

        let id = self.allocate_id();
        self.notes.borrow_mut().push(StoredNote {
            id,
            deck: self.deck.clone(),
            front: card.front.clone(),
            back: card.back.clone(),
            tags: card.tags.clone(),
        });
        Ok(id)
    }

    fn update(&self, id: ExternalId, card: &Card) -> Result<()> {
        self.count_call();
        let mut notes = self.notes.borrow_mut();
        let note = notes.iter_mut().find(|n| n.id == id).ok_or_else(|| SyncError::Store {
            action: "updateNote".to_string(),
            message: format!("note was not found: {}", id),
        })?;
        note.back = card.back.clone();
        note.tags = card.tags.clone();
        Ok(())
    }
}
