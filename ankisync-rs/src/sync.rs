//! Create-or-update policy against a flashcard store.

use crate::error::Result;
use crate::types::{Card, Outcome};
use log::warn;
use serde::Serialize;

/// Identifier the store assigns to a note.
pub type ExternalId = i64;

/// Operations the sync policy needs from a flashcard store.
pub trait SyncClient {
    /// All notes in the target deck whose front equals `front`.
    fn find_notes(&self, front: &str) -> Result<Vec<ExternalId>>;

    /// Add a new note. Fails with [`SyncError::DuplicateNote`] when the store
    /// already holds a note with this front.
    ///
    /// [`SyncError::DuplicateNote`]: crate::error::SyncError::DuplicateNote
    fn create(&self, card: &Card) -> Result<ExternalId>;

    /// Replace the back and tags of an existing note. The front is untouched.
    fn update(&self, id: ExternalId, card: &Card) -> Result<()>;
}

/// How cards are written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Always create; an existing front ends up as a skipped duplicate.
    #[default]
    CreateOnly,
    /// Update the note with the same front if there is one, else create.
    Upsert,
}

impl SyncMode {
    pub fn from_upsert(upsert: bool) -> Self {
        if upsert { SyncMode::Upsert } else { SyncMode::CreateOnly }
    }
}

/// What happened to one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncAction {
    Created { id: ExternalId },
    Updated { id: ExternalId },
    /// The note carries the skip tag; the store was not contacted.
    SkippedByTag,
    /// The store refused the create because the front already exists.
    SkippedDuplicate,
}

impl SyncAction {
    pub fn outcome(&self) -> Outcome {
        match self {
            SyncAction::Created { .. } | SyncAction::Updated { .. } => Outcome::Succeeded,
            SyncAction::SkippedByTag | SyncAction::SkippedDuplicate => Outcome::Skipped,
        }
    }
}

/// Look up the note with this front, taking the first when there are several.
pub fn find_by_identity<C: SyncClient + ?Sized>(
    client: &C,
    front: &str,
) -> Result<Option<ExternalId>> {
    let matches = client.find_notes(front)?;
    if matches.len() > 1 {
        warn!(
            "{} notes share the front '{}', updating the first ({})",
            matches.len(),
            front,
            matches[0]
        );
    }
    Ok(matches.first().copied())
}

/// Write one card to the store according to `mode`.
///
/// Errors other than a duplicate create are returned to the caller, which
/// counts them as failures.
pub fn sync_card<C: SyncClient + ?Sized>(
    client: &C,
    card: &Card,
    mode: SyncMode,
) -> Result<SyncAction> {
    if card.should_skip {
        return Ok(SyncAction::SkippedByTag);
    }

    if mode == SyncMode::Upsert {
        if let Some(id) = find_by_identity(client, &card.front)? {
            client.update(id, card)?;
            return Ok(SyncAction::Updated { id });
        }
    }

    match client.create(card) {
        Ok(id) => Ok(SyncAction::Created { id }),
        Err(e) if e.is_duplicate() => Ok(SyncAction::SkippedDuplicate),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anki::MemoryStore;
    use crate::error::SyncError;
    use crate::types::{SKIP_NOTICE, TagSet};

    fn card(front: &str, back: &str) -> Card {
        Card {
            front: front.to_string(),
            back: back.to_string(),
            tags: TagSet::from(["rust".to_string()]),
            should_skip: false,
        }
    }

    #[test]
    fn test_create_only_creates() {
        let store = MemoryStore::new("Deck");
        let action = sync_card(&store, &card("A", "body"), SyncMode::CreateOnly).unwrap();
        assert!(matches!(action, SyncAction::Created { .. }));
        assert_eq!(action.outcome(), Outcome::Succeeded);
        assert_eq!(store.notes().len(), 1);
    }

    #[test]
    fn test_create_only_duplicate_is_skipped() {
        let store = MemoryStore::new("Deck");
        sync_card(&store, &card("A", "v1"), SyncMode::CreateOnly).unwrap();
        let action = sync_card(&store, &card("A", "v2"), SyncMode::CreateOnly).unwrap();
        assert_eq!(action, SyncAction::SkippedDuplicate);
        assert_eq!(action.outcome(), Outcome::Skipped);
        assert_eq!(store.notes()[0].back, "v1");
    }

    #[test]
    fn test_upsert_updates_existing() {
        let store = MemoryStore::new("Deck");
        let existing = store.insert("Deck", "A", "old");
        let action = sync_card(&store, &card("A", "new"), SyncMode::Upsert).unwrap();
        assert_eq!(action, SyncAction::Updated { id: existing });

        let note = store.note(existing).unwrap();
        assert_eq!(note.front, "A");
        assert_eq!(note.back, "new");
        assert!(note.tags.contains("rust"));
    }

    #[test]
    fn test_upsert_creates_when_missing() {
        let store = MemoryStore::new("Deck");
        let action = sync_card(&store, &card("A", "body"), SyncMode::Upsert).unwrap();
        assert!(matches!(action, SyncAction::Created { .. }));
    }

    #[test]
    fn test_upsert_duplicate_in_other_deck_is_skipped() {
        let store = MemoryStore::new("Deck");
        store.insert("Elsewhere", "A", "foreign");
        let action = sync_card(&store, &card("A", "body"), SyncMode::Upsert).unwrap();
        assert_eq!(action, SyncAction::SkippedDuplicate);
    }

    /// Collects warnings so tests can assert on them.
    mod captured {
        use log::{Level, LevelFilter, Log, Metadata, Record};
        use std::sync::{Mutex, Once};

        struct Capture(Mutex<Vec<String>>);

        static LOGGER: Capture = Capture(Mutex::new(Vec::new()));
        static INIT: Once = Once::new();

        impl Log for Capture {
            fn enabled(&self, metadata: &Metadata) -> bool {
                metadata.level() <= Level::Warn
            }

            fn log(&self, record: &Record) {
                if self.enabled(record.metadata()) {
                    self.0.lock().unwrap().push(record.args().to_string());
                }
            }

            fn flush(&self) {}
        }

        pub fn install() {
            INIT.call_once(|| {
                log::set_logger(&LOGGER).unwrap();
                log::set_max_level(LevelFilter::Warn);
            });
        }

        pub fn warnings_mentioning(needle: &str) -> Vec<String> {
            LOGGER
                .0
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.contains(needle))
                .cloned()
                .collect()
        }
    }

    #[test]
    fn test_ambiguous_lookup_uses_first() {
        captured::install();
        let store = MemoryStore::new("Deck");
        let first = store.insert("Deck", "Shared Front", "one");
        let second = store.insert("Deck", "Shared Front", "two");

        assert_eq!(find_by_identity(&store, "Shared Front").unwrap(), Some(first));
        let action = sync_card(&store, &card("Shared Front", "new"), SyncMode::Upsert).unwrap();
        assert_eq!(action, SyncAction::Updated { id: first });
        assert_eq!(store.note(second).unwrap().back, "two");

        let warnings = captured::warnings_mentioning("Shared Front");
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("2 notes share the front"));
        assert!(warnings[0].contains(&first.to_string()));
    }

    #[test]
    fn test_single_match_does_not_warn() {
        captured::install();
        let store = MemoryStore::new("Deck");
        let only = store.insert("Deck", "Lonely Front", "one");
        assert_eq!(find_by_identity(&store, "Lonely Front").unwrap(), Some(only));
        assert!(captured::warnings_mentioning("Lonely Front").is_empty());
    }

    #[test]
    fn test_skip_marked_card_never_calls_store() {
        let store = MemoryStore::new("Deck");
        let skipped = Card {
            front: "Secret".into(),
            back: SKIP_NOTICE.into(),
            tags: TagSet::from(["not_included".to_string()]),
            should_skip: true,
        };
        for mode in [SyncMode::CreateOnly, SyncMode::Upsert] {
            let action = sync_card(&store, &skipped, mode).unwrap();
            assert_eq!(action, SyncAction::SkippedByTag);
        }
        assert_eq!(store.calls(), 0);
    }

    struct Unreachable;

    impl SyncClient for Unreachable {
        fn find_notes(&self, _front: &str) -> Result<Vec<ExternalId>> {
            Err(SyncError::Store {
                action: "findNotes".into(),
                message: "collection is not available".into(),
            })
        }

        fn create(&self, _card: &Card) -> Result<ExternalId> {
            Err(SyncError::Store {
                action: "addNote".into(),
                message: "model was not found: Basic".into(),
            })
        }

        fn update(&self, _id: ExternalId, _card: &Card) -> Result<()> {
            unreachable!("lookup never succeeds")
        }
    }

    #[test]
    fn test_store_errors_propagate() {
        let c = card("A", "body");
        assert!(sync_card(&Unreachable, &c, SyncMode::CreateOnly).is_err());
        assert!(sync_card(&Unreachable, &c, SyncMode::Upsert).is_err());
    }
}
