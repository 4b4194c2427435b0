//! Shared types for ankisync.

use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use unicode_normalization::UnicodeNormalization;

/// Tag that suppresses synchronization of a note's card.
pub const SKIP_TAG: &str = "not_included";

/// Body stored on a skip-marked card in place of the rendered note.
pub const SKIP_NOTICE: &str = "This note is excluded from synchronization.";

/// File extensions recognised as notes.
pub const NOTE_EXTENSIONS: &[&str] = &["md", "markdown"];

/// The set of tags attached to a card.
pub type TagSet = BTreeSet<String>;

/// Strip a trailing markdown extension (case-insensitive) from a note name.
pub fn strip_note_extension(name: &str) -> &str {
    for ext in NOTE_EXTENSIONS {
        let Some(dot) = name.len().checked_sub(ext.len() + 1) else {
            continue;
        };
        if !name.is_char_boundary(dot) {
            continue;
        }
        let suffix = &name[dot..];
        if suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(ext) {
            return &name[..dot];
        }
    }
    name
}

/// Case-folded, extension-stripped lookup key for a note name.
pub fn note_key(name: &str) -> String {
    let stem = strip_note_extension(name.trim());
    stem.nfc().collect::<String>().to_lowercase()
}

/// Identifier of a note within one traversal.
///
/// Two identifiers are equal when their keys match, so `Other Note`,
/// `other note.md` and `OTHER NOTE.Markdown` all name the same note.
#[derive(Debug, Clone)]
pub struct NoteId {
    name: String,
    key: String,
}

impl NoteId {
    /// Build an identifier from user or link text. Returns `None` for blank input.
    pub fn new(raw: &str) -> Option<Self> {
        let name = raw.trim();
        if strip_note_extension(name).trim().is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            key: note_key(name),
        })
    }

    /// The identifier as it was written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The identifier without its markdown extension.
    pub fn stem(&self) -> &str {
        strip_note_extension(&self.name)
    }

    /// Normalized key used for equality.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for NoteId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for NoteId {}

impl Hash for NoteId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for NoteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

/// A flashcard synthesized from one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    /// Identity of the card in the store (prefix + note stem).
    pub front: String,

    /// Rendered body, or [`SKIP_NOTICE`] when skipped.
    pub back: String,

    /// Tags sent along with the card.
    pub tags: TagSet,

    /// Whether synchronization is suppressed for this card.
    pub should_skip: bool,
}

/// Result of processing one note, as counted in the run tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    Failed,
    Skipped,
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunTally {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunTally {
    /// Count one note outcome.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Succeeded => self.succeeded += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }

    /// Total number of notes counted.
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }
}
