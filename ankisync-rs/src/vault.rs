//! Vault representation and note lookup.

use crate::error::{Result, SyncError};
use crate::types::{NOTE_EXTENSIONS, NoteId, note_key, strip_note_extension};
use glob::{MatchOptions, glob_with};
use log::warn;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A note's text as fetched from a [`NoteSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceNote {
    /// File name without extension, as stored on disk.
    pub name: String,
    /// Path relative to the source root.
    pub path: PathBuf,
    /// Raw content including any frontmatter.
    pub content: String,
}

/// Resolves note identifiers to content.
pub trait NoteSource {
    /// Fetch a note, failing with [`SyncError::NoteNotFound`] when nothing matches.
    fn resolve(&self, id: &NoteId) -> Result<SourceNote>;

    /// The identifier every spelling of this note maps to, so that a note
    /// reached by name and by path is still visited once. `None` when the
    /// identifier resolves to nothing.
    fn canonical(&self, id: &NoteId) -> Option<NoteId> {
        Some(id.clone())
    }
}

/// A folder of markdown notes.
///
/// The folder is listed once when the vault is opened; lookups afterwards
/// are case-insensitive and accept names with or without an extension.
#[derive(Debug, Clone)]
pub struct Vault {
    /// Root path of the vault.
    pub root: PathBuf,
    notes: Vec<PathBuf>,
    by_name: HashMap<String, Vec<PathBuf>>,
    by_path: HashMap<String, PathBuf>,
}

impl Vault {
    /// Open a vault, failing if the folder does not exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.is_dir() {
            return Err(SyncError::VaultNotFound(root));
        }

        let notes = list_notes(&root)?;
        let mut by_name: HashMap<String, Vec<PathBuf>> = HashMap::new();
        let mut by_path = HashMap::new();

        for path in &notes {
            if let Some(stem) = path.file_stem() {
                by_name
                    .entry(note_key(&stem.to_string_lossy()))
                    .or_default()
                    .push(path.clone());
            }
            by_path.insert(path_key(path), path.clone());
        }

        Ok(Self {
            root,
            notes,
            by_name,
            by_path,
        })
    }

    /// All notes in the vault, relative to the root, sorted by path.
    pub fn list_notes(&self) -> &[PathBuf] {
        &self.notes
    }

    /// Find the note an identifier refers to.
    ///
    /// Handles, in order:
    /// - Relative path match (a bare name matches a note at the root)
    /// - File name match, first by path when several folders share a name
    pub fn find(&self, id: &NoteId) -> Option<&PathBuf> {
        if let Some(path) = self.by_path.get(id.key()) {
            return Some(path);
        }

        let candidates = self.by_name.get(id.key())?;
        if candidates.len() > 1 {
            warn!(
                "{} notes are named '{}', using {}",
                candidates.len(),
                id,
                candidates[0].display()
            );
        }
        candidates.first()
    }
}

impl NoteSource for Vault {
    fn resolve(&self, id: &NoteId) -> Result<SourceNote> {
        let path = self
            .find(id)
            .ok_or_else(|| SyncError::NoteNotFound(id.name().to_string()))?;
        let content = std::fs::read_to_string(self.root.join(path))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(SourceNote {
            name,
            path: path.clone(),
            content,
        })
    }

    fn canonical(&self, id: &NoteId) -> Option<NoteId> {
        let path = self.find(id)?;
        NoteId::new(strip_note_extension(&path_name(path)))
    }
}

/// A relative path as note text, `/`-separated on every platform.
pub fn path_name(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lookup key for a relative path: `/`-separated, extension stripped, case-folded.
fn path_key(path: &Path) -> String {
    note_key(&path_name(path))
}

/// List all markdown files under `root`, skipping hidden files and folders.
///
/// Extensions match in any case, so `Note.MD` is listed too.
fn list_notes(root: &Path) -> Result<Vec<PathBuf>> {
    let mut notes = Vec::new();
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    for ext in NOTE_EXTENSIONS {
        let pattern = root.join(format!("**/*.{}", ext));
        let pattern_str = pattern.to_string_lossy();

        for entry in glob_with(&pattern_str, options)? {
            match entry {
                Ok(path) => {
                    if !path.is_file() {
                        continue;
                    }
                    if let Ok(relative) = path.strip_prefix(root) {
                        if !relative
                            .components()
                            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
                        {
                            notes.push(relative.to_path_buf());
                        }
                    }
                }
                Err(e) => {
                    // Log but continue on unreadable entries
                    warn!("glob error: {}", e);
                }
            }
        }
    }

    notes.sort();
    notes.dedup();
    Ok(notes)
}
