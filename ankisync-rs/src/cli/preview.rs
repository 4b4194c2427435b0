//! Preview command implementation.

use crate::card::CardBuilder;
use crate::cli::args::PreviewArgs;
use crate::cli::output::Output;
use crate::config::Config;
use crate::error::{Result, SyncError};
use crate::run::prepare_note;
use crate::types::{NoteId, TagSet};
use crate::vault::{NoteSource, Vault};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub path: String,
    pub front: String,
    pub back: String,
    pub tags: TagSet,
    pub skip: bool,
    pub malformed_metadata: bool,
    /// Notes a sync would visit next.
    pub links: Vec<String>,
}

pub fn run(vault: &Vault, config: &Config, args: &PreviewArgs, output: &Output) -> Result<()> {
    let id = NoteId::new(&args.note).ok_or_else(|| SyncError::NoteNotFound(args.note.clone()))?;
    let note = vault.resolve(&id)?;

    let prefix = args.prefix.clone().unwrap_or_else(|| config.prefix.clone());
    let default_tag = args.default_tag.clone().or_else(|| config.default_tag.clone());
    let builder = CardBuilder::new(prefix).default_tag(default_tag);

    let prepared = prepare_note(&note, &builder);
    let card = prepared.card;

    output.print(&PreviewResponse {
        path: note.path.to_string_lossy().to_string(),
        front: card.front,
        back: card.back,
        tags: card.tags,
        skip: card.should_skip,
        malformed_metadata: prepared.malformed_metadata,
        links: prepared
            .discovered
            .iter()
            .map(|id| id.name().to_string())
            .collect(),
    })
}
