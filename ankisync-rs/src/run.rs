//! The run controller: level-by-level traversal from the seed notes.

use crate::card::{CardBuilder, MarkupRenderer};
use crate::error::{Result, SyncError};
use crate::graph::TraversalScheduler;
use crate::parser::{extract_tags, rewrite_content, split_note};
use crate::sync::{SyncAction, SyncClient, SyncMode, sync_card};
use crate::types::{Card, NoteId, Outcome, RunTally};
use crate::vault::{NoteSource, SourceNote};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use std::time::Duration;

/// Settings consumed by [`RunController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Prepended to every card front.
    pub prefix: String,
    pub mode: SyncMode,
    /// Tag for notes that declare none.
    pub default_tag: Option<String>,
    /// Pause after each card sent to the store.
    pub request_delay: Duration,
    /// Links found in notes at this depth are not followed. Seeds are depth 0.
    pub max_depth: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            mode: SyncMode::CreateOnly,
            default_tag: None,
            request_delay: Duration::from_millis(100),
            max_depth: None,
        }
    }
}

/// A note run through splitting, tag extraction, rewriting and card building.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedNote {
    pub card: Card,
    /// Notes linked from this one, in order of appearance.
    pub discovered: Vec<NoteId>,
    /// The frontmatter block was present but unusable.
    pub malformed_metadata: bool,
}

/// Turn a fetched note into its card and outgoing links. No I/O.
pub fn prepare_note<R: MarkupRenderer>(note: &SourceNote, builder: &CardBuilder<R>) -> PreparedNote {
    let parts = split_note(&note.content);
    // Tags come from the content before rewriting replaces links and images
    let tags = extract_tags(&parts.metadata, parts.content);
    let rewrite = rewrite_content(parts.content);
    let card = builder.build(&note.name, tags, &rewrite.content);

    PreparedNote {
        card,
        discovered: rewrite.discovered,
        malformed_metadata: parts.malformed,
    }
}

/// What happened to one visited note.
#[derive(Debug, Clone, Serialize)]
pub struct NoteRecord {
    pub note: NoteId,
    /// Link hops from the nearest seed.
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub tally: RunTally,
    /// Distinct notes visited.
    pub visited: usize,
    /// Number of non-empty frontier levels processed.
    pub levels: usize,
    pub notes: Vec<NoteRecord>,
}

/// Drives the traversal: drains the frontier one level at a time and runs
/// every note in the level through the pipeline.
///
/// A failing note is recorded and the run moves on; only a missing seed set
/// stops a run before it starts.
pub struct RunController<'a, S: ?Sized, C: ?Sized> {
    source: &'a S,
    client: &'a C,
    config: RunConfig,
    builder: CardBuilder,
    scheduler: TraversalScheduler,
    tally: RunTally,
}

impl<'a, S, C> RunController<'a, S, C>
where
    S: NoteSource + ?Sized,
    C: SyncClient + ?Sized,
{
    pub fn new(source: &'a S, client: &'a C, config: RunConfig) -> Self {
        let builder = CardBuilder::new(config.prefix.clone()).default_tag(config.default_tag.clone());
        Self {
            source,
            client,
            config,
            builder,
            scheduler: TraversalScheduler::new(),
            tally: RunTally::default(),
        }
    }

    /// Traverse from `seeds` and synchronize every reachable note.
    pub fn run<I, T>(mut self, seeds: I) -> Result<RunReport>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let started_at = Utc::now();
        self.seed(seeds)?;

        let mut notes = Vec::new();
        let mut depth = 0;

        loop {
            let batch = self.scheduler.drain_frontier();
            if batch.is_empty() {
                break;
            }
            debug!("Level {}: {} notes", depth, batch.len());

            for id in batch {
                let record = self.visit(id, depth);
                self.tally.record(record.outcome);
                notes.push(record);
            }
            depth += 1;
        }

        info!(
            "Run complete: {} succeeded, {} failed, {} skipped",
            self.tally.succeeded, self.tally.failed, self.tally.skipped
        );

        Ok(RunReport {
            started_at,
            finished_at: Utc::now(),
            tally: self.tally,
            visited: self.scheduler.visited(),
            levels: depth,
            notes,
        })
    }

    fn seed<I, T>(&mut self, seeds: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut queued = 0;
        for seed in seeds {
            match NoteId::new(seed.as_ref()) {
                Some(id) => {
                    let id = self.canonical(id);
                    if self.scheduler.report(id) {
                        queued += 1;
                    }
                }
                None => warn!("Ignoring blank seed"),
            }
        }

        if queued == 0 {
            return Err(SyncError::NoSeeds);
        }
        Ok(())
    }

    fn visit(&mut self, id: NoteId, depth: usize) -> NoteRecord {
        let mut record = NoteRecord {
            note: id,
            depth,
            front: None,
            outcome: Outcome::Failed,
            sync: None,
            error: None,
        };

        let result = self.process(&record.note, depth, &mut record.front);
        match result {
            Ok(action) => {
                info!("{}: {:?}", record.note, action);
                record.outcome = action.outcome();
                record.sync = Some(action);
            }
            Err(e) => {
                warn!("Failed to process '{}': {}", record.note, e);
                record.error = Some(e.to_string());
            }
        }
        record
    }

    fn process(&mut self, id: &NoteId, depth: usize, front: &mut Option<String>) -> Result<SyncAction> {
        let note = self.source.resolve(id)?;
        let prepared = prepare_note(&note, &self.builder);
        *front = Some(prepared.card.front.clone());

        if prepared.malformed_metadata {
            warn!("{}: frontmatter is not a YAML mapping, ignoring it", id);
        }

        // Links out of an excluded note are not followed
        if !prepared.card.should_skip && self.follows_links_at(depth) {
            for found in prepared.discovered {
                let found = self.canonical(found);
                let name = found.name().to_string();
                if self.scheduler.report(found) {
                    debug!("{} -> {}", id, name);
                }
            }
        }

        let result = sync_card(self.client, &prepared.card, self.config.mode);
        if !prepared.card.should_skip && !self.config.request_delay.is_zero() {
            std::thread::sleep(self.config.request_delay);
        }
        result
    }

    /// Unresolvable identifiers are kept as written and fail when visited.
    fn canonical(&self, id: NoteId) -> NoteId {
        self.source.canonical(&id).unwrap_or(id)
    }

    fn follows_links_at(&self, depth: usize) -> bool {
        self.config.max_depth.is_none_or(|max| depth < max)
    }
}
