//! ankisync - turn a folder of linked markdown notes into Anki flashcards.
//!
//! # Overview
//!
//! Starting from one or more seed notes, ankisync follows `[[wikilinks]]`
//! level by level and turns every note it reaches into a card:
//! - Front: the note name, with an optional prefix
//! - Back: the note body rendered to HTML, links and image embeds rewritten
//! - Tags: frontmatter `tags` plus inline `#tags`
//!
//! Cards go to a [`SyncClient`], either the AnkiConnect add-on or an
//! in-memory store for dry runs. Notes tagged `not_included` are visited but
//! never sent, and their links are not followed.
//!
//! # Example
//!
//! ```no_run
//! use ankisync::{AnkiConnect, Config, RunController, Vault};
//!
//! let config = Config::default();
//! let vault = Vault::open("/path/to/vault").unwrap();
//! let client = AnkiConnect::new(&config.endpoint, "Rust", &config.model, config.timeout()).unwrap();
//!
//! let report = RunController::new(&vault, &client, config.run_config())
//!     .run(["Ownership"])
//!     .unwrap();
//! println!("{} cards synced", report.tally.succeeded);
//! ```

pub mod anki;
pub mod card;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod parser;
pub mod run;
pub mod sync;
pub mod types;
pub mod vault;

// Re-export main types at crate root
pub use anki::{AnkiConnect, MemoryStore};
pub use card::{CardBuilder, HtmlRenderer, MarkupRenderer};
pub use config::Config;
pub use error::{Result, SyncError};
pub use run::{RunConfig, RunController, RunReport, prepare_note};
pub use sync::{SyncAction, SyncClient, SyncMode, sync_card};
pub use types::*;
pub use vault::{NoteSource, SourceNote, Vault};
