//! Flashcard store clients.
//!
//! [`AnkiConnect`] talks to a running Anki over its local JSON API.
//! [`MemoryStore`] keeps notes in memory for dry runs and tests.

mod connect;
mod memory;

pub use connect::{API_VERSION, AnkiConnect, DEFAULT_ENDPOINT};
pub use memory::{MemoryStore, StoredNote};
