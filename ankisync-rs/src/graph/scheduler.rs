//! Breadth-first scheduling of discovered notes.
//!
//! Every identifier moves through `Unseen -> Queued -> Visited` exactly once.
//! Reports of queued or visited identifiers are ignored, which is what makes
//! a traversal over cyclic links terminate.

use crate::types::NoteId;
use std::collections::HashMap;

/// Per-identifier traversal state. Absent from the map means unseen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    Queued,
    Visited,
}

/// Owner of the visited set and the pending frontier.
#[derive(Debug, Default)]
pub struct TraversalScheduler {
    states: HashMap<NoteId, VisitState>,
    frontier: Vec<NoteId>,
}

impl TraversalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an identifier for the next level.
    ///
    /// Returns `true` if it was unseen and is now queued.
    pub fn report(&mut self, id: NoteId) -> bool {
        if self.states.contains_key(&id) {
            return false;
        }
        self.states.insert(id.clone(), VisitState::Queued);
        self.frontier.push(id);
        true
    }

    /// Take the current frontier as one batch, marking every member visited.
    ///
    /// Marking happens here rather than after processing, so a note that
    /// fails is never queued again.
    pub fn drain_frontier(&mut self) -> Vec<NoteId> {
        let batch = std::mem::take(&mut self.frontier);
        for id in &batch {
            self.states.insert(id.clone(), VisitState::Visited);
        }
        batch
    }

    /// State of an identifier, `None` if never reported.
    pub fn state(&self, id: &NoteId) -> Option<VisitState> {
        self.states.get(id).copied()
    }

    pub fn has_pending(&self) -> bool {
        !self.frontier.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.frontier.len()
    }

    /// Number of identifiers handed out by [`Self::drain_frontier`] so far.
    pub fn visited(&self) -> usize {
        self.states
            .values()
            .filter(|state| **state == VisitState::Visited)
            .count()
    }
}
