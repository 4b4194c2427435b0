//! Note graph traversal.

mod scheduler;

pub use scheduler::{TraversalScheduler, VisitState};
