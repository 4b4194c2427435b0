//! CLI command implementations.

pub mod args;
pub mod output;

pub mod check;
pub mod preview;
pub mod sync;

pub use args::{Cli, Commands};
pub use output::Output;
