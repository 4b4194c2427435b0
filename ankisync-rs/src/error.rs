//! Error types and exit codes for ankisync.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOTE_NOT_FOUND: i32 = 2;
    pub const VAULT_NOT_FOUND: i32 = 3;
    pub const NO_SEEDS: i32 = 4;
    pub const STORE_UNREACHABLE: i32 = 5;
    pub const NOTES_FAILED: i32 = 10;
}

/// The error string AnkiConnect returns when `addNote` hits an existing front.
pub const DUPLICATE_ERROR: &str = "cannot create note because it is a duplicate";

/// Main error type for ankisync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Vault not found at: {0}")]
    VaultNotFound(PathBuf),

    #[error("No valid seed notes to start from")]
    NoSeeds,

    #[error("Note already exists in the store: {0}")]
    DuplicateNote(String),

    #[error("Store unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Store rejected '{action}': {message}")]
    Store { action: String, message: String },

    #[error("Malformed store response to '{action}': {message}")]
    MalformedResponse { action: String, message: String },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),
}

impl SyncError {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::NoteNotFound(_) => exit_code::NOTE_NOT_FOUND,
            SyncError::VaultNotFound(_) => exit_code::VAULT_NOT_FOUND,
            SyncError::NoSeeds => exit_code::NO_SEEDS,
            SyncError::Transport(_) => exit_code::STORE_UNREACHABLE,
            _ => exit_code::GENERAL_ERROR,
        }
    }

    /// Whether the store refused a create because the front already exists.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, SyncError::DuplicateNote(_))
    }
}

/// Result type alias for ankisync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    NotesFailed,
}

impl ExitCode {
    /// Convert to exit code integer.
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => exit_code::SUCCESS,
            ExitCode::NotesFailed => exit_code::NOTES_FAILED,
        }
    }
}
