//! Configuration loaded from `config.toml`.
//!
//! Lookup order: an explicit `--config` path, then
//! `<config_dir>/ankisync/config.toml`, then built-in defaults. Command-line
//! flags are applied on top by the binary.

use crate::anki::DEFAULT_ENDPOINT;
use crate::error::{Result, SyncError};
use crate::run::RunConfig;
use crate::sync::SyncMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for a sync run. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folder holding the notes.
    pub vault: Option<PathBuf>,
    /// Target deck.
    pub deck: String,
    /// Note type with `Front` and `Back` fields.
    pub model: String,
    /// AnkiConnect URL.
    pub endpoint: String,
    /// Prepended to every card front.
    pub prefix: String,
    /// Update cards whose front already exists instead of skipping them.
    pub upsert: bool,
    /// Notes the traversal starts from.
    pub seeds: Vec<String>,
    /// Pause after every card sent to the store.
    pub request_delay_ms: u64,
    /// Tag for notes that declare none.
    pub default_tag: Option<String>,
    /// Stop following links past this many hops from the seeds.
    pub max_depth: Option<usize>,
    /// HTTP timeout for store requests.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vault: None,
            deck: "Default".to_string(),
            model: "Basic".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            prefix: String::new(),
            upsert: false,
            seeds: Vec::new(),
            request_delay_ms: 100,
            default_tag: None,
            max_depth: None,
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ankisync").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. The default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(SyncError::ConfigError(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_file(&path),
            _ => Ok(Self::default()),
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Vault folder: the command-line value, else the configured one, else
    /// the current directory.
    pub fn resolve_vault_path(&self, cli_vault: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_vault {
            return Ok(path.to_path_buf());
        }
        if let Some(ref path) = self.vault {
            return Ok(path.clone());
        }
        Ok(std::env::current_dir()?)
    }

    /// The value object handed to the run controller.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            prefix: self.prefix.clone(),
            mode: SyncMode::from_upsert(self.upsert),
            default_tag: self.default_tag.clone(),
            request_delay: Duration::from_millis(self.request_delay_ms),
            max_depth: self.max_depth,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
