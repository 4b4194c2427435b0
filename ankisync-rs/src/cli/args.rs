//! CLI argument definitions using clap.

use crate::config::Config;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ankisync")]
#[command(author, version, about = "Sync linked markdown notes into Anki", long_about = None)]
pub struct Cli {
    /// Path to the vault (overrides config default)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Path to a config file (default: <config dir>/ankisync/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml"])]
    pub toml: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else {
            OutputFormat::Json
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Follow links from the seed notes and sync every note reached
    Sync(SyncArgs),

    /// Check that AnkiConnect is reachable
    Check(CheckArgs),

    /// Show the card a note would produce, without contacting Anki
    Preview(PreviewArgs),
}

// === Sync ===

#[derive(Parser, Debug, Default)]
pub struct SyncArgs {
    /// Notes to start from (overrides configured seeds)
    pub seeds: Vec<String>,

    /// Seed with every note in the vault
    #[arg(long)]
    pub all: bool,

    /// Update cards that already exist instead of skipping them
    #[arg(long)]
    pub upsert: bool,

    /// Only create cards, even when the config enables upsert
    #[arg(long, conflicts_with = "upsert")]
    pub no_upsert: bool,

    /// Prefix for card fronts
    #[arg(long)]
    pub prefix: Option<String>,

    /// Target deck
    #[arg(long)]
    pub deck: Option<String>,

    /// Note type with Front and Back fields
    #[arg(long)]
    pub model: Option<String>,

    /// AnkiConnect URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Pause after each card sent to Anki, in milliseconds
    #[arg(long = "delay-ms")]
    pub delay_ms: Option<u64>,

    /// Do not follow links more than this many hops from a seed
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Tag for notes that declare none
    #[arg(long)]
    pub default_tag: Option<String>,

    /// Sync into an in-memory store instead of Anki
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    /// Apply command-line overrides to the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if !self.seeds.is_empty() {
            config.seeds = self.seeds.clone();
        }
        if self.upsert {
            config.upsert = true;
        }
        if self.no_upsert {
            config.upsert = false;
        }
        if let Some(ref prefix) = self.prefix {
            config.prefix = prefix.clone();
        }
        if let Some(ref deck) = self.deck {
            config.deck = deck.clone();
        }
        if let Some(ref model) = self.model {
            config.model = model.clone();
        }
        if let Some(ref endpoint) = self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(delay_ms) = self.delay_ms {
            config.request_delay_ms = delay_ms;
        }
        if self.max_depth.is_some() {
            config.max_depth = self.max_depth;
        }
        if self.default_tag.is_some() {
            config.default_tag = self.default_tag.clone();
        }
    }
}

// === Check ===

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// AnkiConnect URL
    #[arg(long)]
    pub endpoint: Option<String>,
}

// === Preview ===

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Note name or path
    pub note: String,

    /// Prefix for the card front
    #[arg(long)]
    pub prefix: Option<String>,

    /// Tag for notes that declare none
    #[arg(long)]
    pub default_tag: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sync() {
        let cli = Cli::try_parse_from([
            "ankisync", "--vault", "/notes", "sync", "Ownership", "Traits", "--upsert", "--prefix", "rust::",
        ])
        .unwrap();
        assert_eq!(cli.vault, Some(PathBuf::from("/notes")));
        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.seeds, vec!["Ownership", "Traits"]);
                assert!(args.upsert);
                assert_eq!(args.prefix.as_deref(), Some("rust::"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_output_formats_conflict() {
        assert!(Cli::try_parse_from(["ankisync", "--json", "--yaml", "check"]).is_err());
        let cli = Cli::try_parse_from(["ankisync", "check", "--toml"]).unwrap();
        assert_eq!(cli.output_format(), OutputFormat::Toml);
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config {
            seeds: vec!["Configured".into()],
            deck: "Configured".into(),
            ..Config::default()
        };
        let args = SyncArgs {
            deck: Some("Cli".into()),
            delay_ms: Some(0),
            ..SyncArgs::default()
        };
        args.apply(&mut config);
        assert_eq!(config.deck, "Cli");
        assert_eq!(config.request_delay_ms, 0);
        assert_eq!(config.seeds, vec!["Configured"]);
        assert!(!config.upsert);
    }

    #[test]
    fn test_no_upsert_overrides_config() {
        let mut config = Config {
            upsert: true,
            ..Config::default()
        };
        let cli = Cli::try_parse_from(["ankisync", "sync", "Start", "--no-upsert"]).unwrap();
        let Commands::Sync(args) = cli.command else {
            panic!("expected sync");
        };
        args.apply(&mut config);
        assert!(!config.upsert);

        assert!(Cli::try_parse_from(["ankisync", "sync", "--upsert", "--no-upsert"]).is_err());
    }
}
