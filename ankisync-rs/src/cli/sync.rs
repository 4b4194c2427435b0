//! Sync command implementation.

use crate::anki::{AnkiConnect, MemoryStore};
use crate::cli::args::SyncArgs;
use crate::cli::output::Output;
use crate::config::Config;
use crate::error::{ExitCode, Result, SyncError};
use crate::run::{RunController, RunReport};
use crate::sync::SyncClient;
use crate::vault::{Vault, path_name};
use log::info;

pub fn run(vault: &Vault, config: &Config, args: &SyncArgs, output: &Output) -> Result<ExitCode> {
    let seeds = seeds(vault, config, args);
    if seeds.is_empty() {
        return Err(SyncError::NoSeeds);
    }

    let report = if args.dry_run {
        let store = MemoryStore::new(&config.deck);
        traverse(vault, &store, config, &seeds)?
    } else {
        let client = AnkiConnect::new(&config.endpoint, &config.deck, &config.model, config.timeout())?;
        let version = client.version()?;
        info!("Connected to AnkiConnect {} (API version {})", config.endpoint, version);
        client.create_deck()?;
        traverse(vault, &client, config, &seeds)?
    };

    output.print(&report)?;

    if report.tally.failed > 0 {
        Ok(ExitCode::NotesFailed)
    } else {
        Ok(ExitCode::Success)
    }
}

fn traverse<C: SyncClient>(vault: &Vault, client: &C, config: &Config, seeds: &[String]) -> Result<RunReport> {
    RunController::new(vault, client, config.run_config()).run(seeds)
}

/// Seeds for this run: every note with `--all`, else the configured list
/// (which command-line seeds have already replaced).
fn seeds(vault: &Vault, config: &Config, args: &SyncArgs) -> Vec<String> {
    if args.all {
        vault.list_notes().iter().map(|p| path_name(p)).collect()
    } else {
        config.seeds.clone()
    }
}
