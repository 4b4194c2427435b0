//! ankisync CLI entry point.

use clap::Parser;
use log::LevelFilter;
use std::process::ExitCode;
use ankisync::cli::args::{Cli, Commands};
use ankisync::cli::output::Output;
use ankisync::cli::{check, preview, sync};
use ankisync::config::Config;
use ankisync::error::{ExitCode as SyncExitCode, SyncError};
use ankisync::vault::Vault;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(code) => ExitCode::from(code.code() as u8),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<SyncExitCode, SyncError> {
    let mut config = Config::load(cli.config.as_deref())?;
    let output = Output::new(cli.output_format());

    match &cli.command {
        Commands::Sync(args) => {
            args.apply(&mut config);
            let vault = open_vault(cli, &config)?;
            sync::run(&vault, &config, args, &output)
        }
        Commands::Check(args) => {
            check::run(&config, args, &output)?;
            Ok(SyncExitCode::Success)
        }
        Commands::Preview(args) => {
            let vault = open_vault(cli, &config)?;
            preview::run(&vault, &config, args, &output)?;
            Ok(SyncExitCode::Success)
        }
    }
}

fn open_vault(cli: &Cli, config: &Config) -> Result<Vault, SyncError> {
    let vault_path = config.resolve_vault_path(cli.vault.as_deref())?;
    Vault::open(vault_path)
}
