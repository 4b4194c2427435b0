//! Check command implementation.

use crate::anki::{API_VERSION, AnkiConnect};
use crate::cli::args::CheckArgs;
use crate::cli::output::Output;
use crate::config::Config;
use crate::error::Result;
use log::warn;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub endpoint: String,
    pub version: u32,
    /// Whether the add-on speaks the API version this client uses.
    pub compatible: bool,
}

pub fn run(config: &Config, args: &CheckArgs, output: &Output) -> Result<()> {
    let endpoint = args.endpoint.clone().unwrap_or_else(|| config.endpoint.clone());
    let client = AnkiConnect::new(&endpoint, &config.deck, &config.model, config.timeout())?;
    let version = client.version()?;

    let compatible = version >= u32::from(API_VERSION);
    if !compatible {
        warn!(
            "AnkiConnect at {} reports API version {}, expected {}",
            endpoint, version, API_VERSION
        );
    }

    output.print(&CheckResponse {
        endpoint,
        version,
        compatible,
    })
}
