//! Command dispatch.

pub mod messages;
pub mod run;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chatbridge_runtime::{MissingFilePolicy, RuntimeConfig};

use crate::cli::{Cli, Command};

pub async fn handle(cli: Cli) -> Result<()> {
    let config = runtime_config(&cli);
    let payload = read_payload(cli.payload.as_deref())?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run::handle(config, &payload).await,
        Command::Messages => messages::handle(config, &payload),
    }
}

/// Env first, then flags on top.
fn runtime_config(cli: &Cli) -> RuntimeConfig {
    let mut config = RuntimeConfig::from_env();
    if let Some(ref model) = cli.model {
        config = config.with_model(model.clone());
    }
    if cli.strict_files {
        config = config.with_missing_file_policy(MissingFilePolicy::Fail);
    }
    config
}

fn read_payload(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read payload from {}", path.display())),
        _ => {
            let mut payload = String::new();
            std::io::stdin()
                .read_to_string(&mut payload)
                .context("failed to read payload from stdin")?;
            Ok(payload)
        }
    }
}
