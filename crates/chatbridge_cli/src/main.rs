//! CLI entry point for chatbridge.
//!
//! stdout carries the JSON-lines host protocol; all diagnostics go to stderr.

mod cli;
mod commands;

use std::path::Path;

use chatbridge_observability::ObservabilityConfig;
use clap::Parser;

use crate::cli::Cli;

/// Load env files before reading any config.
/// Order: 1) ~/.chatbridge/env  2) nearest .env from the working directory up.
/// dotenvy never overrides variables already set, so the real environment wins.
fn load_env_files() {
    if let Some(home) = dirs::home_dir() {
        let config_path = home.join(".chatbridge").join("env");
        if config_path.exists() {
            let _ = dotenvy::from_path(&config_path);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(env_file) = find_upwards(&cwd, ".env") {
            let _ = dotenvy::from_path(&env_file);
        }
    }
}

fn find_upwards(start: &Path, name: &str) -> Option<std::path::PathBuf> {
    start
        .ancestors()
        .take(32)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[tokio::main]
async fn main() {
    load_env_files();
    let cli = Cli::parse();

    let mut observability = ObservabilityConfig::from_env().with_version(env!("CARGO_PKG_VERSION"));
    if let Some(ref level) = cli.log_level {
        observability = observability.with_log_level(level.clone());
    }
    if let Err(e) = chatbridge_observability::init(observability) {
        eprintln!("chatbridge: logging disabled: {e}");
    }

    if let Err(e) = commands::handle(cli).await {
        tracing::debug!(error = ?e, "exiting with failure");
        eprintln!("chatbridge: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_upwards_picks_nearest() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(".env"), "X=1").unwrap();
        std::fs::write(root.path().join("a").join(".env"), "X=2").unwrap();

        let found = find_upwards(&nested, ".env").unwrap();
        assert_eq!(found, root.path().join("a").join(".env"));
    }

    #[test]
    fn test_find_upwards_none() {
        let root = tempfile::tempdir().unwrap();
        assert!(find_upwards(root.path(), "definitely-not-here.env").is_none());
    }
}
