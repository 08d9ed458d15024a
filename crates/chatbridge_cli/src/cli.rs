//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Bridge between an editor chat panel and a streaming chat model
#[derive(Parser, Debug)]
#[command(name = "chatbridge", about, version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Model identifier. Uses CHATBRIDGE_MODEL env if not set.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// File holding the editor payload; `-` or absent reads stdin
    #[arg(long, global = true)]
    pub payload: Option<PathBuf>,

    /// Log filter for stderr (e.g. debug, chatbridge_runtime=trace).
    /// Uses CHATBRIDGE_LOG or RUST_LOG if not set.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Fail instead of skipping opened files that cannot be read
    #[arg(long, global = true)]
    pub strict_files: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Answer the prompt, streaming protocol events to stdout (default)
    Run,
    /// Print the message list that would be sent, without calling the model
    Messages,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["chatbridge"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(cli.payload.is_none());
        assert!(!cli.strict_files);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "chatbridge",
            "messages",
            "--model",
            "openai/o3",
            "--payload",
            "req.json",
            "--strict-files",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Command::Messages));
        assert_eq!(cli.model.as_deref(), Some("openai/o3"));
        assert_eq!(cli.payload, Some(PathBuf::from("req.json")));
        assert!(cli.strict_files);
    }

    #[test]
    fn test_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["chatbridge", "serve"]).is_err());
    }
}
