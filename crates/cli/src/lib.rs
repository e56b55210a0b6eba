//! # Content-Type Builder CLI
//!
//! Drives builder sessions from JSON files instead of the admin UI.
//!
//! ## Commands
//!
//! - `replay` - Dispatch an action script and print the session
//! - `diff` - Print the update-schema request of the replayed session
//! - `views` - Print the navigation and nesting views
//! - `check` - Validate the replayed schema graph
//!
//! Every command starts from a snapshot file (what the server returns for
//! `init`) and optionally an action script.

pub mod args;
mod cmd;
pub mod config;
pub mod io;
pub mod output;

use anyhow::Result;
use clap::Parser;

pub use args::{Cli, Command, SessionInput};
pub use config::{CliConfig, OutputConfig};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse the process arguments and run the selected command
pub async fn run() -> Result<()> {
    run_with(Cli::parse()).await
}

/// Run an already parsed command line
pub async fn run_with(cli: Cli) -> Result<()> {
    output::init(cli.no_color);
    let config = CliConfig::load(cli.config.as_deref()).await?;
    tracing::debug!(command = ?cli.command, "running");
    cmd::dispatch(cli, config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[tokio::test]
    async fn test_missing_config_fails_before_command() {
        let cli = Cli::try_parse_from([
            "content-type-builder",
            "--config",
            "/nonexistent/ctb.toml",
            "check",
            "/nonexistent/snapshot.json",
        ])
        .unwrap();
        let err = run_with(cli).await.unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
