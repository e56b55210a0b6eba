//! Command-line arguments

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "content-type-builder",
    version,
    about = "Replay, diff and inspect Content-Type Builder sessions"
)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, short, global = true, env = "CTB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Single-line JSON output, overriding the config file
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored summaries
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Where a session starts and which actions it replays
#[derive(Args, Debug, Clone)]
pub struct SessionInput {
    /// Snapshot JSON: `{components, contentTypes, reservedNames}`
    pub snapshot: PathBuf,

    /// JSON array of `{type, payload}` actions dispatched after `init`
    #[arg(long, short)]
    pub actions: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Replay actions and print the resulting session (`past`, `current`, `future`)
    Replay {
        #[command(flatten)]
        input: SessionInput,

        /// Write the session JSON here instead of stdout
        #[arg(long, short)]
        out: Option<PathBuf>,

        /// Stop at the first rejected action instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// Print the update-schema request for the replayed session
    Diff {
        #[command(flatten)]
        input: SessionInput,
    },

    /// Print the derived navigation and nesting views
    Views {
        #[command(flatten)]
        input: SessionInput,
    },

    /// Validate the schema graph of the replayed session
    Check {
        #[command(flatten)]
        input: SessionInput,

        /// Fail on warnings too
        #[arg(long)]
        deny_warnings: bool,
    },
}

impl Command {
    pub fn input(&self) -> &SessionInput {
        match self {
            Command::Replay { input, .. }
            | Command::Diff { input }
            | Command::Views { input }
            | Command::Check { input, .. } => input,
        }
    }
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
    fn test_parse_replay() {
        let cli = Cli::try_parse_from([
            "content-type-builder",
            "replay",
            "snapshot.json",
            "--actions",
            "actions.json",
            "--strict",
            "--compact",
        ])
        .unwrap();
        assert!(cli.compact);
        let Command::Replay { input, out, strict } = &cli.command else {
            panic!("expected replay");
        };
        assert_eq!(input.snapshot, PathBuf::from("snapshot.json"));
        assert_eq!(input.actions, Some(PathBuf::from("actions.json")));
        assert!(out.is_none());
        assert!(*strict);
    }

    #[test]
    fn test_parse_check_without_actions() {
        let cli = Cli::try_parse_from(["content-type-builder", "check", "s.json", "--deny-warnings"])
            .unwrap();
        assert!(matches!(cli.command, Command::Check { deny_warnings: true, .. }));
        assert!(cli.command.input().actions.is_none());
    }

    #[test]
    fn test_snapshot_is_required() {
        assert!(Cli::try_parse_from(["content-type-builder", "diff"]).is_err());
    }
}
