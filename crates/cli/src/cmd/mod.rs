use anyhow::Result;

use crate::args::{Cli, Command};
use crate::config::CliConfig;

mod check;
mod diff;
mod replay;
mod views;

pub async fn dispatch(cli: Cli, config: CliConfig) -> Result<()> {
    let pretty = config.output.pretty && !cli.compact;
    match &cli.command {
        Command::Replay { input, out, strict } => {
            replay::run(&config, input, out.as_deref(), *strict, pretty).await
        }
        Command::Diff { input } => diff::run(&config, input, pretty).await,
        Command::Views { input } => views::run(&config, input, pretty).await,
        Command::Check {
            input,
            deny_warnings,
        } => check::run(&config, input, *deny_warnings, pretty).await,
    }
}
