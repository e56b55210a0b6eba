use anyhow::Result;
use std::path::Path;

use crate::args::SessionInput;
use crate::config::CliConfig;
use crate::{io, output};

pub async fn run(
    config: &CliConfig,
    input: &SessionInput,
    out: Option<&Path>,
    strict: bool,
    pretty: bool,
) -> Result<()> {
    let replay = io::replay(&config.session, input, strict).await?;
    io::emit(&replay.session, pretty, out).await?;

    for (index, message) in &replay.rejected {
        output::warning(&format!("action #{index} skipped: {message}"));
    }
    let history = replay.session.history();
    output::success(&output::replay_summary(
        replay.applied,
        replay.rejected.len(),
        history.undo_count(),
        history.redo_count(),
    ));
    Ok(())
}
