use anyhow::Result;
use ctb_changeset::compute_change_set;

use crate::args::SessionInput;
use crate::config::CliConfig;
use crate::{io, output};

pub async fn run(config: &CliConfig, input: &SessionInput, pretty: bool) -> Result<()> {
    let replay = io::replay(&config.session, input, true).await?;
    let change_set = compute_change_set(&replay.session.current().schemas);
    io::emit(&change_set, pretty, None).await?;
    output::success(&output::tracking_summary(&change_set.tracking));
    Ok(())
}
