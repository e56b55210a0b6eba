use anyhow::{Result, bail};
use ctb_ir::validate_graph;

use crate::args::SessionInput;
use crate::config::CliConfig;
use crate::{io, output};

pub async fn run(
    config: &CliConfig,
    input: &SessionInput,
    deny_warnings: bool,
    pretty: bool,
) -> Result<()> {
    let replay = io::replay(&config.session, input, true).await?;
    let result = validate_graph(&replay.session.current().schemas);
    io::emit(&result, pretty, None).await?;
    output::print_validation(&result);

    if result.has_errors() {
        bail!("validation failed with {} error(s)", result.errors.len());
    }
    if deny_warnings && result.has_warnings() {
        bail!("validation produced {} warning(s)", result.warnings.len());
    }
    Ok(())
}
