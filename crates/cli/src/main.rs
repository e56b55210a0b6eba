//! Content-Type Builder
//!
//! Command-line host for schema-editing sessions. Logs go to stderr and are
//! filtered with `RUST_LOG` (default `warn`).

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    ctb_cli::run().await
}
