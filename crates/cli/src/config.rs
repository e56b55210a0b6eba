//! CLI configuration file
//!
//! ```toml
//! [session]
//! history_limit = 100
//!
//! [output]
//! pretty = false
//! ```

use anyhow::{Context, Result};
use ctb_session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub session: SessionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl CliConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: CliConfig = toml::from_str(source).context("invalid configuration file")?;
        config.session.validate()?;
        Ok(config)
    }

    /// Load the file at `path`, or the defaults when no path is given
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let source = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml(&source)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }
}
