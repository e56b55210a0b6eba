//! Session configuration

use ctb_core::{BuilderError, BuilderResult};
use serde::{Deserialize, Serialize};

/// Default number of undo steps kept
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Tunables of a builder session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SessionConfig {
    /// Maximum number of snapshots kept for undo; the oldest is dropped first
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl SessionConfig {
    /// Config with a custom history limit
    pub fn with_history_limit(history_limit: usize) -> Self {
        Self { history_limit }
    }

    /// Reject values a session cannot work with
    pub fn validate(&self) -> BuilderResult<()> {
        if self.history_limit == 0 {
            return Err(BuilderError::InvalidConfig(
                "history_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
