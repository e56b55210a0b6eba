//! Reading inputs and writing outputs

use crate::args::SessionInput;
use anyhow::{Context, Result};
use ctb_ir::{SchemaSnapshot, load_snapshot_from_str};
use ctb_session::{Action, Session, SessionConfig};
use serde::Serialize;
use std::path::Path;

/// Outcome of replaying an action script
#[derive(Debug)]
pub struct Replay {
    pub session: Session,
    pub applied: usize,
    /// Index and message of every action the session refused
    pub rejected: Vec<(usize, String)>,
}

pub async fn read_snapshot(path: &Path) -> Result<SchemaSnapshot> {
    let source = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    load_snapshot_from_str(&source).with_context(|| format!("invalid snapshot {}", path.display()))
}

pub async fn read_actions(path: &Path) -> Result<Vec<Action>> {
    let source = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read actions {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("invalid actions {}", path.display()))
}

/// Initialize a session from the snapshot and dispatch the actions
///
/// Rejected actions are recorded and skipped unless `strict` is set, in
/// which case the first one aborts the replay.
pub async fn replay(config: &SessionConfig, input: &SessionInput, strict: bool) -> Result<Replay> {
    let snapshot = read_snapshot(&input.snapshot).await?;
    let actions = match &input.actions {
        Some(path) => read_actions(path).await?,
        None => Vec::new(),
    };

    let mut session = Session::new(config);
    session
        .dispatch(Action::Init(snapshot))
        .context("snapshot rejected by init")?;

    let mut applied = 0;
    let mut rejected = Vec::new();
    for (index, action) in actions.into_iter().enumerate() {
        let name = action.name();
        match session.dispatch(action) {
            Ok(()) => applied += 1,
            Err(e) if strict => {
                return Err(e).with_context(|| format!("action #{index} ({name}) rejected"));
            }
            Err(e) => rejected.push((index, format!("{name}: {e}"))),
        }
    }

    Ok(Replay {
        session,
        applied,
        rejected,
    })
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Write JSON to `out`, or print it on stdout
pub async fn emit<T: Serialize>(value: &T, pretty: bool, out: Option<&Path>) -> Result<()> {
    let json = to_json(value, pretty)?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            tokio::fs::write(path, json + "\n")
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::PathBuf;

    const SNAPSHOT: &str = r#"{
        "components": [],
        "contentTypes": [
            { "uid": "api::article.article", "info": { "displayName": "Article" } }
        ]
    }"#;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn actions() -> String {
        json!([
            {
                "type": "addAttribute",
                "payload": {
                    "forTarget": "contentType",
                    "targetUid": "api::article.article",
                    "attribute": { "name": "title", "type": "string" }
                }
            },
            {
                "type": "removeField",
                "payload": {
                    "forTarget": "contentType",
                    "targetUid": "api::missing.missing",
                    "attributeName": "title"
                }
            },
            { "type": "undo" },
            { "type": "redo" }
        ])
        .to_string()
    }

    #[tokio::test]
    async fn test_replay_skips_rejected_actions() {
        let dir = tempfile::tempdir().unwrap();
        let input = SessionInput {
            snapshot: write(dir.path(), "snapshot.json", SNAPSHOT),
            actions: Some(write(dir.path(), "actions.json", &actions())),
        };

        let replay = replay(&SessionConfig::default(), &input, false).await.unwrap();
        assert_eq!(replay.applied, 3);
        assert_eq!(replay.rejected.len(), 1);
        assert_eq!(replay.rejected[0].0, 1);
        assert!(replay.rejected[0].1.starts_with("removeField"));

        let article = &replay.session.current().schemas.content_types["api::article.article"];
        assert_eq!(article.attributes.len(), 1);
    }

    #[tokio::test]
    async fn test_strict_replay_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = SessionInput {
            snapshot: write(dir.path(), "snapshot.json", SNAPSHOT),
            actions: Some(write(dir.path(), "actions.json", &actions())),
        };

        let err = replay(&SessionConfig::default(), &input, true).await.unwrap_err();
        assert!(err.to_string().contains("action #1 (removeField) rejected"));
    }

    #[tokio::test]
    async fn test_malformed_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(dir.path(), "bad.json", "{ not json");
        assert!(read_snapshot(&bad).await.is_err());
        assert!(read_actions(&bad).await.is_err());
        assert!(read_snapshot(&dir.path().join("missing.json")).await.is_err());
    }

    #[tokio::test]
    async fn test_emit_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out.json");
        emit(&json!({ "a": 1 }), false, Some(&out)).await.unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "{\"a\":1}\n");
    }
}
