//! Snapshot files: the schema lists a host hands to `init`
//!
//! A snapshot is what the server returns for the builder: component and
//! content type lists plus the reserved names. It is stored as JSON.

use crate::graph::SchemaGraph;
use crate::schema::{Component, ContentType, ReservedNames};
use ctb_core::{BuilderError, BuilderResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Snapshot
// ============================================================================

/// Server-side schema lists
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub components: Vec<Component>,

    #[serde(default)]
    pub content_types: Vec<ContentType>,

    #[serde(default)]
    pub reserved_names: ReservedNames,
}

impl SchemaSnapshot {
    /// Capture the schemas of a graph, in uid order
    pub fn from_graph(graph: &SchemaGraph, reserved_names: ReservedNames) -> Self {
        Self {
            components: graph.components.values().cloned().collect(),
            content_types: graph.content_types.values().cloned().collect(),
            reserved_names,
        }
    }

    /// Key the schema lists by uid
    pub fn to_graph(&self) -> SchemaGraph {
        SchemaGraph::from_lists(self.components.clone(), self.content_types.clone())
    }

    /// Reject lists that use a uid twice
    pub fn check_unique(&self) -> BuilderResult<()> {
        let graph = self.to_graph();
        if graph.components.len() != self.components.len()
            || graph.content_types.len() != self.content_types.len()
        {
            return Err(BuilderError::InvalidSchema(
                "snapshot lists the same uid more than once".to_string(),
            ));
        }
        if let Some(uid) = graph
            .components
            .keys()
            .find(|uid| graph.content_types.contains_key(*uid))
        {
            return Err(BuilderError::InvalidSchema(format!(
                "{uid} is both a component and a content type"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Save Functions
// ============================================================================

/// Save a snapshot to a pretty-printed JSON file
pub fn save_snapshot(snapshot: &SchemaSnapshot, path: impl AsRef<Path>) -> BuilderResult<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(snapshot).map_err(|e| BuilderError::FileWrite {
        path: path.to_path_buf(),
        message: format!("Failed to serialize snapshot: {}", e),
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| BuilderError::FileWrite {
            path: parent.to_path_buf(),
            message: e.to_string(),
        })?;
    }

    std::fs::write(path, json).map_err(|e| BuilderError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

// ============================================================================
// Load Functions
// ============================================================================

/// Load a snapshot from a JSON file
pub fn load_snapshot(path: impl AsRef<Path>) -> BuilderResult<SchemaSnapshot> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| BuilderError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    load_snapshot_from_str(&json).map_err(|e| match e {
        BuilderError::JsonSerialization(je) => BuilderError::FileRead {
            path: path.to_path_buf(),
            message: format!("Invalid snapshot file: {}", je),
        },
        other => other,
    })
}

/// Parse a snapshot from JSON text
pub fn load_snapshot_from_str(json: &str) -> BuilderResult<SchemaSnapshot> {
    let snapshot: SchemaSnapshot = serde_json::from_str(json)?;
    snapshot.check_unique()?;
    Ok(snapshot)
}

// ============================================================================
// Tests
// ============================================================================
