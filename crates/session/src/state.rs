//! The state a session renders from

use ctb_ir::{ReservedNames, SchemaGraph, SchemaSnapshot};
use serde::{Deserialize, Serialize};

/// One snapshot of a builder session
///
/// `schemas` is the live graph the user edits; `initial` is the graph as
/// last received from the server and is what edits are measured against.
///
/// On the wire both graphs are flat: `components`, `contentTypes`,
/// `initialComponents` and `initialContentTypes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(flatten)]
    pub schemas: SchemaGraph,

    #[serde(flatten, with = "initial_graph")]
    pub initial: SchemaGraph,

    #[serde(default)]
    pub reserved_names: ReservedNames,

    #[serde(default)]
    pub is_loading: bool,
}

impl Default for SessionState {
    /// Empty state of a builder that has not received its schemas yet
    fn default() -> Self {
        Self {
            schemas: SchemaGraph::new(),
            initial: SchemaGraph::new(),
            reserved_names: ReservedNames::default(),
            is_loading: true,
        }
    }
}

impl SessionState {
    /// Loaded state for a server snapshot
    pub fn from_snapshot(snapshot: SchemaSnapshot) -> Self {
        let schemas = snapshot.to_graph();
        Self {
            initial: schemas.clone(),
            schemas,
            reserved_names: snapshot.reserved_names,
            is_loading: false,
        }
    }

    /// Whether the live graph differs from the server graph
    pub fn is_modified(&self) -> bool {
        self.schemas != self.initial
    }
}

/// The server graph under `initial`-prefixed keys
mod initial_graph {
    use ctb_ir::{Component, ContentType, SchemaGraph, SchemaUid};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct InitialRef<'a> {
        initial_components: &'a BTreeMap<SchemaUid, Component>,
        initial_content_types: &'a BTreeMap<SchemaUid, ContentType>,
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct InitialOwned {
        #[serde(default)]
        initial_components: BTreeMap<SchemaUid, Component>,
        #[serde(default)]
        initial_content_types: BTreeMap<SchemaUid, ContentType>,
    }

    pub fn serialize<S: Serializer>(graph: &SchemaGraph, serializer: S) -> Result<S::Ok, S::Error> {
        InitialRef {
            initial_components: &graph.components,
            initial_content_types: &graph.content_types,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SchemaGraph, D::Error> {
        let initial = InitialOwned::deserialize(deserializer)?;
        Ok(SchemaGraph {
            components: initial.initial_components,
            content_types: initial.initial_content_types,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctb_ir::ContentType;

    #[test]
    fn test_default_is_loading() {
        let state = SessionState::default();
        assert!(state.is_loading);
        assert!(state.schemas.is_empty());
        assert!(!state.is_modified());
    }

    #[test]
    fn test_from_snapshot() {
        let state = SessionState::from_snapshot(SchemaSnapshot {
            content_types: vec![ContentType::new("api::tag.tag", "Tag")],
            ..Default::default()
        });
        assert!(!state.is_loading);
        assert_eq!(state.schemas, state.initial);
        assert!(state.schemas.content_types.contains_key("api::tag.tag"));
    }

    #[test]
    fn test_is_modified() {
        let mut state = SessionState::from_snapshot(SchemaSnapshot::default());
        state.schemas = state
            .schemas
            .clone()
            .with_content_type(ContentType::new("api::tag.tag", "Tag"));
        assert!(state.is_modified());
    }

    #[test]
    fn test_json_shape() {
        let state = SessionState::from_snapshot(SchemaSnapshot {
            content_types: vec![ContentType::new("api::tag.tag", "Tag")],
            ..Default::default()
        });
        let value = serde_json::to_value(&state).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "components",
                "contentTypes",
                "initialComponents",
                "initialContentTypes",
                "reservedNames",
                "isLoading"
            ]
        );
        assert!(value["initialContentTypes"]["api::tag.tag"].is_object());
    }

    #[test]
    fn test_json_roundtrip_keeps_initial() {
        let mut state = SessionState::from_snapshot(SchemaSnapshot {
            content_types: vec![ContentType::new("api::tag.tag", "Tag")],
            ..Default::default()
        });
        state.schemas.content_types.clear();

        let value = serde_json::to_value(&state).unwrap();
        let parsed: SessionState = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, state);
        assert!(parsed.initial.content_types.contains_key("api::tag.tag"));
    }
}
