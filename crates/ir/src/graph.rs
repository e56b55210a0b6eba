//! The schema graph: content types and components keyed by uid
//!
//! Schemas never hold references to each other; relations, component
//! attributes and dynamic zones name their targets by uid and every
//! cross-schema step goes through a lookup here.

use crate::schema::{Component, ContentType, SchemaEntity};
use ctb_core::{BuilderError, BuilderResult, ForTarget, SchemaUid};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Two flat maps of schemas, keyed by uid
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaGraph {
    #[serde(default)]
    pub components: BTreeMap<SchemaUid, Component>,

    #[serde(default)]
    pub content_types: BTreeMap<SchemaUid, ContentType>,
}

impl SchemaGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from schema lists; later duplicates win
    pub fn from_lists(components: Vec<Component>, content_types: Vec<ContentType>) -> Self {
        Self {
            components: components
                .into_iter()
                .map(|c| (c.uid.clone(), c))
                .collect(),
            content_types: content_types
                .into_iter()
                .map(|ct| (ct.uid.clone(), ct))
                .collect(),
        }
    }

    /// Add a content type (builder style)
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_types
            .insert(content_type.uid.clone(), content_type);
        self
    }

    /// Add a component (builder style)
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.insert(component.uid.clone(), component);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.content_types.is_empty()
    }

    pub fn contains(&self, target: ForTarget, uid: &str) -> bool {
        match target {
            ForTarget::ContentType => self.content_types.contains_key(uid),
            ForTarget::Component => self.components.contains_key(uid),
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Look up a schema in the map `target` selects
    pub fn schema(&self, target: ForTarget, uid: &str) -> BuilderResult<&dyn SchemaEntity> {
        let found = match target {
            ForTarget::ContentType => self
                .content_types
                .get(uid)
                .map(|ct| ct as &dyn SchemaEntity),
            ForTarget::Component => self.components.get(uid).map(|c| c as &dyn SchemaEntity),
        };
        found.ok_or_else(|| BuilderError::schema_not_found(target, uid))
    }

    /// Mutable lookup in the map `target` selects
    pub fn schema_mut(
        &mut self,
        target: ForTarget,
        uid: &str,
    ) -> BuilderResult<&mut dyn SchemaEntity> {
        let found = match target {
            ForTarget::ContentType => self
                .content_types
                .get_mut(uid)
                .map(|ct| ct as &mut dyn SchemaEntity),
            ForTarget::Component => self
                .components
                .get_mut(uid)
                .map(|c| c as &mut dyn SchemaEntity),
        };
        found.ok_or_else(|| BuilderError::schema_not_found(target, uid))
    }

    /// Which map holds `uid` (content types are checked first)
    pub fn locate(&self, uid: &str) -> Option<ForTarget> {
        if self.content_types.contains_key(uid) {
            Some(ForTarget::ContentType)
        } else if self.components.contains_key(uid) {
            Some(ForTarget::Component)
        } else {
            None
        }
    }

    /// Resolve the target schema of a relation
    pub fn relation_target(&self, uid: &str) -> BuilderResult<&dyn SchemaEntity> {
        let target = self
            .locate(uid)
            .ok_or_else(|| BuilderError::RelationTargetNotFound(uid.to_string()))?;
        self.schema(target, uid)
    }

    /// Mutable variant of [`SchemaGraph::relation_target`]
    pub fn relation_target_mut(&mut self, uid: &str) -> BuilderResult<&mut dyn SchemaEntity> {
        let target = self
            .locate(uid)
            .ok_or_else(|| BuilderError::RelationTargetNotFound(uid.to_string()))?;
        self.schema_mut(target, uid)
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Every schema, components first
    pub fn entities(&self) -> impl Iterator<Item = &dyn SchemaEntity> + '_ {
        self.components
            .values()
            .map(|c| c as &dyn SchemaEntity)
            .chain(
                self.content_types
                    .values()
                    .map(|ct| ct as &dyn SchemaEntity),
            )
    }

    /// Every schema, mutably, components first
    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut dyn SchemaEntity> + '_ {
        self.components
            .values_mut()
            .map(|c| c as &mut dyn SchemaEntity)
            .chain(
                self.content_types
                    .values_mut()
                    .map(|ct| ct as &mut dyn SchemaEntity),
            )
    }
}

// ============================================================================
// Tests
// ============================================================================
