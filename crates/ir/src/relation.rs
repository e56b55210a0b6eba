//! Relation-nature resolution and mirror synthesis
//!
//! A relation is stored with a declared cardinality and an optional
//! `targetAttribute`. Without a target attribute, `oneToOne` and `oneToMany`
//! degrade to their one-sided forms (`oneWay`, `manyWay`). Every two-sided
//! relation is paired with a mirror attribute on its target whose
//! cardinality is the inverse.

use crate::attribute::{Attribute, AttributeKind, PRIVATE_KEY, RelationAttribute};
use crate::schema::ContentType;
use ctb_core::{BuilderError, BuilderResult, ContentTypeKind, RelationKind, Status};
use serde_json::Value;

// ============================================================================
// Resolver
// ============================================================================

/// Resolve the effective relation kind from the declared cardinality and
/// the presence of a target attribute
///
/// # Examples
///
/// - (`oneToOne`, None) -> `oneWay`
/// - (`oneToMany`, None) -> `manyWay`
/// - (`oneToOne`, Some("article")) -> `oneToOne`
/// - (`manyToMany`, _) -> `manyToMany`
pub fn resolve_relation_kind(relation: RelationKind, target_attribute: Option<&str>) -> RelationKind {
    let has_target_attribute = target_attribute.is_some_and(|name| !name.is_empty());
    match (relation, has_target_attribute) {
        (RelationKind::OneToOne, false) => RelationKind::OneWay,
        (RelationKind::OneToMany, false) => RelationKind::ManyWay,
        (kind, _) => kind,
    }
}

/// Cardinality of the opposite side of a relation
///
/// One-sided kinds have no opposite side and map to themselves.
pub fn invert_relation_kind(kind: RelationKind) -> RelationKind {
    match kind {
        RelationKind::ManyToOne => RelationKind::OneToMany,
        RelationKind::OneToMany => RelationKind::ManyToOne,
        other => other,
    }
}

// ============================================================================
// Mirror Synthesis
// ============================================================================

/// Build the mirror attribute a relation implies on its target
///
/// Returns `None` for non-relations and one-sided relations. The mirror has
/// status `NEW` and carries the source's `private` flag.
pub fn mirror_for(owner_uid: &str, attribute: &Attribute) -> BuilderResult<Option<Attribute>> {
    let Some(relation) = attribute.as_relation() else {
        return Ok(None);
    };
    let kind = relation.resolved_kind();
    if kind.is_one_sided() {
        return Ok(None);
    }
    let Some(mirror_name) = relation.target_attribute.clone() else {
        return Err(BuilderError::MissingTargetAttribute {
            attribute: attribute.name.clone(),
            relation: kind.to_string(),
        });
    };

    let mut mirror = Attribute::new(
        mirror_name,
        AttributeKind::Relation(RelationAttribute::new(
            invert_relation_kind(kind),
            owner_uid,
            Some(attribute.name.clone()),
        )),
    )
    .with_status(Status::New);
    if let Some(private) = attribute.private() {
        mirror
            .options
            .insert(PRIVATE_KEY.to_string(), Value::Bool(private));
    }
    Ok(Some(mirror))
}

/// Whether `candidate` is the mirror of relation `name` on schema `owner_uid`
pub fn is_mirror_of(candidate: &Attribute, owner_uid: &str, name: &str) -> bool {
    candidate.as_relation().is_some_and(|relation| {
        relation.target == owner_uid && relation.target_attribute.as_deref() == Some(name)
    })
}

// ============================================================================
// Relation Restrictions
// ============================================================================

/// Relation kinds a content type accepts, given its restriction metadata
pub fn allowed_relation_kinds(restrict_relations_to: Option<&[RelationKind]>) -> Vec<RelationKind> {
    match restrict_relations_to {
        None => RelationKind::ALL.to_vec(),
        Some(kinds) => RelationKind::ALL
            .into_iter()
            .filter(|kind| kinds.contains(kind))
            .collect(),
    }
}

/// Whether a content type may be offered as a relation target
///
/// Only collection types qualify, and only when their restriction list is
/// absent or non-empty.
pub fn is_allowed_relation_target(content_type: &ContentType) -> bool {
    content_type.kind == ContentTypeKind::CollectionType
        && content_type
            .restrict_relations_to
            .as_ref()
            .is_none_or(|kinds| !kinds.is_empty())
}

// ============================================================================
// Tests
// ============================================================================
