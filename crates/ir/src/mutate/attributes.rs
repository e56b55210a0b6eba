//! Attribute mutators: add, edit, remove, reorder
//!
//! Relation attributes keep their mirror on the target schema in step:
//! adding a two-sided relation appends the mirror, editing reconciles it
//! (see [`edit_attribute`]) and removing drops it with the same rule as
//! the relation itself.

use crate::attribute::{Attribute, AttributeKind, PLUGIN_OPTIONS_KEY, PRIVATE_KEY};
use crate::graph::SchemaGraph;
use crate::relation::{is_mirror_of, mirror_for};
use crate::schema::SchemaEntity;
use ctb_core::{BuilderError, BuilderResult, ForTarget, SchemaUid, Status, StatusTracked};

// ============================================================================
// Add
// ============================================================================

/// Append `attribute` to the schema `(target, uid)` with status `NEW`
///
/// A two-sided relation also appends its mirror to the relation target,
/// which may be the same schema.
pub fn add_attribute(
    graph: &mut SchemaGraph,
    target: ForTarget,
    uid: &str,
    attribute: Attribute,
) -> BuilderResult<()> {
    let mut attribute = attribute;
    attribute.force_status(Status::New);
    let mirror = mirror_for(uid, &attribute)?;

    ensure_name_free(graph.schema(target, uid)?, &attribute.name, None)?;
    let mirror_target = match (&mirror, attribute.as_relation()) {
        (Some(mirror), Some(relation)) => {
            let target_schema = graph.relation_target(&relation.target)?;
            ensure_name_free(target_schema, &mirror.name, None)?;
            if relation.target == uid && mirror.name == attribute.name {
                return Err(BuilderError::duplicate_attribute(uid, &mirror.name));
            }
            Some(relation.target.clone())
        }
        _ => None,
    };

    tracing::debug!(uid, attribute = %attribute.name, kind = attribute.type_name(), "add attribute");
    graph.schema_mut(target, uid)?.push_attribute(attribute);

    if let (Some(mirror), Some(mirror_target)) = (mirror, mirror_target) {
        tracing::debug!(target = %mirror_target, mirror = %mirror.name, "add mirror attribute");
        graph
            .relation_target_mut(&mirror_target)?
            .push_attribute(mirror);
    }
    Ok(())
}

/// Append a custom field attribute with status `NEW`; never mirrored
pub fn add_custom_field_attribute(
    graph: &mut SchemaGraph,
    target: ForTarget,
    uid: &str,
    attribute: Attribute,
) -> BuilderResult<()> {
    let mut attribute = attribute;
    attribute.force_status(Status::New);
    let schema = graph.schema_mut(target, uid)?;
    ensure_name_free(schema, &attribute.name, None)?;
    schema.push_attribute(attribute);
    Ok(())
}

// ============================================================================
// Edit
// ============================================================================

/// Replace the attribute named `initial_name` in place
///
/// The edited attribute keeps its index and becomes `CHANGED` (a `NEW`
/// attribute stays `NEW`). Relation mirrors are reconciled from the mirror
/// the previous attribute had and the mirror the new one requires:
///
/// | previous mirror | required mirror | effect |
/// |---|---|---|
/// | none | none | nothing |
/// | present | none | previous mirror is spliced out |
/// | none | required | mirror created `NEW`, right after the edited attribute on a self relation, appended otherwise |
/// | present | required, same target | mirror rewritten in place |
/// | present | required, other target | previous mirror spliced out, new mirror created |
///
/// `private` and `pluginOptions` of a rewritten or created mirror come from
/// the previous mirror, else from the opposite attribute in `initial`, else
/// from the edited attribute.
pub fn edit_attribute(
    graph: &mut SchemaGraph,
    initial: &SchemaGraph,
    target: ForTarget,
    uid: &str,
    initial_name: &str,
    attribute: Attribute,
) -> BuilderResult<()> {
    let (index, previous) = {
        let schema = graph.schema(target, uid)?;
        let index = schema.require_attribute_index(initial_name)?;
        ensure_name_free(schema, &attribute.name, Some(index))?;
        (index, schema.attributes()[index].clone())
    };

    let previous_mirror = locate_mirror(graph, uid, index, &previous);
    let mut required_mirror = mirror_for(uid, &attribute)?;
    if let Some(mirror) = required_mirror.as_mut() {
        let source = match &previous_mirror {
            Some(location) => mirror_at(graph, location).cloned(),
            None => initial_opposite(initial, &previous),
        };
        carry_mirror_metadata(mirror, source.as_ref(), &attribute);
    }

    let mut edited = attribute;
    edited.force_status(previous.status.transition(Status::Changed));
    let new_mirror_target = edited.as_relation().map(|r| r.target.clone());
    {
        let schema = graph.schema_mut(target, uid)?;
        schema.attributes_mut()[index] = edited;
        schema.mark_changed();
    }

    match (previous_mirror, required_mirror) {
        (None, None) => Ok(()),
        (Some(location), None) => {
            tracing::debug!(uid, mirror = %location.uid, "relation became one-sided, dropping mirror");
            hard_remove(graph, &location)?;
            Ok(())
        }
        (None, Some(mirror)) => {
            let mirror_target = new_mirror_target.unwrap_or_default();
            insert_mirror(graph, uid, index, &mirror_target, mirror)
        }
        (Some(location), Some(mirror)) => {
            let mirror_target = new_mirror_target.unwrap_or_default();
            if location.uid == mirror_target {
                rewrite_mirror(graph, &location, mirror)
            } else {
                // a self-relation mirror moving elsewhere never re-enters the owner
                hard_remove(graph, &location)?;
                insert_mirror(graph, uid, index, &mirror_target, mirror)
            }
        }
    }
}

/// Replace a custom field attribute in place; never mirrored
pub fn edit_custom_field_attribute(
    graph: &mut SchemaGraph,
    target: ForTarget,
    uid: &str,
    initial_name: &str,
    attribute: Attribute,
) -> BuilderResult<()> {
    let schema = graph.schema_mut(target, uid)?;
    let index = schema.require_attribute_index(initial_name)?;
    ensure_name_free(schema, &attribute.name, Some(index))?;

    let mut edited = attribute;
    let previous_status = schema.attributes()[index].status;
    edited.force_status(previous_status.transition(Status::Changed));
    schema.attributes_mut()[index] = edited;
    schema.mark_changed();
    Ok(())
}

// ============================================================================
// Remove
// ============================================================================

/// Remove the attribute `name` from the schema `(target, uid)`
///
/// `NEW` attributes are spliced out, others are kept with status
/// `REMOVED`. The mirror of a two-sided relation follows the same rule.
/// Uid attributes of the same schema slugged from the removed field lose
/// their `targetField`.
pub fn remove_field(
    graph: &mut SchemaGraph,
    target: ForTarget,
    uid: &str,
    name: &str,
) -> BuilderResult<()> {
    let (index, removed) = {
        let schema = graph.schema(target, uid)?;
        let index = schema.require_attribute_index(name)?;
        (index, schema.attributes()[index].clone())
    };

    if let Some(location) = locate_mirror(graph, uid, index, &removed) {
        graph
            .schema_mut(location.target, &location.uid)?
            .remove_attribute_at(location.index);
    }

    let schema = graph.schema_mut(target, uid)?;
    let index = schema.require_attribute_index(name)?;
    schema.remove_attribute_at(index);

    for attribute in schema.attributes_mut() {
        if let AttributeKind::Uid { target_field } = &mut attribute.kind {
            if target_field.as_deref() == Some(name) {
                *target_field = None;
                attribute.mark_changed();
            }
        }
    }
    tracing::debug!(uid, attribute = name, "removed attribute");
    Ok(())
}

/// Move the attribute at `from` to index `to`
pub fn move_attribute(
    graph: &mut SchemaGraph,
    target: ForTarget,
    uid: &str,
    from: usize,
    to: usize,
) -> BuilderResult<()> {
    let schema = graph.schema_mut(target, uid)?;
    let len = schema.attributes().len();
    for index in [from, to] {
        if index >= len {
            return Err(BuilderError::index_out_of_range(uid, index, len));
        }
    }
    let attributes = schema.attributes_mut();
    let attribute = attributes.remove(from);
    attributes.insert(to, attribute);
    schema.mark_changed();
    Ok(())
}

// ============================================================================
// Mirror helpers
// ============================================================================

/// Position of a mirror attribute in the graph
#[derive(Debug, Clone, PartialEq, Eq)]
struct MirrorLocation {
    target: ForTarget,
    uid: SchemaUid,
    index: usize,
}

/// Find the mirror of the attribute at `owner_index` on `owner_uid`
///
/// Missing targets and missing mirrors are tolerated (`None`).
fn locate_mirror(
    graph: &SchemaGraph,
    owner_uid: &str,
    owner_index: usize,
    attribute: &Attribute,
) -> Option<MirrorLocation> {
    let relation = attribute.as_relation()?;
    if !relation.is_two_sided() {
        return None;
    }
    let mirror_name = relation.target_attribute.as_deref()?;
    let Ok(schema) = graph.relation_target(&relation.target) else {
        tracing::warn!(target = %relation.target, "relation target missing, no mirror to update");
        return None;
    };
    let self_relation = schema.uid() == owner_uid;
    let index = schema.attributes().iter().enumerate().position(|(i, a)| {
        !(self_relation && i == owner_index)
            && a.name == mirror_name
            && is_mirror_of(a, owner_uid, &attribute.name)
    });
    if index.is_none() {
        tracing::warn!(target = %relation.target, mirror = mirror_name, "mirror attribute missing");
    }
    Some(MirrorLocation {
        target: schema.for_target(),
        uid: schema.uid().to_string(),
        index: index?,
    })
}

fn mirror_at<'a>(graph: &'a SchemaGraph, location: &MirrorLocation) -> Option<&'a Attribute> {
    graph
        .schema(location.target, &location.uid)
        .ok()?
        .attributes()
        .get(location.index)
}

/// The opposite side of `attribute` as it was at the last server sync
fn initial_opposite(initial: &SchemaGraph, attribute: &Attribute) -> Option<Attribute> {
    let relation = attribute.as_relation()?;
    let name = relation.target_attribute.as_deref()?;
    initial
        .relation_target(&relation.target)
        .ok()?
        .attribute(name)
        .cloned()
}

fn carry_mirror_metadata(mirror: &mut Attribute, source: Option<&Attribute>, edited: &Attribute) {
    if let Some(private) = source.and_then(|s| s.options.get(PRIVATE_KEY)) {
        mirror
            .options
            .insert(PRIVATE_KEY.to_string(), private.clone());
    }
    let plugin_options = source
        .and_then(Attribute::plugin_options)
        .or_else(|| edited.plugin_options());
    if let Some(plugin_options) = plugin_options {
        mirror
            .options
            .insert(PLUGIN_OPTIONS_KEY.to_string(), plugin_options.clone());
    }
}

fn hard_remove(graph: &mut SchemaGraph, location: &MirrorLocation) -> BuilderResult<()> {
    graph
        .schema_mut(location.target, &location.uid)?
        .hard_remove_attribute_at(location.index);
    Ok(())
}

/// Add a new mirror: right after the edited attribute on a self relation,
/// at the end of the target's list otherwise
fn insert_mirror(
    graph: &mut SchemaGraph,
    owner_uid: &str,
    owner_index: usize,
    mirror_target: &str,
    mirror: Attribute,
) -> BuilderResult<()> {
    let schema = graph.relation_target_mut(mirror_target)?;
    ensure_name_free(schema, &mirror.name, None)?;
    tracing::debug!(target = mirror_target, mirror = %mirror.name, "create mirror attribute");
    if schema.uid() == owner_uid {
        schema.insert_attribute(owner_index + 1, mirror);
    } else {
        schema.push_attribute(mirror);
    }
    Ok(())
}

/// Overwrite the mirror at `location`, keeping its index
fn rewrite_mirror(
    graph: &mut SchemaGraph,
    location: &MirrorLocation,
    mirror: Attribute,
) -> BuilderResult<()> {
    let schema = graph.schema_mut(location.target, &location.uid)?;
    ensure_name_free(schema, &mirror.name, Some(location.index))?;
    let mut mirror = mirror;
    let previous_status = schema.attributes()[location.index].status;
    mirror.force_status(previous_status.transition(Status::Changed));

    tracing::debug!(target = %location.uid, mirror = %mirror.name, "rewrite mirror attribute");
    schema.attributes_mut()[location.index] = mirror;
    schema.mark_changed();
    Ok(())
}

/// Fail with `DuplicateAttribute` when `name` is used by any attribute
/// other than the one at `exclude`
fn ensure_name_free(
    schema: &dyn SchemaEntity,
    name: &str,
    exclude: Option<usize>,
) -> BuilderResult<()> {
    let taken = schema
        .attributes()
        .iter()
        .enumerate()
        .any(|(i, a)| Some(i) != exclude && a.name == name);
    if taken {
        Err(BuilderError::duplicate_attribute(schema.uid(), name))
    } else {
        Ok(())
    }
}
