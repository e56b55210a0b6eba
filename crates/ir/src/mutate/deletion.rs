//! Schema deletion with a full-graph reference sweep

use crate::attribute::AttributeKind;
use crate::graph::SchemaGraph;
use crate::schema::SchemaEntity;
use ctb_core::{BuilderError, BuilderResult, ForTarget, Status, StatusTracked};

/// Delete a component
///
/// A `NEW` component is dropped from the graph, any other is kept with
/// status `REMOVED`. Every other schema then loses its references: dynamic
/// zones filter the uid out and component attributes pointing at it are
/// removed.
pub fn delete_component(graph: &mut SchemaGraph, uid: &str) -> BuilderResult<()> {
    drop_or_flag(graph, ForTarget::Component, uid)?;
    let swept = sweep(graph, uid, false);
    tracing::debug!(uid, swept, "deleted component");
    Ok(())
}

/// Delete a content type
///
/// Same rule as [`delete_component`], and relation attributes targeting
/// the content type are removed as well.
pub fn delete_content_type(graph: &mut SchemaGraph, uid: &str) -> BuilderResult<()> {
    drop_or_flag(graph, ForTarget::ContentType, uid)?;
    let swept = sweep(graph, uid, true);
    tracing::debug!(uid, swept, "deleted content type");
    Ok(())
}

fn drop_or_flag(graph: &mut SchemaGraph, target: ForTarget, uid: &str) -> BuilderResult<()> {
    let schema = graph.schema_mut(target, uid)?;
    if !schema.is_new() {
        schema.set_status(Status::Removed);
        return Ok(());
    }
    let dropped = match target {
        ForTarget::ContentType => graph.content_types.remove(uid).is_some(),
        ForTarget::Component => graph.components.remove(uid).is_some(),
    };
    if dropped {
        Ok(())
    } else {
        Err(BuilderError::schema_not_found(target, uid))
    }
}

/// Remove every reference to `deleted` from the rest of the graph and
/// return how many schemas were touched
fn sweep(graph: &mut SchemaGraph, deleted: &str, relations: bool) -> usize {
    let mut touched = 0;
    for schema in graph.entities_mut() {
        if schema.uid() == deleted {
            continue;
        }
        if sweep_schema(schema, deleted, relations) {
            schema.mark_changed();
            touched += 1;
        }
    }
    touched
}

fn sweep_schema(schema: &mut dyn SchemaEntity, deleted: &str, relations: bool) -> bool {
    let mut changed = false;
    let mut index = 0;
    while index < schema.attributes().len() {
        let attribute = &mut schema.attributes_mut()[index];
        if attribute.is_removed() {
            index += 1;
            continue;
        }

        let (drop_attribute, zone_changed) = match &mut attribute.kind {
            AttributeKind::DynamicZone { components } => {
                let before = components.len();
                components.retain(|c| c.as_str() != deleted);
                (false, components.len() != before)
            }
            AttributeKind::Component { component, .. } => (component.as_str() == deleted, false),
            AttributeKind::Relation(relation) => (relations && relation.target == deleted, false),
            _ => (false, false),
        };
        if zone_changed {
            attribute.mark_changed();
            changed = true;
        }

        if drop_attribute {
            changed = true;
            if schema.remove_attribute_at(index) {
                continue;
            }
        }
        index += 1;
    }
    changed
}
