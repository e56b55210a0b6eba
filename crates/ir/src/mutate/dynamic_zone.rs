//! Dynamic zone component list edits

use crate::attribute::{Attribute, AttributeKind};
use crate::graph::SchemaGraph;
use ctb_core::{BuilderError, BuilderResult, ForTarget, SchemaUid, StatusTracked};

/// Append a freshly created component to a dynamic zone
///
/// A component already listed is not added twice.
pub fn add_created_component_to_dynamic_zone(
    graph: &mut SchemaGraph,
    target: ForTarget,
    uid: &str,
    dynamic_zone: &str,
    component_uid: &str,
) -> BuilderResult<()> {
    change_dynamic_zone_components(graph, target, uid, dynamic_zone, &[component_uid.to_string()])
}

/// Merge `components` into a dynamic zone's list
///
/// Existing entries keep their positions; new ones are appended in the
/// order given, skipping duplicates.
pub fn change_dynamic_zone_components(
    graph: &mut SchemaGraph,
    target: ForTarget,
    uid: &str,
    dynamic_zone: &str,
    components: &[SchemaUid],
) -> BuilderResult<()> {
    let added = with_dynamic_zone(graph, target, uid, dynamic_zone, |list| {
        Ok(merge_components(list, components))
    })?;
    tracing::debug!(uid, dynamic_zone, added, "dynamic zone components changed");
    Ok(())
}

/// Append the components `list` lacks, in order; returns how many were added
fn merge_components(list: &mut Vec<SchemaUid>, components: &[SchemaUid]) -> usize {
    let before = list.len();
    for component in components {
        if !list.contains(component) {
            list.push(component.clone());
        }
    }
    list.len() - before
}

/// Drop the component at `index` from a dynamic zone's list
pub fn remove_component_from_dynamic_zone(
    graph: &mut SchemaGraph,
    target: ForTarget,
    uid: &str,
    dynamic_zone: &str,
    index: usize,
) -> BuilderResult<()> {
    with_dynamic_zone(graph, target, uid, dynamic_zone, |list| {
        if index >= list.len() {
            return Err(BuilderError::index_out_of_range(dynamic_zone, index, list.len()));
        }
        list.remove(index);
        Ok(())
    })
}

/// Run `edit` on the component list of the dynamic zone `name`, then mark
/// the attribute and its schema changed
fn with_dynamic_zone<F, T>(
    graph: &mut SchemaGraph,
    target: ForTarget,
    uid: &str,
    name: &str,
    edit: F,
) -> BuilderResult<T>
where
    F: FnOnce(&mut Vec<SchemaUid>) -> BuilderResult<T>,
{
    let schema = graph.schema_mut(target, uid)?;
    let index = schema.require_attribute_index(name)?;
    let attribute: &mut Attribute = &mut schema.attributes_mut()[index];
    let AttributeKind::DynamicZone { components } = &mut attribute.kind else {
        return Err(BuilderError::WrongAttributeKind {
            uid: uid.to_string(),
            attribute: name.to_string(),
            expected: "dynamic zone",
        });
    };
    let output = edit(components)?;
    attribute.mark_changed();
    schema.mark_changed();
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ContentType, SchemaEntity};
    use ctb_core::{ScalarType, Status};
    use pretty_assertions::assert_eq;

    const PAGE: &str = "api::page.page";

    fn graph() -> SchemaGraph {
        SchemaGraph::new().with_content_type(
            ContentType::new(PAGE, "Page")
                .with_attribute(Attribute::scalar("title", ScalarType::String))
                .with_attribute(Attribute::dynamic_zone("blocks", ["default.a", "default.b"])),
        )
    }

    fn blocks(graph: &SchemaGraph) -> Vec<SchemaUid> {
        graph.content_types[PAGE]
            .attribute("blocks")
            .and_then(Attribute::dynamic_zone_components)
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_change_components_is_ordered_union() {
        let mut graph = graph();
        change_dynamic_zone_components(
            &mut graph,
            ForTarget::ContentType,
            PAGE,
            "blocks",
            &["default.b".to_string(), "default.c".to_string()],
        )
        .unwrap();

        assert_eq!(blocks(&graph), vec!["default.a", "default.b", "default.c"]);
        let page = &graph.content_types[PAGE];
        assert_eq!(page.status, Status::Changed);
        assert_eq!(page.attributes[1].status, Status::Changed);
        assert_eq!(page.attributes[0].status, Status::Unchanged);
    }

    #[test]
    fn test_merge_counts_only_appended_components() {
        let mut list = vec!["default.a".to_string(), "default.b".to_string()];
        let requested = ["default.b", "default.c", "default.c", "default.a"].map(String::from);

        assert_eq!(merge_components(&mut list, &requested), 1);
        assert_eq!(list, vec!["default.a", "default.b", "default.c"]);
        assert_eq!(merge_components(&mut list, &requested), 0);
    }

    #[test]
    fn test_add_created_component_skips_duplicates() {
        let mut graph = graph();
        add_created_component_to_dynamic_zone(&mut graph, ForTarget::ContentType, PAGE, "blocks", "default.a")
            .unwrap();
        add_created_component_to_dynamic_zone(&mut graph, ForTarget::ContentType, PAGE, "blocks", "default.new")
            .unwrap();
        assert_eq!(blocks(&graph), vec!["default.a", "default.b", "default.new"]);
    }

    #[test]
    fn test_remove_component_by_index() {
        let mut graph = graph();
        remove_component_from_dynamic_zone(&mut graph, ForTarget::ContentType, PAGE, "blocks", 0).unwrap();
        assert_eq!(blocks(&graph), vec!["default.b"]);

        let err = remove_component_from_dynamic_zone(&mut graph, ForTarget::ContentType, PAGE, "blocks", 3)
            .unwrap_err();
        assert!(matches!(err, BuilderError::IndexOutOfRange { index: 3, len: 1, .. }));
    }

    #[test]
    fn test_non_dynamic_zone_rejected() {
        let mut graph = graph();
        let err = remove_component_from_dynamic_zone(&mut graph, ForTarget::ContentType, PAGE, "title", 0)
            .unwrap_err();
        assert!(matches!(err, BuilderError::WrongAttributeKind { .. }));
        assert_eq!(graph.content_types[PAGE].status, Status::Unchanged);
    }
}
