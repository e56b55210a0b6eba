//! Read-only projections of the schema graph
//!
//! Nothing here touches statuses. Schemas and attributes flagged `REMOVED`
//! are left out of every view.

use crate::graph::SchemaGraph;
use crate::schema::{Component, ContentType};
use ctb_core::{ContentTypeKind, RelationKind, SchemaUid, Status, StatusTracked};
use heck::ToLowerCamelCase;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Path prefix of content type pages in the admin panel
pub const CONTENT_TYPE_ROUTE: &str = "/plugins/content-type-builder/content-types";

/// Path prefix of component pages in the admin panel
pub const COMPONENT_ROUTE: &str = "/plugins/content-type-builder/component-categories";

// ============================================================================
// Component nesting
// ============================================================================

/// A component and the components it embeds directly
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedComponents {
    pub component: SchemaUid,
    pub child_components: BTreeSet<SchemaUid>,
}

/// A component and every component embedding it directly
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedComponent {
    pub component: SchemaUid,
    pub uids_of_all_parents: BTreeSet<SchemaUid>,
}

/// Components with at least one `component` attribute
pub fn components_with_nested_components(graph: &SchemaGraph) -> Vec<NestedComponents> {
    live_components(graph)
        .filter_map(|component| {
            let child_components: BTreeSet<SchemaUid> = component
                .attributes
                .iter()
                .filter(|a| !a.is_removed())
                .filter_map(|a| a.component_uid())
                .map(str::to_string)
                .collect();
            (!child_components.is_empty()).then(|| NestedComponents {
                component: component.uid.clone(),
                child_components,
            })
        })
        .collect()
}

/// Components embedded in other components, each with its set of parents
pub fn transitively_nested_components(graph: &SchemaGraph) -> Vec<NestedComponent> {
    let mut parents: BTreeMap<SchemaUid, BTreeSet<SchemaUid>> = BTreeMap::new();
    for component in live_components(graph) {
        for child in component
            .attributes
            .iter()
            .filter(|a| !a.is_removed())
            .filter_map(|a| a.component_uid())
        {
            parents
                .entry(child.to_string())
                .or_default()
                .insert(component.uid.clone());
        }
    }
    parents
        .into_iter()
        .map(|(component, uids_of_all_parents)| NestedComponent {
            component,
            uids_of_all_parents,
        })
        .collect()
}

fn live_components(graph: &SchemaGraph) -> impl Iterator<Item = &Component> {
    graph.components.values().filter(|c| !c.is_removed())
}

// ============================================================================
// Navigation
// ============================================================================

/// One row of the content type navigation list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavRow {
    pub uid: SchemaUid,
    pub name: SchemaUid,
    pub title: String,
    pub kind: ContentTypeKind,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    pub to: String,
    pub status: Status,
    pub restrict_relations_to: Option<Vec<RelationKind>>,
}

impl NavRow {
    fn from_content_type(content_type: &ContentType) -> Self {
        Self {
            uid: content_type.uid.clone(),
            name: content_type.uid.clone(),
            title: content_type.info.display_name.clone(),
            kind: content_type.kind,
            visible: content_type.visible,
            plugin: content_type.plugin.clone(),
            to: format!("{CONTENT_TYPE_ROUTE}/{}", content_type.uid),
            status: content_type.status,
            restrict_relations_to: content_type.restrict_relations_to.clone(),
        }
    }
}

/// Components of one category, for the component navigation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNavGroup {
    pub category: String,
    pub links: Vec<ComponentNavLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNavLink {
    pub uid: SchemaUid,
    pub title: String,
    pub to: String,
    pub status: Status,
}

/// Comparison key for display names: camelCased, then lowercased, so
/// "Blog post", "blog-post" and "BlogPost" sort together
pub fn sort_key(display_name: &str) -> String {
    display_name.to_lower_camel_case().to_lowercase()
}

/// Content types as navigation rows, sorted by display name
pub fn sorted_content_type_nav_list(graph: &SchemaGraph) -> Vec<NavRow> {
    let mut rows: Vec<(String, NavRow)> = graph
        .content_types
        .values()
        .filter(|ct| !ct.is_removed())
        .map(|ct| (sort_key(&ct.info.display_name), NavRow::from_content_type(ct)))
        .collect();
    rows.sort_by(|(a_key, a), (b_key, b)| a_key.cmp(b_key).then_with(|| a.uid.cmp(&b.uid)));
    rows.into_iter().map(|(_, row)| row).collect()
}

/// Components grouped by category; categories and links sorted by name
pub fn sorted_component_nav_groups(graph: &SchemaGraph) -> Vec<ComponentNavGroup> {
    let mut groups: BTreeMap<String, Vec<(String, ComponentNavLink)>> = BTreeMap::new();
    for component in live_components(graph) {
        let link = ComponentNavLink {
            uid: component.uid.clone(),
            title: component.info.display_name.clone(),
            to: format!("{COMPONENT_ROUTE}/{}/{}", component.category, component.uid),
            status: component.status,
        };
        groups
            .entry(component.category.clone())
            .or_default()
            .push((sort_key(&component.info.display_name), link));
    }

    let mut groups: Vec<(String, ComponentNavGroup)> = groups
        .into_iter()
        .map(|(category, mut links)| {
            links.sort_by(|(a_key, a), (b_key, b)| a_key.cmp(b_key).then_with(|| a.uid.cmp(&b.uid)));
            (
                sort_key(&category),
                ComponentNavGroup {
                    category,
                    links: links.into_iter().map(|(_, link)| link).collect(),
                },
            )
        })
        .collect();
    groups.sort_by(|(a_key, a), (b_key, b)| {
        a_key.cmp(b_key).then_with(|| a.category.cmp(&b.category))
    });
    groups.into_iter().map(|(_, group)| group).collect()
}

// ============================================================================
// Tests
// ============================================================================
