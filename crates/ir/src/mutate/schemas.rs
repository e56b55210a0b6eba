//! Schema-level mutators: create, update, rename and external changes

use crate::attribute::{Attribute, AttributeKind};
use crate::graph::SchemaGraph;
use crate::mutate::deletion::{delete_component, delete_content_type};
use crate::schema::{Component, ComponentInfo, ContentType, SchemaEntity};
use ctb_core::{
    BuilderError, BuilderResult, ContentTypeKind, ForTarget, Status, StatusTracked,
};
use heck::ToKebabCase;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Payloads
// ============================================================================

/// Descriptive fields of a content type, as edited in the schema form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeData {
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub singular_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ContentTypeKind>,

    /// Merged key by key into the schema options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_options: Option<Value>,
}

/// Descriptive fields of a component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentData {
    pub display_name: String,

    /// Defaults to the part of the uid before the first `.`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ============================================================================
// Create
// ============================================================================

/// Insert a new, temporary content type with no attributes
///
/// Missing singular and plural names are derived from the display name
/// ("Blog Post" -> `blog-post`, `blog-posts`).
pub fn create_content_type(
    graph: &mut SchemaGraph,
    uid: &str,
    data: ContentTypeData,
) -> BuilderResult<()> {
    if graph.locate(uid).is_some() {
        return Err(BuilderError::DuplicateSchema(uid.to_string()));
    }
    if data.display_name.trim().is_empty() {
        return Err(BuilderError::InvalidSchema(format!(
            "content type {uid} needs a display name"
        )));
    }

    let singular_name = data
        .singular_name
        .unwrap_or_else(|| data.display_name.to_kebab_case());
    let plural_name = data
        .plural_name
        .unwrap_or_else(|| pluralize(&singular_name));

    let mut content_type = ContentType::new(uid, data.display_name).with_status(Status::New);
    content_type.kind = data.kind.unwrap_or_default();
    content_type.info.singular_name = singular_name;
    content_type.info.plural_name = plural_name;
    content_type.info.description = data.description;
    content_type.options = data.options.unwrap_or_default();
    content_type.plugin_options = data.plugin_options;
    content_type.is_temporary = true;

    tracing::debug!(uid, "create content type");
    graph.content_types.insert(uid.to_string(), content_type);
    Ok(())
}

/// Insert a new, temporary component with no attributes
pub fn create_component(graph: &mut SchemaGraph, uid: &str, data: ComponentData) -> BuilderResult<()> {
    if graph.locate(uid).is_some() {
        return Err(BuilderError::DuplicateSchema(uid.to_string()));
    }
    let category = data
        .category
        .unwrap_or_else(|| category_of(uid).to_string());

    let mut component = Component::new(uid, category, data.display_name).with_status(Status::New);
    component.info.icon = data.icon;
    component.info.description = data.description;
    component.is_temporary = true;

    tracing::debug!(uid, "create component");
    graph.components.insert(uid.to_string(), component);
    Ok(())
}

// ============================================================================
// Update
// ============================================================================

/// Shallow-merge descriptive fields into a content type and mark it changed
pub fn update_content_type(
    graph: &mut SchemaGraph,
    uid: &str,
    data: ContentTypeData,
) -> BuilderResult<()> {
    let content_type = graph
        .content_types
        .get_mut(uid)
        .ok_or_else(|| BuilderError::schema_not_found(ForTarget::ContentType, uid))?;

    content_type.info.display_name = data.display_name;
    if let Some(singular_name) = data.singular_name {
        content_type.info.singular_name = singular_name;
    }
    if let Some(plural_name) = data.plural_name {
        content_type.info.plural_name = plural_name;
    }
    if data.description.is_some() {
        content_type.info.description = data.description;
    }
    if let Some(kind) = data.kind {
        content_type.kind = kind;
    }
    if let Some(options) = data.options {
        content_type.options.extend(options);
    }
    if data.plugin_options.is_some() {
        content_type.plugin_options = data.plugin_options;
    }
    content_type.mark_changed();
    Ok(())
}

/// Shallow-merge descriptive fields into a component and mark it changed
pub fn update_component(graph: &mut SchemaGraph, uid: &str, data: ComponentData) -> BuilderResult<()> {
    let component = graph
        .components
        .get_mut(uid)
        .ok_or_else(|| BuilderError::schema_not_found(ForTarget::Component, uid))?;

    component.info = ComponentInfo {
        display_name: data.display_name,
        icon: data.icon.or(component.info.icon.take()),
        description: data.description.or(component.info.description.take()),
    };
    if let Some(category) = data.category {
        component.category = category;
    }
    component.mark_changed();
    Ok(())
}

/// Rename a component created in this session
///
/// Every component attribute and dynamic zone pointing at the old uid is
/// rewritten. Components already known to the server keep their uid.
pub fn update_component_uid(graph: &mut SchemaGraph, uid: &str, new_uid: &str) -> BuilderResult<()> {
    let component = graph
        .components
        .get(uid)
        .ok_or_else(|| BuilderError::schema_not_found(ForTarget::Component, uid))?;
    if !component.is_new() {
        tracing::warn!(uid, new_uid, "only new components can change uid, ignoring");
        return Ok(());
    }
    if uid == new_uid {
        return Ok(());
    }
    if graph.locate(new_uid).is_some() {
        return Err(BuilderError::DuplicateSchema(new_uid.to_string()));
    }

    let Some(mut component) = graph.components.remove(uid) else {
        return Err(BuilderError::internal(format!("component {uid} vanished during rename")));
    };
    component.uid = new_uid.to_string();
    component.category = category_of(new_uid).to_string();
    graph.components.insert(new_uid.to_string(), component);

    for schema in graph.entities_mut() {
        let mut touched = false;
        for attribute in schema.attributes_mut() {
            if rename_reference(&mut attribute.kind, uid, new_uid) {
                attribute.mark_changed();
                touched = true;
            }
        }
        if touched {
            schema.mark_changed();
        }
    }
    tracing::debug!(uid, new_uid, "renamed component");
    Ok(())
}

fn rename_reference(kind: &mut AttributeKind, uid: &str, new_uid: &str) -> bool {
    match kind {
        AttributeKind::Component { component, .. } if component.as_str() == uid => {
            *component = new_uid.to_string();
            true
        }
        AttributeKind::DynamicZone { components } => {
            let mut renamed = false;
            for component in components.iter_mut().filter(|c| c.as_str() == uid) {
                *component = new_uid.to_string();
                renamed = true;
            }
            renamed
        }
        _ => false,
    }
}

// ============================================================================
// External Changes
// ============================================================================

/// What an external change does to its schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    Add,
    Update,
    Delete,
}

/// A whole schema supplied from outside the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "modelType", rename_all = "camelCase")]
pub enum ExternalSchema {
    ContentType(ContentType),
    Component(Component),
}

impl ExternalSchema {
    pub fn uid(&self) -> &str {
        match self {
            ExternalSchema::ContentType(ct) => &ct.uid,
            ExternalSchema::Component(c) => &c.uid,
        }
    }
}

/// Insert, replace or delete a schema built outside the session
///
/// - `add`: the schema and all its attributes become `NEW`
/// - `update`: the schema replaces the existing one; each attribute's
///   status is derived against the existing attribute of the same name, and
///   persisted attributes the new version drops are kept as `REMOVED`
/// - `delete`: same as deleting the schema from the builder
pub fn apply_external_change(
    graph: &mut SchemaGraph,
    action: ChangeKind,
    schema: ExternalSchema,
) -> BuilderResult<()> {
    tracing::debug!(uid = schema.uid(), ?action, "apply external change");
    match (action, schema) {
        (ChangeKind::Add, ExternalSchema::ContentType(mut ct)) => {
            ensure_absent(graph, &ct.uid)?;
            mark_all_new(&mut ct);
            graph.content_types.insert(ct.uid.clone(), ct);
        }
        (ChangeKind::Add, ExternalSchema::Component(mut c)) => {
            ensure_absent(graph, &c.uid)?;
            mark_all_new(&mut c);
            graph.components.insert(c.uid.clone(), c);
        }
        (ChangeKind::Update, ExternalSchema::ContentType(mut ct)) => {
            let existing = graph
                .content_types
                .get(&ct.uid)
                .ok_or_else(|| BuilderError::schema_not_found(ForTarget::ContentType, &ct.uid))?;
            merge_statuses(existing, &mut ct);
            graph.content_types.insert(ct.uid.clone(), ct);
        }
        (ChangeKind::Update, ExternalSchema::Component(mut c)) => {
            let existing = graph
                .components
                .get(&c.uid)
                .ok_or_else(|| BuilderError::schema_not_found(ForTarget::Component, &c.uid))?;
            merge_statuses(existing, &mut c);
            graph.components.insert(c.uid.clone(), c);
        }
        (ChangeKind::Delete, ExternalSchema::ContentType(ct)) => delete_content_type(graph, &ct.uid)?,
        (ChangeKind::Delete, ExternalSchema::Component(c)) => delete_component(graph, &c.uid)?,
    }
    Ok(())
}

fn ensure_absent(graph: &SchemaGraph, uid: &str) -> BuilderResult<()> {
    match graph.locate(uid) {
        Some(_) => Err(BuilderError::DuplicateSchema(uid.to_string())),
        None => Ok(()),
    }
}

fn mark_all_new(schema: &mut dyn SchemaEntity) {
    schema.force_status(Status::New);
    for attribute in schema.attributes_mut() {
        attribute.force_status(Status::New);
    }
}

/// Give `incoming` the statuses it has relative to `existing`
fn merge_statuses(existing: &dyn SchemaEntity, incoming: &mut dyn SchemaEntity) {
    for attribute in incoming.attributes_mut() {
        let status = match existing.attribute(&attribute.name) {
            None => Status::New,
            Some(previous) if previous.same_definition(attribute) => previous.status,
            Some(previous) => previous.status.transition(Status::Changed),
        };
        attribute.force_status(status);
    }

    let dropped: Vec<Attribute> = existing
        .attributes()
        .iter()
        .filter(|a| !a.is_new() && !incoming.has_attribute(&a.name))
        .map(|a| a.clone().with_status(Status::Removed))
        .collect();
    incoming.attributes_mut().extend(dropped);
    incoming.force_status(existing.status().transition(Status::Changed));
}

// ============================================================================
// Naming
// ============================================================================

/// Category part of a component uid (`default.address` -> `default`)
fn category_of(uid: &str) -> &str {
    uid.split_once('.').map_or(uid, |(category, _)| category)
}

/// Naive English plural of a kebab-case name; only the last word changes
pub fn pluralize(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let (head, last) = match name.rfind('-') {
        Some(split) => name.split_at(split + 1),
        None => ("", name),
    };
    let plural = match last {
        "person" => "people".to_string(),
        "child" => "children".to_string(),
        _ if last.ends_with('s')
            || last.ends_with('x')
            || last.ends_with('z')
            || last.ends_with("ch")
            || last.ends_with("sh") =>
        {
            format!("{last}es")
        }
        _ if last.ends_with('y')
            && !last.ends_with("ay")
            && !last.ends_with("ey")
            && !last.ends_with("oy")
            && !last.ends_with("uy") =>
        {
            format!("{}ies", &last[..last.len() - 1])
        }
        _ => format!("{last}s"),
    };
    format!("{head}{plural}")
}

// ============================================================================
// Tests
// ============================================================================
