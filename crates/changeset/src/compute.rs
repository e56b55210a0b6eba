//! Folding a schema graph into a change-set

use crate::change::{
    AttributeChange, ChangeAction, RequestData, SchemaChange, strip_empty, strip_empty_fields,
};
use crate::tracking::TrackingCounters;
use ctb_ir::{
    Attribute, Component, ContentType, SchemaEntity, SchemaGraph, Status, StatusTracked,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Everything a save sends to the server, plus the counters shown to the
/// user before confirming
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    pub request_data: RequestData,

    #[serde(rename = "trackingCounters")]
    pub tracking: TrackingCounters,
}

impl ChangeSet {
    /// Nothing to save
    pub fn is_empty(&self) -> bool {
        self.request_data.is_empty()
    }

    /// Number of schema entries in the request
    pub fn total(&self) -> usize {
        self.request_data.components.len() + self.request_data.content_types.len()
    }
}

/// Build the request for every schema that is not `UNCHANGED`
///
/// Schemas are visited in uid order within each family.
pub fn compute_change_set(graph: &SchemaGraph) -> ChangeSet {
    let mut set = ChangeSet::default();

    for content_type in graph.content_types.values() {
        let status = content_type.status();
        if status.is_unchanged() {
            continue;
        }
        set.tracking.count_content_type(status);
        let change = schema_change(content_type, content_type_fields(content_type), &mut set.tracking);
        set.request_data.content_types.push(change);
    }

    for component in graph.components.values() {
        let status = component.status();
        if status.is_unchanged() {
            continue;
        }
        set.tracking.count_component(status);
        let change = schema_change(component, component_fields(component), &mut set.tracking);
        set.request_data.components.push(change);
    }

    debug!(
        content_types = set.request_data.content_types.len(),
        components = set.request_data.components.len(),
        "Computed change-set"
    );
    set
}

fn schema_change(
    schema: &dyn SchemaEntity,
    fields: Map<String, Value>,
    tracking: &mut TrackingCounters,
) -> SchemaChange {
    let action = match schema.status() {
        Status::Removed => {
            tracking.deleted_fields += schema.attributes().len();
            return SchemaChange::delete(schema.uid());
        }
        Status::New => ChangeAction::Create,
        _ => ChangeAction::Update,
    };

    let attributes = schema
        .attributes()
        .iter()
        .map(|attribute| {
            tracking.count_field(attribute.status());
            attribute_change(attribute)
        })
        .collect();

    SchemaChange {
        action,
        uid: schema.uid().into(),
        fields,
        attributes: Some(attributes),
    }
}

/// Serialize one attribute of a created or updated schema
///
/// `UNCHANGED` attributes are sent as updates too so the server keeps the
/// field order.
pub fn attribute_change(attribute: &Attribute) -> AttributeChange {
    match attribute.status() {
        Status::Removed => AttributeChange {
            action: ChangeAction::Delete,
            name: attribute.name.clone(),
            properties: None,
        },
        status => {
            let mut properties = attribute.properties();
            strip_empty(&mut properties);
            AttributeChange {
                action: if status == Status::New {
                    ChangeAction::Create
                } else {
                    ChangeAction::Update
                },
                name: attribute.name.clone(),
                properties: Some(properties),
            }
        }
    }
}

fn content_type_fields(content_type: &ContentType) -> Map<String, Value> {
    let info = &content_type.info;
    let mut fields = Map::new();
    fields.insert("displayName".into(), info.display_name.clone().into());
    fields.insert("singularName".into(), info.singular_name.clone().into());
    fields.insert("pluralName".into(), info.plural_name.clone().into());
    if let Some(description) = &info.description {
        fields.insert("description".into(), description.clone().into());
    }
    fields.insert("kind".into(), content_type.kind.as_str().into());
    for (key, value) in &content_type.options {
        fields.insert(key.clone(), value.clone());
    }
    if let Some(plugin_options) = &content_type.plugin_options {
        fields.insert("pluginOptions".into(), plugin_options.clone());
    }
    strip_empty_fields(&mut fields);
    fields
}

fn component_fields(component: &Component) -> Map<String, Value> {
    let info = &component.info;
    let mut fields = Map::new();
    fields.insert("category".into(), component.category.clone().into());
    fields.insert("displayName".into(), info.display_name.clone().into());
    if let Some(icon) = &info.icon {
        fields.insert("icon".into(), icon.clone().into());
    }
    if let Some(description) = &info.description {
        fields.insert("description".into(), description.clone().into());
    }
    strip_empty_fields(&mut fields);
    fields
}
