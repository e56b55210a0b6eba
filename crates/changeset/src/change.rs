//! Payload types of the update-schema request

use ctb_ir::SchemaUid;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What the server should do with a schema or attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

/// One schema entry of the request
///
/// A deleted schema carries only `action` and `uid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaChange {
    pub action: ChangeAction,

    pub uid: SchemaUid,

    /// Descriptive fields flattened from the schema info and options
    #[serde(flatten)]
    pub fields: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AttributeChange>>,
}

impl SchemaChange {
    /// Entry for a deleted schema
    pub fn delete(uid: impl Into<SchemaUid>) -> Self {
        Self {
            action: ChangeAction::Delete,
            uid: uid.into(),
            fields: Map::new(),
            attributes: None,
        }
    }
}

/// One attribute entry of a schema change
///
/// A deleted attribute carries only `action` and `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeChange {
    pub action: ChangeAction,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

/// Schema entries split by family
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestData {
    pub components: Vec<SchemaChange>,
    pub content_types: Vec<SchemaChange>,
}

impl RequestData {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.content_types.is_empty()
    }
}

/// Drop keys whose value carries nothing: `null`, `[]` and `{}`
pub fn strip_empty(properties: &mut Map<String, Value>) {
    properties.retain(|_, value| match value {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    });
}

/// [`strip_empty`] for descriptive schema fields, which also drops `""`
pub fn strip_empty_fields(fields: &mut Map<String, Value>) {
    strip_empty(fields);
    fields.retain(|_, value| value.as_str() != Some(""));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_empty() {
        let Value::Object(mut map) = json!({
            "required": false,
            "default": null,
            "enum": [],
            "pluginOptions": {},
            "conditions": { "visible": { "==": [{ "var": "kind" }, "a"] } },
            "minLength": 0
        }) else {
            unreachable!()
        };
        strip_empty(&mut map);
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["required", "conditions", "minLength"]);
    }

    #[test]
    fn test_strip_empty_fields_drops_blank_strings() {
        let Value::Object(mut map) = json!({
            "displayName": "Seo",
            "category": "",
            "icon": null,
            "draftAndPublish": false
        }) else {
            unreachable!()
        };
        strip_empty_fields(&mut map);
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["displayName", "draftAndPublish"]);
    }

    #[test]
    fn test_delete_entry_shape() {
        assert_eq!(
            serde_json::to_value(SchemaChange::delete("api::tag.tag")).unwrap(),
            json!({ "action": "delete", "uid": "api::tag.tag" })
        );
    }
}
