//! Schema definitions: content types and components
//!
//! Both schema families own an ordered attribute list and a lifecycle
//! status. [`SchemaEntity`] abstracts over the two so the graph mutators
//! are written once.

use crate::attribute::Attribute;
use ctb_core::{
    BuilderError, BuilderResult, ContentTypeKind, ForTarget, RelationKind, SchemaUid, Status,
    StatusTracked,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// SchemaEntity
// ============================================================================

/// Behavior shared by content types and components
pub trait SchemaEntity: StatusTracked {
    /// Unique id of the schema
    fn uid(&self) -> &str;

    /// Which session map the schema lives in
    fn for_target(&self) -> ForTarget;

    /// Human-readable name
    fn display_name(&self) -> &str;

    /// Ordered attribute list
    fn attributes(&self) -> &[Attribute];

    /// Mutable ordered attribute list
    fn attributes_mut(&mut self) -> &mut Vec<Attribute>;

    fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes().iter().position(|a| a.name == name)
    }

    fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes().iter().find(|a| a.name == name)
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute_index(name).is_some()
    }

    /// Index of an attribute, or `AttributeNotFound`
    fn require_attribute_index(&self, name: &str) -> BuilderResult<usize> {
        self.attribute_index(name)
            .ok_or_else(|| BuilderError::attribute_not_found(self.uid(), name))
    }

    /// Append an attribute and mark the schema changed
    fn push_attribute(&mut self, attribute: Attribute) {
        self.attributes_mut().push(attribute);
        self.mark_changed();
    }

    /// Insert an attribute at `index` (clamped to the list length) and mark
    /// the schema changed
    fn insert_attribute(&mut self, index: usize, attribute: Attribute) {
        let attributes = self.attributes_mut();
        let index = index.min(attributes.len());
        attributes.insert(index, attribute);
        self.mark_changed();
    }

    /// Remove the attribute at `index`: a `NEW` attribute is spliced out,
    /// any other is kept in place with status `REMOVED`
    ///
    /// Returns `true` when the list got shorter.
    fn remove_attribute_at(&mut self, index: usize) -> bool {
        let attributes = self.attributes_mut();
        if index >= attributes.len() {
            return false;
        }
        let spliced = if attributes[index].is_new() {
            attributes.remove(index);
            true
        } else {
            attributes[index].set_status(Status::Removed);
            false
        };
        self.mark_changed();
        spliced
    }

    /// Splice out the attribute at `index` regardless of its status
    fn hard_remove_attribute_at(&mut self, index: usize) -> Option<Attribute> {
        let attributes = self.attributes_mut();
        if index >= attributes.len() {
            return None;
        }
        let removed = attributes.remove(index);
        self.mark_changed();
        Some(removed)
    }
}

// ============================================================================
// Content Type
// ============================================================================

/// A top-level persisted schema (collection or single type)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentType {
    pub uid: SchemaUid,

    #[serde(default, skip_serializing_if = "Status::is_unchanged")]
    pub status: Status,

    #[serde(default)]
    pub kind: ContentTypeKind,

    pub info: ContentTypeInfo,

    /// Schema options such as `draftAndPublish`
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_options: Option<Value>,

    #[serde(default)]
    pub attributes: Vec<Attribute>,

    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Relation kinds other schemas may use to point here (`None` = all)
    #[serde(default)]
    pub restrict_relations_to: Option<Vec<RelationKind>>,

    /// Owning plugin, for plugin-provided content types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,

    /// Created in this session and not yet saved
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_temporary: bool,
}

/// Descriptive fields of a content type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeInfo {
    pub display_name: String,

    #[serde(default)]
    pub singular_name: String,

    #[serde(default)]
    pub plural_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_visible() -> bool {
    true
}

impl ContentType {
    /// Create an unchanged collection type with no attributes
    pub fn new(uid: impl Into<SchemaUid>, display_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            status: Status::Unchanged,
            kind: ContentTypeKind::CollectionType,
            info: ContentTypeInfo {
                display_name: display_name.into(),
                ..Default::default()
            },
            options: Map::new(),
            plugin_options: None,
            attributes: Vec::new(),
            visible: true,
            restrict_relations_to: None,
            plugin: None,
            is_temporary: false,
        }
    }

    /// Set the kind
    pub fn with_kind(mut self, kind: ContentTypeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Append an attribute
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Restrict the relation kinds pointing at this content type
    pub fn restrict_relations_to(mut self, kinds: Vec<RelationKind>) -> Self {
        self.restrict_relations_to = Some(kinds);
        self
    }
}

impl StatusTracked for ContentType {
    fn status(&self) -> Status {
        self.status
    }

    fn force_status(&mut self, status: Status) {
        self.status = status;
    }
}

impl SchemaEntity for ContentType {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn for_target(&self) -> ForTarget {
        ForTarget::ContentType
    }

    fn display_name(&self) -> &str {
        &self.info.display_name
    }

    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut Vec<Attribute> {
        &mut self.attributes
    }
}

// ============================================================================
// Component
// ============================================================================

/// A reusable, embeddable schema fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub uid: SchemaUid,

    #[serde(default, skip_serializing_if = "Status::is_unchanged")]
    pub status: Status,

    pub category: String,

    pub info: ComponentInfo,

    #[serde(default)]
    pub attributes: Vec<Attribute>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_temporary: bool,
}

/// Descriptive fields of a component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Component {
    /// Create an unchanged component with no attributes
    pub fn new(
        uid: impl Into<SchemaUid>,
        category: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            status: Status::Unchanged,
            category: category.into(),
            info: ComponentInfo {
                display_name: display_name.into(),
                ..Default::default()
            },
            attributes: Vec::new(),
            is_temporary: false,
        }
    }

    /// Set the status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Append an attribute
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

impl StatusTracked for Component {
    fn status(&self) -> Status {
        self.status
    }

    fn force_status(&mut self, status: Status) {
        self.status = status;
    }
}

impl SchemaEntity for Component {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn for_target(&self) -> ForTarget {
        ForTarget::Component
    }

    fn display_name(&self) -> &str {
        &self.info.display_name
    }

    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut Vec<Attribute> {
        &mut self.attributes
    }
}

// ============================================================================
// Reserved Names
// ============================================================================

/// Names the server refuses for models and attributes
///
/// Supplied by the host at init time; the session only stores it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReservedNames {
    #[serde(default)]
    pub models: Vec<String>,

    #[serde(default)]
    pub attributes: Vec<String>,
}

impl ReservedNames {
    /// Case-insensitive model name lookup
    pub fn is_reserved_model(&self, name: &str) -> bool {
        self.models.iter().any(|m| m.eq_ignore_ascii_case(name))
    }

    /// Case-insensitive attribute name lookup
    pub fn is_reserved_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ctb_core::ScalarType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn address() -> ContentType {
        ContentType::new("api::address.address", "Address")
            .with_attribute(Attribute::scalar("city", ScalarType::String))
            .with_attribute(Attribute::scalar("postal_code", ScalarType::String).with_status(Status::New))
    }

    #[test]
    fn test_content_type_from_json() {
        let ct: ContentType = serde_json::from_value(json!({
            "uid": "api::article.article",
            "kind": "singleType",
            "info": { "displayName": "Article", "singularName": "article", "pluralName": "articles" },
            "options": { "draftAndPublish": true },
            "attributes": [{ "name": "title", "type": "string" }],
            "restrictRelationsTo": null
        }))
        .unwrap();

        assert_eq!(ct.status, Status::Unchanged);
        assert_eq!(ct.kind, ContentTypeKind::SingleType);
        assert!(ct.visible);
        assert_eq!(ct.restrict_relations_to, None);
        assert_eq!(ct.display_name(), "Article");
        assert_eq!(ct.attributes.len(), 1);
    }

    #[test]
    fn test_remove_attribute_at_soft_deletes_persisted() {
        let mut ct = address();
        assert!(!ct.remove_attribute_at(0));
        assert_eq!(ct.attributes.len(), 2);
        assert_eq!(ct.attributes[0].status, Status::Removed);
        assert_eq!(ct.status, Status::Changed);
    }

    #[test]
    fn test_remove_attribute_at_splices_new() {
        let mut ct = address();
        assert!(ct.remove_attribute_at(1));
        assert_eq!(ct.attributes.len(), 1);
        assert_eq!(ct.attributes[0].name, "city");
    }

    #[test]
    fn test_push_attribute_keeps_terminal_status() {
        let mut ct = address().with_status(Status::New);
        ct.push_attribute(Attribute::scalar("street", ScalarType::Text));
        assert_eq!(ct.status, Status::New);
    }

    #[test]
    fn test_require_attribute_index() {
        let ct = address();
        assert_eq!(ct.require_attribute_index("postal_code").unwrap(), 1);
        let err = ct.require_attribute_index("country").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_component_roundtrip() {
        let component = Component::new("default.address", "default", "Address")
            .with_attribute(Attribute::scalar("street", ScalarType::String));
        let value = serde_json::to_value(&component).unwrap();
        assert_eq!(
            value,
            json!({
                "uid": "default.address",
                "category": "default",
                "info": { "displayName": "Address" },
                "attributes": [{ "name": "street", "type": "string" }]
            })
        );
        let back: Component = serde_json::from_value(value).unwrap();
        assert_eq!(back, component);
    }

    #[test]
    fn test_reserved_names_case_insensitive() {
        let reserved = ReservedNames {
            models: vec!["boolean".to_string()],
            attributes: vec!["id".to_string(), "document_id".to_string()],
        };
        assert!(reserved.is_reserved_attribute("ID"));
        assert!(reserved.is_reserved_model("Boolean"));
        assert!(!reserved.is_reserved_attribute("title"));
    }
}
