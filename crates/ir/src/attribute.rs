//! Attribute definitions for schemas
//!
//! An [`Attribute`] is a named field on a content type or component. Its
//! `type` tag selects an [`AttributeKind`]; the kinds that reference other
//! schemas (component, dynamic zone, relation) carry typed payloads, and
//! every other JSON key (`required`, `default`, `private`, `pluginOptions`,
//! `conditions`, ...) is kept verbatim in [`Attribute::options`].
//!
//! On the wire an attribute is a flat JSON object:
//!
//! ```json
//! { "name": "category", "type": "relation", "relation": "oneToOne",
//!   "target": "api::category.category", "targetAttribute": "article",
//!   "status": "NEW" }
//! ```

use crate::relation::resolve_relation_kind;
use ctb_core::{
    BuilderError, BuilderResult, RelationKind, ScalarType, SchemaUid, Status, StatusTracked,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Option key for the `private` flag
pub const PRIVATE_KEY: &str = "private";

/// Option key for plugin-specific options
pub const PLUGIN_OPTIONS_KEY: &str = "pluginOptions";

// ============================================================================
// Attribute
// ============================================================================

/// A named, typed field on a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Attribute {
    /// Field name, unique within the owning schema
    pub name: String,

    /// Lifecycle status (absent on the wire means `UNCHANGED`)
    pub status: Status,

    /// Type tag and its typed payload
    pub kind: AttributeKind,

    /// Every other key of the attribute, in original order
    pub options: Map<String, Value>,
}

/// The closed set of attribute kinds
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeKind {
    /// Plain value types (string, integer, media, ...)
    Scalar(ScalarType),

    /// Slug field, optionally derived from another field
    Uid { target_field: Option<String> },

    /// Embedded component
    Component {
        component: SchemaUid,
        repeatable: bool,
    },

    /// Ordered list of allowed components
    DynamicZone { components: Vec<SchemaUid> },

    /// Relation to a content type
    Relation(RelationAttribute),

    /// Plugin-provided field, passed through untouched
    CustomField { custom_field: String },
}

/// Payload of a `relation` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationAttribute {
    /// Declared cardinality
    pub relation: RelationKind,

    /// Uid of the schema on the other side
    pub target: SchemaUid,

    /// Name of the mirror attribute on the target (absent for one-sided)
    pub target_attribute: Option<String>,
}

impl RelationAttribute {
    pub fn new(
        relation: RelationKind,
        target: impl Into<SchemaUid>,
        target_attribute: Option<String>,
    ) -> Self {
        Self {
            relation,
            target: target.into(),
            target_attribute,
        }
    }

    /// Kind after taking the presence of `target_attribute` into account
    pub fn resolved_kind(&self) -> RelationKind {
        resolve_relation_kind(self.relation, self.target_attribute.as_deref())
    }

    /// Whether a mirror attribute must exist on the target
    pub fn is_two_sided(&self) -> bool {
        !self.resolved_kind().is_one_sided()
    }
}

impl AttributeKind {
    /// The JSON `type` tag of this kind
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeKind::Scalar(scalar) => scalar.as_str(),
            AttributeKind::Uid { .. } => "uid",
            AttributeKind::Component { .. } => "component",
            AttributeKind::DynamicZone { .. } => "dynamiczone",
            AttributeKind::Relation(_) => "relation",
            AttributeKind::CustomField { .. } => "customField",
        }
    }
}

impl Attribute {
    /// Create an attribute with no options and status `UNCHANGED`
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            status: Status::Unchanged,
            kind,
            options: Map::new(),
        }
    }

    /// Create a scalar attribute
    pub fn scalar(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self::new(name, AttributeKind::Scalar(scalar))
    }

    /// Create a uid attribute
    pub fn uid(name: impl Into<String>, target_field: Option<&str>) -> Self {
        Self::new(
            name,
            AttributeKind::Uid {
                target_field: target_field.map(str::to_string),
            },
        )
    }

    /// Create a component attribute
    pub fn component(name: impl Into<String>, component: impl Into<SchemaUid>) -> Self {
        Self::new(
            name,
            AttributeKind::Component {
                component: component.into(),
                repeatable: false,
            },
        )
    }

    /// Create a dynamic zone attribute
    pub fn dynamic_zone<I, S>(name: impl Into<String>, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SchemaUid>,
    {
        Self::new(
            name,
            AttributeKind::DynamicZone {
                components: components.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Create a relation attribute
    pub fn relation(
        name: impl Into<String>,
        relation: RelationKind,
        target: impl Into<SchemaUid>,
        target_attribute: Option<&str>,
    ) -> Self {
        Self::new(
            name,
            AttributeKind::Relation(RelationAttribute::new(
                relation,
                target,
                target_attribute.map(str::to_string),
            )),
        )
    }

    /// Create a custom field attribute
    pub fn custom_field(name: impl Into<String>, custom_field: impl Into<String>) -> Self {
        Self::new(
            name,
            AttributeKind::CustomField {
                custom_field: custom_field.into(),
            },
        )
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Set the status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set an option key
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Mark as repeatable (component attributes only)
    pub fn repeatable(mut self) -> Self {
        if let AttributeKind::Component { repeatable, .. } = &mut self.kind {
            *repeatable = true;
        }
        self
    }

    // ========================================================================
    // Query methods
    // ========================================================================

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn as_relation(&self) -> Option<&RelationAttribute> {
        match &self.kind {
            AttributeKind::Relation(relation) => Some(relation),
            _ => None,
        }
    }

    pub fn as_relation_mut(&mut self) -> Option<&mut RelationAttribute> {
        match &mut self.kind {
            AttributeKind::Relation(relation) => Some(relation),
            _ => None,
        }
    }

    pub fn is_relation(&self) -> bool {
        self.as_relation().is_some()
    }

    /// Whether this is a relation whose target carries a mirror attribute
    pub fn is_two_sided_relation(&self) -> bool {
        self.as_relation().is_some_and(RelationAttribute::is_two_sided)
    }

    /// Component uid of a `component` attribute
    pub fn component_uid(&self) -> Option<&str> {
        match &self.kind {
            AttributeKind::Component { component, .. } => Some(component),
            _ => None,
        }
    }

    /// Allowed components of a `dynamiczone` attribute
    pub fn dynamic_zone_components(&self) -> Option<&[SchemaUid]> {
        match &self.kind {
            AttributeKind::DynamicZone { components } => Some(components),
            _ => None,
        }
    }

    /// Whether this attribute references the given component uid
    pub fn references_component(&self, uid: &str) -> bool {
        self.component_uid() == Some(uid)
            || self
                .dynamic_zone_components()
                .is_some_and(|components| components.iter().any(|c| c == uid))
    }

    /// The `private` option
    pub fn private(&self) -> Option<bool> {
        self.options.get(PRIVATE_KEY).and_then(Value::as_bool)
    }

    /// The `pluginOptions` option
    pub fn plugin_options(&self) -> Option<&Value> {
        self.options.get(PLUGIN_OPTIONS_KEY)
    }

    /// Equality ignoring the status tag
    pub fn same_definition(&self, other: &Attribute) -> bool {
        self.name == other.name && self.kind == other.kind && self.options == other.options
    }

    /// JSON payload without `name` and `status`
    pub fn properties(&self) -> Map<String, Value> {
        let mut map: Map<String, Value> = self.clone().into();
        map.shift_remove("name");
        map.shift_remove("status");
        map
    }
}

impl StatusTracked for Attribute {
    fn status(&self) -> Status {
        self.status
    }

    fn force_status(&mut self, status: Status) {
        self.status = status;
    }
}

// ============================================================================
// JSON conversion
// ============================================================================

impl TryFrom<Map<String, Value>> for Attribute {
    type Error = BuilderError;

    fn try_from(mut map: Map<String, Value>) -> BuilderResult<Self> {
        let name = take_string(&mut map, "name")?
            .ok_or_else(|| BuilderError::InvalidAttribute("missing 'name'".to_string()))?;
        let status = match map.shift_remove("status") {
            None | Some(Value::Null) => Status::Unchanged,
            Some(value) => serde_json::from_value(value).map_err(|e| {
                BuilderError::InvalidAttribute(format!("'{name}' has an invalid status: {e}"))
            })?,
        };
        let tag = take_string(&mut map, "type")?.ok_or_else(|| {
            BuilderError::InvalidAttribute(format!("'{name}' is missing 'type'"))
        })?;

        let kind = match tag.as_str() {
            "uid" => AttributeKind::Uid {
                target_field: take_string(&mut map, "targetField")?,
            },
            "component" => AttributeKind::Component {
                component: require_string(&mut map, &name, "component")?,
                repeatable: match map.shift_remove("repeatable") {
                    None | Some(Value::Null) => false,
                    Some(Value::Bool(flag)) => flag,
                    Some(other) => {
                        return Err(BuilderError::InvalidAttribute(format!(
                            "'{name}' has a non-boolean 'repeatable': {other}"
                        )));
                    }
                },
            },
            "dynamiczone" => AttributeKind::DynamicZone {
                components: take_string_list(&mut map, &name, "components")?,
            },
            "relation" => {
                let relation = map.shift_remove("relation").ok_or_else(|| {
                    BuilderError::InvalidAttribute(format!("'{name}' is missing 'relation'"))
                })?;
                let relation: RelationKind = serde_json::from_value(relation).map_err(|e| {
                    BuilderError::InvalidAttribute(format!("'{name}' has an invalid relation: {e}"))
                })?;
                AttributeKind::Relation(RelationAttribute {
                    relation,
                    target: require_string(&mut map, &name, "target")?,
                    target_attribute: take_string(&mut map, "targetAttribute")?,
                })
            }
            "customField" => AttributeKind::CustomField {
                custom_field: require_string(&mut map, &name, "customField")?,
            },
            other => AttributeKind::Scalar(ScalarType::parse(other).ok_or_else(|| {
                BuilderError::InvalidAttribute(format!("'{name}' has unknown type '{other}'"))
            })?),
        };

        Ok(Self {
            name,
            status,
            kind,
            options: map,
        })
    }
}

impl From<Attribute> for Map<String, Value> {
    fn from(attribute: Attribute) -> Self {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(attribute.name));
        map.insert(
            "type".to_string(),
            Value::String(attribute.kind.type_name().to_string()),
        );

        match attribute.kind {
            AttributeKind::Scalar(_) => {}
            AttributeKind::Uid { target_field } => {
                if let Some(field) = target_field {
                    map.insert("targetField".to_string(), Value::String(field));
                }
            }
            AttributeKind::Component {
                component,
                repeatable,
            } => {
                map.insert("component".to_string(), Value::String(component));
                map.insert("repeatable".to_string(), Value::Bool(repeatable));
            }
            AttributeKind::DynamicZone { components } => {
                map.insert(
                    "components".to_string(),
                    Value::Array(components.into_iter().map(Value::String).collect()),
                );
            }
            AttributeKind::Relation(relation) => {
                map.insert(
                    "relation".to_string(),
                    Value::String(relation.relation.as_str().to_string()),
                );
                map.insert("target".to_string(), Value::String(relation.target));
                if let Some(target_attribute) = relation.target_attribute {
                    map.insert(
                        "targetAttribute".to_string(),
                        Value::String(target_attribute),
                    );
                }
            }
            AttributeKind::CustomField { custom_field } => {
                map.insert("customField".to_string(), Value::String(custom_field));
            }
        }

        for (key, value) in attribute.options {
            map.insert(key, value);
        }
        if !attribute.status.is_unchanged() {
            map.insert(
                "status".to_string(),
                Value::String(attribute.status.as_str().to_string()),
            );
        }
        map
    }
}

/// Remove a string key; `null` and `""` count as absent
fn take_string(map: &mut Map<String, Value>, key: &str) -> BuilderResult<Option<String>> {
    match map.shift_remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(BuilderError::InvalidAttribute(format!(
            "'{key}' must be a string, got {other}"
        ))),
    }
}

fn require_string(map: &mut Map<String, Value>, name: &str, key: &str) -> BuilderResult<String> {
    take_string(map, key)?
        .ok_or_else(|| BuilderError::InvalidAttribute(format!("'{name}' is missing '{key}'")))
}

fn take_string_list(
    map: &mut Map<String, Value>,
    name: &str,
    key: &str,
) -> BuilderResult<Vec<String>> {
    match map.shift_remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(BuilderError::InvalidAttribute(format!(
                    "'{name}.{key}' must only hold strings, got {other}"
                ))),
            })
            .collect(),
        Some(other) => Err(BuilderError::InvalidAttribute(format!(
            "'{name}.{key}' must be an array, got {other}"
        ))),
    }
}

// ============================================================================
// Tests
// ============================================================================
