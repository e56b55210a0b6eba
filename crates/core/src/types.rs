//! Core types used throughout the Content-Type Builder
//!
//! These are the closed tag sets the schema model is built from: lifecycle
//! status, relation kinds, scalar attribute types and the two schema
//! families (content types and components).

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Uid of a content type (e.g. `api::article.article`) or component
/// (e.g. `default.address`)
pub type SchemaUid = String;

// ============================================================================
// Status
// ============================================================================

/// Lifecycle tag carried by schemas and attributes
///
/// The change-set sent to the server is computed from these tags alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// Created in this session, unknown to the server
    New,
    /// Known to the server and modified in this session
    Changed,
    /// Known to the server and scheduled for deletion
    Removed,
    /// Known to the server and untouched
    #[default]
    Unchanged,
}

impl Status {
    /// `NEW` and `REMOVED` are terminal: no later edit moves away from them
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::New | Status::Removed)
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Status::Unchanged)
    }

    /// Status after requesting `next`: terminal states are kept as is
    pub fn transition(self, next: Status) -> Status {
        if self.is_terminal() { self } else { next }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "NEW",
            Status::Changed => "CHANGED",
            Status::Removed => "REMOVED",
            Status::Unchanged => "UNCHANGED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Relation Kinds
// ============================================================================

/// Cardinality and sidedness of a relation attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
    /// One-sided `oneToOne`: no attribute on the target
    OneWay,
    /// One-sided `oneToMany`: no attribute on the target
    ManyWay,
}

impl RelationKind {
    /// All relation kinds, in the order the builder offers them
    pub const ALL: [RelationKind; 6] = [
        RelationKind::OneWay,
        RelationKind::OneToOne,
        RelationKind::OneToMany,
        RelationKind::ManyToOne,
        RelationKind::ManyToMany,
        RelationKind::ManyWay,
    ];

    /// One-sided kinds never have a mirror attribute on the target
    pub fn is_one_sided(&self) -> bool {
        matches!(self, RelationKind::OneWay | RelationKind::ManyWay)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::OneToOne => "oneToOne",
            RelationKind::OneToMany => "oneToMany",
            RelationKind::ManyToOne => "manyToOne",
            RelationKind::ManyToMany => "manyToMany",
            RelationKind::OneWay => "oneWay",
            RelationKind::ManyWay => "manyWay",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Schema Families
// ============================================================================

/// Which map of the session a schema lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ForTarget {
    ContentType,
    Component,
}

impl fmt::Display for ForTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForTarget::ContentType => f.write_str("content type"),
            ForTarget::Component => f.write_str("component"),
        }
    }
}

/// Kind of a content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentTypeKind {
    #[default]
    CollectionType,
    SingleType,
}

impl ContentTypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentTypeKind::CollectionType => "collectionType",
            ContentTypeKind::SingleType => "singleType",
        }
    }
}

// ============================================================================
// Scalar Attribute Types
// ============================================================================

/// Attribute types that carry no cross-schema references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    String,
    Text,
    Richtext,
    Blocks,
    Integer,
    Decimal,
    Float,
    Biginteger,
    Email,
    Password,
    Enumeration,
    Date,
    Time,
    Datetime,
    Timestamp,
    Json,
    Boolean,
    Media,
}

impl ScalarType {
    pub const ALL: [ScalarType; 18] = [
        ScalarType::String,
        ScalarType::Text,
        ScalarType::Richtext,
        ScalarType::Blocks,
        ScalarType::Integer,
        ScalarType::Decimal,
        ScalarType::Float,
        ScalarType::Biginteger,
        ScalarType::Email,
        ScalarType::Password,
        ScalarType::Enumeration,
        ScalarType::Date,
        ScalarType::Time,
        ScalarType::Datetime,
        ScalarType::Timestamp,
        ScalarType::Json,
        ScalarType::Boolean,
        ScalarType::Media,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Text => "text",
            ScalarType::Richtext => "richtext",
            ScalarType::Blocks => "blocks",
            ScalarType::Integer => "integer",
            ScalarType::Decimal => "decimal",
            ScalarType::Float => "float",
            ScalarType::Biginteger => "biginteger",
            ScalarType::Email => "email",
            ScalarType::Password => "password",
            ScalarType::Enumeration => "enumeration",
            ScalarType::Date => "date",
            ScalarType::Time => "time",
            ScalarType::Datetime => "datetime",
            ScalarType::Timestamp => "timestamp",
            ScalarType::Json => "json",
            ScalarType::Boolean => "boolean",
            ScalarType::Media => "media",
        }
    }

    /// Parse a JSON `type` tag
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_transition_is_monotonic() {
        assert_eq!(Status::Unchanged.transition(Status::Changed), Status::Changed);
        assert_eq!(Status::Changed.transition(Status::Removed), Status::Removed);
        assert_eq!(Status::New.transition(Status::Changed), Status::New);
        assert_eq!(Status::Removed.transition(Status::Changed), Status::Removed);
        assert_eq!(Status::New.transition(Status::Unchanged), Status::New);
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(serde_json::to_string(&Status::New).unwrap(), "\"NEW\"");
        let status: Status = serde_json::from_str("\"REMOVED\"").unwrap();
        assert_eq!(status, Status::Removed);
        assert_eq!(Status::default(), Status::Unchanged);
    }

    #[test]
    fn test_relation_kind_serde() {
        let kind: RelationKind = serde_json::from_str("\"manyToOne\"").unwrap();
        assert_eq!(kind, RelationKind::ManyToOne);
        assert_eq!(serde_json::to_string(&RelationKind::OneWay).unwrap(), "\"oneWay\"");
        assert!(serde_json::from_str::<RelationKind>("\"morphToMany\"").is_err());
    }

    #[test]
    fn test_one_sided_kinds() {
        let one_sided: Vec<_> = RelationKind::ALL
            .into_iter()
            .filter(|k| k.is_one_sided())
            .collect();
        assert_eq!(one_sided, vec![RelationKind::OneWay, RelationKind::ManyWay]);
    }

    #[test]
    fn test_scalar_parse() {
        assert_eq!(ScalarType::parse("biginteger"), Some(ScalarType::Biginteger));
        assert_eq!(ScalarType::parse("relation"), None);
        for scalar in ScalarType::ALL {
            assert_eq!(ScalarType::parse(scalar.as_str()), Some(scalar));
        }
    }

    #[test]
    fn test_for_target_display() {
        assert_eq!(ForTarget::ContentType.to_string(), "content type");
        assert_eq!(
            serde_json::to_string(&ForTarget::ContentType).unwrap(),
            "\"contentType\""
        );
    }
}
