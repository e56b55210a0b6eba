//! Error types for the Content-Type Builder
//!
//! Every fallible operation in the workspace returns [`BuilderResult`]. The
//! variants split into caller errors (an action that does not fit the
//! current session state), payload errors (JSON that does not describe a
//! valid attribute or schema) and IO/config errors raised by hosts.

use crate::types::ForTarget;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the Content-Type Builder
#[derive(Debug, Error)]
pub enum BuilderError {
    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// No content type or component with this uid
    #[error("{target} not found: {uid}")]
    SchemaNotFound { target: ForTarget, uid: String },

    /// Relation target uid is neither a content type nor a component
    #[error("Relation target not found: {0}")]
    RelationTargetNotFound(String),

    /// Attribute not found on a schema
    #[error("Attribute '{attribute}' not found in '{uid}'")]
    AttributeNotFound { uid: String, attribute: String },

    // ========================================================================
    // Duplicate Errors
    // ========================================================================
    /// A schema with this uid already exists
    #[error("Duplicate schema uid: '{0}' already exists")]
    DuplicateSchema(String),

    /// An attribute with this name already exists on the schema
    #[error("Duplicate attribute name: '{attribute}' already exists in '{uid}'")]
    DuplicateAttribute { uid: String, attribute: String },

    // ========================================================================
    // Shape Errors
    // ========================================================================
    /// Two-sided relation without a name for its opposite side
    #[error("Relation '{attribute}' is {relation} but has no targetAttribute")]
    MissingTargetAttribute { attribute: String, relation: String },

    /// Attribute exists but is not of the kind the operation needs
    #[error("Attribute '{attribute}' in '{uid}' is not a {expected}")]
    WrongAttributeKind {
        uid: String,
        attribute: String,
        expected: &'static str,
    },

    /// Positional index outside the list it addresses
    #[error("Index {index} out of range for '{uid}' (len {len})")]
    IndexOutOfRange { uid: String, index: usize, len: usize },

    /// JSON does not describe a valid attribute
    #[error("Invalid attribute payload: {0}")]
    InvalidAttribute(String),

    /// JSON does not describe a valid schema or snapshot
    #[error("Invalid schema payload: {0}")]
    InvalidSchema(String),

    // ========================================================================
    // IO / Config Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// File write error
    #[error("Failed to write file '{path}': {message}")]
    FileWrite { path: PathBuf, message: String },

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// TOML config parse error
    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BuilderError {
    /// Create a schema-not-found error
    pub fn schema_not_found(target: ForTarget, uid: impl Into<String>) -> Self {
        BuilderError::SchemaNotFound {
            target,
            uid: uid.into(),
        }
    }

    /// Create an attribute-not-found error
    pub fn attribute_not_found(uid: impl Into<String>, attribute: impl Into<String>) -> Self {
        BuilderError::AttributeNotFound {
            uid: uid.into(),
            attribute: attribute.into(),
        }
    }

    /// Create a duplicate-attribute error
    pub fn duplicate_attribute(uid: impl Into<String>, attribute: impl Into<String>) -> Self {
        BuilderError::DuplicateAttribute {
            uid: uid.into(),
            attribute: attribute.into(),
        }
    }

    /// Create an index-out-of-range error
    pub fn index_out_of_range(uid: impl Into<String>, index: usize, len: usize) -> Self {
        BuilderError::IndexOutOfRange {
            uid: uid.into(),
            index,
            len,
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        BuilderError::Internal(msg.into())
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BuilderError::SchemaNotFound { .. }
                | BuilderError::RelationTargetNotFound(_)
                | BuilderError::AttributeNotFound { .. }
        )
    }

    /// Check if this error means the dispatched action does not fit the
    /// current state
    pub fn is_caller_error(&self) -> bool {
        self.is_not_found()
            || matches!(
                self,
                BuilderError::DuplicateSchema(_)
                    | BuilderError::DuplicateAttribute { .. }
                    | BuilderError::MissingTargetAttribute { .. }
                    | BuilderError::WrongAttributeKind { .. }
                    | BuilderError::IndexOutOfRange { .. }
            )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            BuilderError::Io(_) | BuilderError::FileRead { .. } | BuilderError::FileWrite { .. }
        )
    }
}

/// Result type alias using BuilderError
pub type BuilderResult<T> = Result<T, BuilderError>;

// ============================================================================
// Tests
// ============================================================================
