//! # Content-Type Builder IR
//!
//! The schema model edited by a builder session: content types and
//! components, their attributes, and the operations that keep the two
//! maps consistent while they change.
//!
//! ## Core Concepts
//!
//! - **Attribute**: a named field of a schema, tagged by `type` (scalar, uid,
//!   component, dynamic zone, relation, custom field)
//! - **Content type / Component**: the two schema families, each owning an
//!   ordered attribute list and a lifecycle status
//! - **SchemaGraph**: both schema maps keyed by uid; schemas refer to each
//!   other by uid only
//! - **Mirror**: the inverse attribute a two-sided relation keeps on its
//!   target, maintained by the mutators in [`mutate`]
//!

// Module declarations
pub mod attribute;
pub mod graph;
pub mod mutate;
pub mod relation;
pub mod schema;
pub mod serialization;
pub mod validation;
pub mod views;

// Re-export commonly used types at crate root
pub use attribute::{Attribute, AttributeKind, PLUGIN_OPTIONS_KEY, PRIVATE_KEY, RelationAttribute};
pub use graph::SchemaGraph;
pub use relation::{
    allowed_relation_kinds, invert_relation_kind, is_allowed_relation_target, mirror_for,
    resolve_relation_kind,
};
pub use schema::{
    Component, ComponentInfo, ContentType, ContentTypeInfo, ReservedNames, SchemaEntity,
};
pub use serialization::{SchemaSnapshot, load_snapshot, load_snapshot_from_str, save_snapshot};
pub use validation::{ValidationResult, ValidationRule, Validator, validate_graph};
pub use views::{
    ComponentNavGroup, ComponentNavLink, NavRow, NestedComponent, NestedComponents,
    components_with_nested_components, sorted_component_nav_groups, sorted_content_type_nav_list,
    transitively_nested_components,
};

// Re-export core types that are commonly used with IR
pub use ctb_core::{
    BuilderError, BuilderResult, ContentTypeKind, ForTarget, RelationKind, ScalarType, SchemaUid,
    Status, StatusTracked,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        Attribute,
        AttributeKind,
        // Re-exported from core
        BuilderError,
        BuilderResult,
        Component,
        ContentType,
        ContentTypeKind,
        ForTarget,
        RelationKind,
        ScalarType,
        SchemaEntity,
        // Graph
        SchemaGraph,
        Status,
        StatusTracked,
        resolve_relation_kind,
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_builds_a_graph() {
        let graph = SchemaGraph::new()
            .with_content_type(
                ContentType::new("api::article.article", "Article")
                    .with_attribute(Attribute::scalar("title", ScalarType::String)),
            )
            .with_component(Component::new("default.seo", "default", "Seo"));
        assert!(graph.schema(ForTarget::ContentType, "api::article.article").is_ok());
        assert_eq!(
            resolve_relation_kind(RelationKind::OneToOne, None),
            RelationKind::OneWay
        );
    }
}
