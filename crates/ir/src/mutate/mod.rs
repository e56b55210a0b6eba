//! Graph mutators
//!
//! Every operation takes the live [`SchemaGraph`](crate::graph::SchemaGraph)
//! and applies one edit in place. Errors are returned before or during the
//! edit, so callers that need atomicity (the session reducer) apply them to
//! a copy.

pub mod attributes;
pub mod deletion;
pub mod dynamic_zone;
pub mod schemas;

pub use attributes::{
    add_attribute, add_custom_field_attribute, edit_attribute, edit_custom_field_attribute,
    move_attribute, remove_field,
};
pub use deletion::{delete_component, delete_content_type};
pub use dynamic_zone::{
    add_created_component_to_dynamic_zone, change_dynamic_zone_components,
    remove_component_from_dynamic_zone,
};
pub use schemas::{
    ChangeKind, ComponentData, ContentTypeData, ExternalSchema, apply_external_change,
    create_component, create_content_type, pluralize, update_component, update_component_uid,
    update_content_type,
};

// ============================================================================
// Tests
// ============================================================================
