//! The action catalogue a session accepts
//!
//! Actions travel as `{"type": "...", "payload": {...}}`. Payload field
//! names are camelCase.

use ctb_ir::mutate::{ChangeKind, ComponentData, ContentTypeData, ExternalSchema};
use ctb_ir::{Attribute, ForTarget, SchemaSnapshot, SchemaUid};
use serde::{Deserialize, Serialize};

/// One edit (or history step) dispatched to a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    /// Replace the state with fresh server schemas
    Init(SchemaSnapshot),

    /// Back to the empty loading state, history dropped
    ReloadPlugin,

    CreateSchema {
        uid: SchemaUid,
        data: ContentTypeData,
    },

    CreateComponentSchema {
        uid: SchemaUid,
        data: ComponentData,
    },

    AddAttribute {
        for_target: ForTarget,
        target_uid: SchemaUid,
        attribute: Attribute,
    },

    EditAttribute {
        for_target: ForTarget,
        target_uid: SchemaUid,
        initial_attribute_name: String,
        attribute: Attribute,
    },

    RemoveField {
        for_target: ForTarget,
        target_uid: SchemaUid,
        attribute_name: String,
    },

    AddCustomFieldAttribute {
        for_target: ForTarget,
        target_uid: SchemaUid,
        attribute: Attribute,
    },

    EditCustomFieldAttribute {
        for_target: ForTarget,
        target_uid: SchemaUid,
        initial_attribute_name: String,
        attribute: Attribute,
    },

    AddCreatedComponentToDynamicZone {
        for_target: ForTarget,
        target_uid: SchemaUid,
        dynamic_zone_target: String,
        component_uid: SchemaUid,
    },

    ChangeDynamicZoneComponents {
        for_target: ForTarget,
        target_uid: SchemaUid,
        dynamic_zone_target: String,
        components: Vec<SchemaUid>,
    },

    RemoveComponentFromDynamicZone {
        for_target: ForTarget,
        target_uid: SchemaUid,
        dynamic_zone_target: String,
        index: usize,
    },

    UpdateComponentSchema {
        uid: SchemaUid,
        data: ComponentData,
    },

    UpdateSchema {
        uid: SchemaUid,
        data: ContentTypeData,
    },

    /// Rename a component created in this session
    UpdateComponentUid {
        uid: SchemaUid,
        new_uid: SchemaUid,
    },

    DeleteComponent {
        uid: SchemaUid,
    },

    DeleteContentType {
        uid: SchemaUid,
    },

    /// Insert, replace or delete a schema built outside the builder
    ApplyChange {
        action: ChangeKind,
        schema: ExternalSchema,
    },

    MoveAttribute {
        for_target: ForTarget,
        target_uid: SchemaUid,
        from: usize,
        to: usize,
    },

    Undo,

    Redo,

    /// Reset the live schemas to the server schemas, history dropped
    DiscardAll,

    ClearHistory,
}

impl Action {
    /// The `type` tag of the action
    pub fn name(&self) -> &'static str {
        match self {
            Action::Init(_) => "init",
            Action::ReloadPlugin => "reloadPlugin",
            Action::CreateSchema { .. } => "createSchema",
            Action::CreateComponentSchema { .. } => "createComponentSchema",
            Action::AddAttribute { .. } => "addAttribute",
            Action::EditAttribute { .. } => "editAttribute",
            Action::RemoveField { .. } => "removeField",
            Action::AddCustomFieldAttribute { .. } => "addCustomFieldAttribute",
            Action::EditCustomFieldAttribute { .. } => "editCustomFieldAttribute",
            Action::AddCreatedComponentToDynamicZone { .. } => "addCreatedComponentToDynamicZone",
            Action::ChangeDynamicZoneComponents { .. } => "changeDynamicZoneComponents",
            Action::RemoveComponentFromDynamicZone { .. } => "removeComponentFromDynamicZone",
            Action::UpdateComponentSchema { .. } => "updateComponentSchema",
            Action::UpdateSchema { .. } => "updateSchema",
            Action::UpdateComponentUid { .. } => "updateComponentUid",
            Action::DeleteComponent { .. } => "deleteComponent",
            Action::DeleteContentType { .. } => "deleteContentType",
            Action::ApplyChange { .. } => "applyChange",
            Action::MoveAttribute { .. } => "moveAttribute",
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::DiscardAll => "discardAll",
            Action::ClearHistory => "clearHistory",
        }
    }

    /// Whether dispatching the action records an undo step
    pub fn records_history(&self) -> bool {
        !matches!(
            self,
            Action::Init(_)
                | Action::ReloadPlugin
                | Action::Undo
                | Action::Redo
                | Action::DiscardAll
                | Action::ClearHistory
        )
    }
}
