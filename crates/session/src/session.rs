//! The session: current state plus undo history, driven by actions

use crate::action::Action;
use crate::config::SessionConfig;
use crate::history::History;
use crate::state::SessionState;
use ctb_ir::mutate;
use ctb_ir::BuilderResult;
use serde::{Deserialize, Serialize};

/// A schema-editing session
///
/// Owns the current [`SessionState`] and its history. Every mutating action
/// runs against a copy of the current state; the copy replaces the current
/// state only when the action succeeds, so a rejected action leaves the
/// session exactly as it was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(flatten)]
    history: History<SessionState>,

    current: SessionState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl Session {
    /// Empty, loading session
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            history: History::with_max_size(config.history_limit),
            current: SessionState::default(),
        }
    }

    /// The state to render from
    pub fn current(&self) -> &SessionState {
        &self.current
    }

    pub fn history(&self) -> &History<SessionState> {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Apply one action
    ///
    /// History steps (`undo`, `redo`) with nothing to step to are no-ops.
    pub fn dispatch(&mut self, action: Action) -> BuilderResult<()> {
        let name = action.name();
        tracing::debug!(action = name, "dispatch");

        match action {
            Action::Init(snapshot) => {
                snapshot.check_unique()?;
                tracing::info!(
                    components = snapshot.components.len(),
                    content_types = snapshot.content_types.len(),
                    "session initialised"
                );
                self.current = SessionState::from_snapshot(snapshot);
            }
            Action::ReloadPlugin => {
                tracing::info!("session reset");
                self.current = SessionState::default();
                self.history.clear();
            }
            Action::Undo => self.undo(),
            Action::Redo => self.redo(),
            Action::DiscardAll => {
                self.current.schemas = self.current.initial.clone();
                self.history.clear();
            }
            Action::ClearHistory => self.history.clear(),
            action => {
                let mut next = self.current.clone();
                if let Err(err) = reduce(&mut next, action) {
                    tracing::warn!(action = name, error = %err, "action rejected");
                    return Err(err);
                }
                let previous = std::mem::replace(&mut self.current, next);
                self.history.push(previous);
            }
        }
        Ok(())
    }

    /// Apply a sequence of actions, stopping at the first error
    ///
    /// Returns how many actions were applied.
    pub fn dispatch_all<I>(&mut self, actions: I) -> BuilderResult<usize>
    where
        I: IntoIterator<Item = Action>,
    {
        let mut applied = 0;
        for action in actions {
            self.dispatch(action)?;
            applied += 1;
        }
        Ok(applied)
    }

    fn undo(&mut self) {
        let current = std::mem::take(&mut self.current);
        self.current = match self.history.undo(current) {
            Ok(previous) => previous,
            Err(current) => {
                tracing::debug!("nothing to undo");
                current
            }
        };
    }

    fn redo(&mut self) {
        let current = std::mem::take(&mut self.current);
        self.current = match self.history.redo(current) {
            Ok(next) => next,
            Err(current) => {
                tracing::debug!("nothing to redo");
                current
            }
        };
    }
}

/// Apply a schema edit to `state`
fn reduce(state: &mut SessionState, action: Action) -> BuilderResult<()> {
    let graph = &mut state.schemas;
    match action {
        Action::CreateSchema { uid, data } => mutate::create_content_type(graph, &uid, data),
        Action::CreateComponentSchema { uid, data } => mutate::create_component(graph, &uid, data),
        Action::AddAttribute {
            for_target,
            target_uid,
            attribute,
        } => mutate::add_attribute(graph, for_target, &target_uid, attribute),
        Action::EditAttribute {
            for_target,
            target_uid,
            initial_attribute_name,
            attribute,
        } => mutate::edit_attribute(
            graph,
            &state.initial,
            for_target,
            &target_uid,
            &initial_attribute_name,
            attribute,
        ),
        Action::RemoveField {
            for_target,
            target_uid,
            attribute_name,
        } => mutate::remove_field(graph, for_target, &target_uid, &attribute_name),
        Action::AddCustomFieldAttribute {
            for_target,
            target_uid,
            attribute,
        } => mutate::add_custom_field_attribute(graph, for_target, &target_uid, attribute),
        Action::EditCustomFieldAttribute {
            for_target,
            target_uid,
            initial_attribute_name,
            attribute,
        } => mutate::edit_custom_field_attribute(
            graph,
            for_target,
            &target_uid,
            &initial_attribute_name,
            attribute,
        ),
        Action::AddCreatedComponentToDynamicZone {
            for_target,
            target_uid,
            dynamic_zone_target,
            component_uid,
        } => mutate::add_created_component_to_dynamic_zone(
            graph,
            for_target,
            &target_uid,
            &dynamic_zone_target,
            &component_uid,
        ),
        Action::ChangeDynamicZoneComponents {
            for_target,
            target_uid,
            dynamic_zone_target,
            components,
        } => mutate::change_dynamic_zone_components(
            graph,
            for_target,
            &target_uid,
            &dynamic_zone_target,
            &components,
        ),
        Action::RemoveComponentFromDynamicZone {
            for_target,
            target_uid,
            dynamic_zone_target,
            index,
        } => mutate::remove_component_from_dynamic_zone(
            graph,
            for_target,
            &target_uid,
            &dynamic_zone_target,
            index,
        ),
        Action::UpdateComponentSchema { uid, data } => mutate::update_component(graph, &uid, data),
        Action::UpdateSchema { uid, data } => mutate::update_content_type(graph, &uid, data),
        Action::UpdateComponentUid { uid, new_uid } => {
            mutate::update_component_uid(graph, &uid, &new_uid)
        }
        Action::DeleteComponent { uid } => mutate::delete_component(graph, &uid),
        Action::DeleteContentType { uid } => mutate::delete_content_type(graph, &uid),
        Action::ApplyChange { action, schema } => mutate::apply_external_change(graph, action, schema),
        Action::MoveAttribute {
            for_target,
            target_uid,
            from,
            to,
        } => mutate::move_attribute(graph, for_target, &target_uid, from, to),
        Action::Init(_)
        | Action::ReloadPlugin
        | Action::Undo
        | Action::Redo
        | Action::DiscardAll
        | Action::ClearHistory => Ok(()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ctb_ir::mutate::{ChangeKind, ComponentData, ContentTypeData, ExternalSchema};
    use ctb_ir::{
        Attribute, Component, ContentType, ForTarget, RelationKind, ScalarType, SchemaEntity,
        SchemaSnapshot, Status,
    };
    use pretty_assertions::assert_eq;

    const ADDRESS: &str = "api::address.address";
    const CATEGORY: &str = "api::category.category";

    fn snapshot() -> SchemaSnapshot {
        SchemaSnapshot {
            components: vec![
                Component::new("test.component2", "test", "Component 2"),
                Component::new("test.component1", "test", "Component 1")
                    .with_attribute(Attribute::component("nested", "test.component2")),
            ],
            content_types: vec![
                ContentType::new(ADDRESS, "Address")
                    .with_attribute(Attribute::scalar("city", ScalarType::String))
                    .with_attribute(Attribute::component("block", "test.component2"))
                    .with_attribute(Attribute::dynamic_zone(
                        "zone",
                        ["test.component1", "test.component2"],
                    )),
                ContentType::new(CATEGORY, "Category"),
            ],
            ..Default::default()
        }
    }

    fn session() -> Session {
        let mut session = Session::default();
        session.dispatch(Action::Init(snapshot())).unwrap();
        session
    }

    fn add_scalar(name: &str) -> Action {
        Action::AddAttribute {
            for_target: ForTarget::ContentType,
            target_uid: ADDRESS.into(),
            attribute: Attribute::scalar(name, ScalarType::String),
        }
    }

    #[test]
    fn test_init_does_not_record_history() {
        let session = session();
        assert!(!session.current().is_loading);
        assert!(!session.can_undo());
        assert!(!session.current().is_modified());
    }

    fn mutating_actions() -> Vec<Action> {
        vec![
            Action::AddAttribute {
                for_target: ForTarget::ContentType,
                target_uid: ADDRESS.into(),
                attribute: Attribute::relation("category", RelationKind::OneToOne, CATEGORY, Some("address")),
            },
            Action::EditAttribute {
                for_target: ForTarget::ContentType,
                target_uid: ADDRESS.into(),
                initial_attribute_name: "city".into(),
                attribute: Attribute::scalar("town", ScalarType::Text),
            },
            Action::RemoveField {
                for_target: ForTarget::ContentType,
                target_uid: ADDRESS.into(),
                attribute_name: "city".into(),
            },
            Action::DeleteComponent {
                uid: "test.component2".into(),
            },
            Action::MoveAttribute {
                for_target: ForTarget::ContentType,
                target_uid: ADDRESS.into(),
                from: 0,
                to: 2,
            },
            Action::ChangeDynamicZoneComponents {
                for_target: ForTarget::ContentType,
                target_uid: ADDRESS.into(),
                dynamic_zone_target: "zone".into(),
                components: vec!["test.component2".into(), "test.component1".into()],
            },
            Action::UpdateSchema {
                uid: CATEGORY.into(),
                data: ContentTypeData {
                    display_name: "Categories".into(),
                    ..Default::default()
                },
            },
            Action::ApplyChange {
                action: ChangeKind::Update,
                schema: ExternalSchema::ContentType(
                    ContentType::new(CATEGORY, "Category")
                        .with_attribute(Attribute::scalar("name", ScalarType::String)),
                ),
            },
        ]
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        for action in mutating_actions() {
            let name = action.name();
            let mut session = session();
            let before = session.current().clone();

            session.dispatch(action).unwrap();
            let after = session.current().clone();
            assert_ne!(after, before, "{name} changed nothing");

            session.dispatch(Action::Undo).unwrap();
            assert_eq!(session.current(), &before, "undo of {name}");
            assert!(session.can_redo());

            session.dispatch(Action::Redo).unwrap();
            assert_eq!(session.current(), &after, "redo of {name}");
            assert!(!session.can_redo());
        }
    }

    #[test]
    fn test_history_is_bounded() {
        let mut session = session();
        for i in 0..100 {
            session.dispatch(add_scalar(&format!("field_{i}"))).unwrap();
        }
        assert_eq!(session.history().undo_count(), 50);
        assert_eq!(session.current().schemas.content_types[ADDRESS].attributes.len(), 103);
    }

    #[test]
    fn test_history_limit_from_config() {
        let mut session = Session::new(&SessionConfig::with_history_limit(2));
        session.dispatch(Action::Init(snapshot())).unwrap();
        for name in ["a", "b", "c"] {
            session.dispatch(add_scalar(name)).unwrap();
        }
        assert_eq!(session.history().undo_count(), 2);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut session = session();
        session.dispatch(add_scalar("a")).unwrap();
        session.dispatch(Action::Undo).unwrap();
        session.dispatch(add_scalar("b")).unwrap();
        assert!(!session.can_redo());
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let mut session = session();
        let before = session.clone();
        session.dispatch(Action::Undo).unwrap();
        session.dispatch(Action::Redo).unwrap();
        assert_eq!(session, before);
    }

    #[test]
    fn test_rejected_action_leaves_session_unchanged() {
        let mut session = session();
        session.dispatch(add_scalar("a")).unwrap();
        let before = session.clone();

        let err = session
            .dispatch(Action::AddAttribute {
                for_target: ForTarget::ContentType,
                target_uid: "api::missing.missing".into(),
                attribute: Attribute::scalar("x", ScalarType::String),
            })
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(session, before);

        // fails halfway: the owner exists but the relation target does not
        let err = session
            .dispatch(Action::AddAttribute {
                for_target: ForTarget::ContentType,
                target_uid: ADDRESS.into(),
                attribute: Attribute::relation("tags", RelationKind::ManyToMany, "api::tag.tag", Some("addresses")),
            })
            .unwrap_err();
        assert!(err.is_caller_error());
        assert_eq!(session, before);
    }

    #[test]
    fn test_delete_component_sweeps_in_one_dispatch() {
        let mut session = session();
        session
            .dispatch(Action::DeleteComponent {
                uid: "test.component2".into(),
            })
            .unwrap();

        let graph = &session.current().schemas;
        assert_eq!(graph.components["test.component2"].status, Status::Removed);
        assert_eq!(graph.components["test.component1"].attributes[0].status, Status::Removed);
        let address = &graph.content_types[ADDRESS];
        assert_eq!(address.attribute("block").unwrap().status, Status::Removed);
        assert_eq!(
            address.attribute("zone").unwrap().dynamic_zone_components().unwrap(),
            ["test.component1".to_string()]
        );
        assert_eq!(session.history().undo_count(), 1);
    }

    #[test]
    fn test_remove_field_soft_and_hard() {
        let mut session = session();
        session.dispatch(add_scalar("street")).unwrap();
        for name in ["city", "street"] {
            session
                .dispatch(Action::RemoveField {
                    for_target: ForTarget::ContentType,
                    target_uid: ADDRESS.into(),
                    attribute_name: name.into(),
                })
                .unwrap();
        }
        let address = &session.current().schemas.content_types[ADDRESS];
        assert_eq!(address.attributes.len(), 3);
        assert_eq!(address.attributes[0].status, Status::Removed);
    }

    #[test]
    fn test_create_then_rename_component() {
        let mut session = session();
        session
            .dispatch(Action::CreateComponentSchema {
                uid: "shared.hero".into(),
                data: ComponentData {
                    display_name: "Hero".into(),
                    ..Default::default()
                },
            })
            .unwrap();
        session
            .dispatch(Action::ChangeDynamicZoneComponents {
                for_target: ForTarget::ContentType,
                target_uid: ADDRESS.into(),
                dynamic_zone_target: "zone".into(),
                components: vec!["shared.hero".into()],
            })
            .unwrap();
        session
            .dispatch(Action::UpdateComponentUid {
                uid: "shared.hero".into(),
                new_uid: "blocks.hero".into(),
            })
            .unwrap();

        let graph = &session.current().schemas;
        assert!(graph.components.contains_key("blocks.hero"));
        let zone = graph.content_types[ADDRESS].attribute("zone").unwrap();
        assert_eq!(
            zone.dynamic_zone_components().unwrap(),
            ["test.component1".to_string(), "test.component2".to_string(), "blocks.hero".to_string()]
        );
    }

    #[test]
    fn test_discard_all_and_reload() {
        let mut session = session();
        session
            .dispatch(Action::CreateSchema {
                uid: "api::tag.tag".into(),
                data: ContentTypeData {
                    display_name: "Tag".into(),
                    ..Default::default()
                },
            })
            .unwrap();
        assert!(session.current().is_modified());

        session.dispatch(Action::DiscardAll).unwrap();
        assert!(!session.current().is_modified());
        assert!(!session.can_undo());

        session.dispatch(Action::ReloadPlugin).unwrap();
        assert!(session.current().is_loading);
        assert!(session.current().schemas.is_empty());
    }

    #[test]
    fn test_clear_history_keeps_state() {
        let mut session = session();
        session.dispatch(add_scalar("a")).unwrap();
        let current = session.current().clone();
        session.dispatch(Action::ClearHistory).unwrap();
        assert_eq!(session.current(), &current);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_dispatch_all_stops_at_error() {
        let mut session = session();
        let result = session.dispatch_all(vec![
            add_scalar("a"),
            add_scalar("a"),
            add_scalar("b"),
        ]);
        assert!(result.is_err());
        assert_eq!(session.history().undo_count(), 1);
    }

    #[test]
    fn test_session_json_shape() {
        let mut session = session();
        session.dispatch(add_scalar("a")).unwrap();
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["past"].as_array().unwrap().len(), 1);
        assert_eq!(value["future"].as_array().unwrap().len(), 0);
        assert!(value["current"]["contentTypes"][ADDRESS].is_object());
        assert!(value["current"]["initialContentTypes"][ADDRESS].is_object());

        let keys: Vec<_> = value["current"].as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "components",
                "contentTypes",
                "initialComponents",
                "initialContentTypes",
                "reservedNames",
                "isLoading"
            ]
        );
    }
}
