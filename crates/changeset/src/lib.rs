//! # Content-Type Builder Change-Set
//!
//! Turns the live schema graph of a session into the payload of the
//! update-schema request:
//!
//! - `UNCHANGED` schemas are left out
//! - `REMOVED` schemas become `{action: "delete", uid}`
//! - `NEW` and `CHANGED` schemas carry their descriptive fields and every
//!   attribute, so the server can keep field order
//!
//! The [`TrackingCounters`] travel alongside for the save confirmation.

pub mod change;
pub mod compute;
pub mod tracking;

pub use change::{
    AttributeChange, ChangeAction, RequestData, SchemaChange, strip_empty, strip_empty_fields,
};
pub use compute::{ChangeSet, attribute_change, compute_change_set};
pub use tracking::TrackingCounters;

#[cfg(test)]
mod tests {
    use super::*;
    use ctb_ir::{
        Attribute, ContentType, ForTarget, RelationKind, ScalarType, SchemaSnapshot,
    };
    use ctb_session::{Action, Session};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const ARTICLE: &str = "api::article.article";
    const TAG: &str = "api::tag.tag";

    fn session() -> Session {
        let mut session = Session::default();
        session
            .dispatch(Action::Init(SchemaSnapshot {
                content_types: vec![
                    ContentType::new(ARTICLE, "Article")
                        .with_attribute(Attribute::scalar("title", ScalarType::String)),
                    ContentType::new(TAG, "Tag")
                        .with_attribute(Attribute::scalar("name", ScalarType::String)),
                ],
                ..Default::default()
            }))
            .unwrap();
        session
    }

    #[test]
    fn test_fresh_session_has_nothing_to_save() {
        let set = compute_change_set(&session().current().schemas);
        assert!(set.is_empty());
    }

    #[test]
    fn test_relation_edit_reaches_both_sides() {
        let mut session = session();
        session
            .dispatch(Action::AddAttribute {
                for_target: ForTarget::ContentType,
                target_uid: ARTICLE.into(),
                attribute: Attribute::relation("tags", RelationKind::ManyToMany, TAG, Some("articles")),
            })
            .unwrap();

        let set = compute_change_set(&session.current().schemas);
        let tag = serde_json::to_value(&set.request_data.content_types[1]).unwrap();
        assert_eq!(
            tag["attributes"],
            json!([
                { "action": "update", "name": "name", "properties": { "type": "string" } },
                {
                    "action": "create",
                    "name": "articles",
                    "properties": {
                        "type": "relation",
                        "relation": "manyToMany",
                        "target": ARTICLE,
                        "targetAttribute": "tags"
                    }
                }
            ])
        );
        assert_eq!(set.tracking.edited_content_types, 2);
        assert_eq!(set.tracking.new_fields, 2);

        session.dispatch(Action::Undo).unwrap();
        assert!(compute_change_set(&session.current().schemas).is_empty());
    }

    #[test]
    fn test_deleted_content_type_counts_all_fields() {
        let mut session = session();
        session
            .dispatch(Action::DeleteContentType { uid: TAG.into() })
            .unwrap();

        let set = compute_change_set(&session.current().schemas);
        assert_eq!(set.total(), 1);
        assert_eq!(set.request_data.content_types[0], SchemaChange::delete(TAG));
        assert_eq!(set.tracking.deleted_content_types, 1);
        assert_eq!(set.tracking.deleted_fields, 1);
    }
}
