//! Counters reported alongside a change-set

use ctb_ir::Status;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How many schemas and fields a save creates, edits and deletes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingCounters {
    pub new_content_types: usize,
    pub edited_content_types: usize,
    pub deleted_content_types: usize,
    pub new_components: usize,
    pub edited_components: usize,
    pub deleted_components: usize,
    pub new_fields: usize,
    pub edited_fields: usize,
    pub deleted_fields: usize,
}

impl TrackingCounters {
    pub(crate) fn count_content_type(&mut self, status: Status) {
        match status {
            Status::New => self.new_content_types += 1,
            Status::Changed => self.edited_content_types += 1,
            Status::Removed => self.deleted_content_types += 1,
            Status::Unchanged => {}
        }
    }

    pub(crate) fn count_component(&mut self, status: Status) {
        match status {
            Status::New => self.new_components += 1,
            Status::Changed => self.edited_components += 1,
            Status::Removed => self.deleted_components += 1,
            Status::Unchanged => {}
        }
    }

    pub(crate) fn count_field(&mut self, status: Status) {
        match status {
            Status::New => self.new_fields += 1,
            Status::Changed => self.edited_fields += 1,
            Status::Removed => self.deleted_fields += 1,
            Status::Unchanged => {}
        }
    }

    /// Number of schemas the save touches
    pub fn schemas(&self) -> usize {
        self.new_content_types
            + self.edited_content_types
            + self.deleted_content_types
            + self.new_components
            + self.edited_components
            + self.deleted_components
    }

    /// Number of fields the save touches
    pub fn fields(&self) -> usize {
        self.new_fields + self.edited_fields + self.deleted_fields
    }
}

impl fmt::Display for TrackingCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "content types +{} ~{} -{}, components +{} ~{} -{}, fields +{} ~{} -{}",
            self.new_content_types,
            self.edited_content_types,
            self.deleted_content_types,
            self.new_components,
            self.edited_components,
            self.deleted_components,
            self.new_fields,
            self.edited_fields,
            self.deleted_fields
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_status() {
        let mut counters = TrackingCounters::default();
        counters.count_content_type(Status::New);
        counters.count_component(Status::Removed);
        counters.count_field(Status::Changed);
        counters.count_field(Status::Unchanged);
        assert_eq!(counters.schemas(), 2);
        assert_eq!(counters.fields(), 1);
        assert_eq!(
            counters.to_string(),
            "content types +1 ~0 -0, components +0 ~0 -1, fields +0 ~1 -0"
        );
    }
}
