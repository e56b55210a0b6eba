//! Core traits for the Content-Type Builder
//!
//! [`StatusTracked`] is implemented by everything that carries a lifecycle
//! [`Status`] (schemas and attributes) so the monotonic transition rule is
//! written once.

use crate::types::Status;

// ============================================================================
// StatusTracked Trait
// ============================================================================

/// Trait for values that carry a lifecycle status
///
/// # Example
///
/// ```rust,ignore
/// use ctb_core::{Status, StatusTracked};
///
/// let mut attribute = Attribute::scalar("title", ScalarType::String);
/// attribute.mark_changed();
/// assert_eq!(attribute.status(), Status::Changed);
/// ```
pub trait StatusTracked {
    /// Current status
    fn status(&self) -> Status;

    /// Overwrite the status without the transition rule
    ///
    /// Reserved for places that assign a status on creation.
    fn force_status(&mut self, status: Status);

    /// Request a status; terminal statuses (`NEW`, `REMOVED`) are kept
    fn set_status(&mut self, status: Status) {
        let next = self.status().transition(status);
        self.force_status(next);
    }

    /// Shorthand for `set_status(Status::Changed)`
    fn mark_changed(&mut self) {
        self.set_status(Status::Changed);
    }

    fn is_new(&self) -> bool {
        self.status() == Status::New
    }

    fn is_removed(&self) -> bool {
        self.status() == Status::Removed
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Entity(Status);

    impl StatusTracked for Entity {
        fn status(&self) -> Status {
            self.0
        }

        fn force_status(&mut self, status: Status) {
            self.0 = status;
        }
    }

    #[test]
    fn test_mark_changed() {
        let mut entity = Entity(Status::Unchanged);
        entity.mark_changed();
        assert_eq!(entity.status(), Status::Changed);
    }

    #[test]
    fn test_terminal_status_is_kept() {
        let mut entity = Entity(Status::New);
        entity.mark_changed();
        assert!(entity.is_new());

        let mut entity = Entity(Status::Removed);
        entity.mark_changed();
        assert!(entity.is_removed());
    }

    #[test]
    fn test_force_status_bypasses_rule() {
        let mut entity = Entity(Status::New);
        entity.force_status(Status::Changed);
        assert_eq!(entity.status(), Status::Changed);
    }
}
