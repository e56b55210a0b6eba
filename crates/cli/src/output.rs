//! Colored summaries on stderr
//!
//! Stdout carries JSON only so it can be piped.

use colored::Colorize;
use ctb_changeset::TrackingCounters;
use ctb_ir::ValidationResult;

pub fn init(no_color: bool) {
    if no_color {
        colored::control::set_override(false);
    }
}

pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "!".yellow().bold(), message);
}

pub fn failure(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// One-line description of a replay
pub fn replay_summary(applied: usize, rejected: usize, undo: usize, redo: usize) -> String {
    format!("{applied} action(s) applied, {rejected} rejected (undo {undo}, redo {redo})")
}

/// One-line description of a change-set
pub fn tracking_summary(tracking: &TrackingCounters) -> String {
    if tracking.schemas() == 0 {
        "no changes to save".to_string()
    } else {
        format!("{} schema(s) to save: {tracking}", tracking.schemas())
    }
}

pub fn print_validation(result: &ValidationResult) {
    for error in &result.errors {
        failure(&error.to_string());
    }
    for item in &result.warnings {
        warning(&item.to_string());
    }
    if result.valid {
        success(&format!(
            "schema graph is valid ({} warning(s))",
            result.warnings.len()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_summary() {
        assert_eq!(
            replay_summary(3, 1, 2, 0),
            "3 action(s) applied, 1 rejected (undo 2, redo 0)"
        );
    }

    #[test]
    fn test_tracking_summary() {
        assert_eq!(tracking_summary(&TrackingCounters::default()), "no changes to save");

        let tracking = TrackingCounters {
            edited_content_types: 1,
            new_fields: 2,
            ..Default::default()
        };
        assert_eq!(
            tracking_summary(&tracking),
            "1 schema(s) to save: content types +0 ~1 -0, components +0 ~0 -0, fields +2 ~0 -0"
        );
    }
}
