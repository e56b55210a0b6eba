//! Bounded linear undo/redo history

use crate::config::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Past and future snapshots around the current state
///
/// `past` is bounded; pushing beyond the limit drops the oldest snapshot.
/// Any push clears `future`, so history is a line, never a tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History<T> {
    /// Past states (for undo), oldest first
    past: VecDeque<T>,

    /// Future states (for redo), next redo last
    future: Vec<T>,

    /// Maximum number of past states
    #[serde(skip, default = "default_max_size")]
    max_size: usize,
}

fn default_max_size() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::with_max_size(DEFAULT_HISTORY_LIMIT)
    }
}

impl<T> History<T> {
    /// Create new history
    pub fn new() -> Self {
        Self::default()
    }

    /// Create history with custom max size
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            past: VecDeque::with_capacity(max_size.min(64)),
            future: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Push a new snapshot (clears redo stack)
    pub fn push(&mut self, snapshot: T) {
        self.past.push_back(snapshot);
        self.future.clear();
        while self.past.len() > self.max_size {
            self.past.pop_front();
        }
    }

    /// Undo: pop from past, push current to future
    pub fn undo(&mut self, current: T) -> Result<T, T> {
        match self.past.pop_back() {
            Some(previous) => {
                self.future.push(current);
                Ok(previous)
            }
            None => Err(current),
        }
    }

    /// Redo: pop from future, push current to past
    pub fn redo(&mut self, current: T) -> Result<T, T> {
        match self.future.pop() {
            Some(next) => {
                self.past.push_back(current);
                Ok(next)
            }
            None => Err(current),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.past.len()
    }

    pub fn redo_count(&self) -> usize {
        self.future.len()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Past snapshots, oldest first
    pub fn past(&self) -> impl Iterator<Item = &T> {
        self.past.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo() {
        let mut history = History::new();
        history.push(1);
        history.push(2);

        assert_eq!(history.undo(3), Ok(2));
        assert_eq!(history.undo(2), Ok(1));
        assert_eq!(history.undo(1), Err(1));
        assert_eq!(history.redo(1), Ok(2));
        assert_eq!(history.redo(2), Ok(3));
        assert_eq!(history.redo(3), Err(3));
    }

    #[test]
    fn test_push_clears_future() {
        let mut history = History::new();
        history.push("a");
        assert!(history.undo("b").is_ok());
        assert!(history.can_redo());
        history.push("c");
        assert!(!history.can_redo());
    }

    #[test]
    fn test_bound_drops_oldest() {
        let mut history = History::with_max_size(3);
        for i in 0..10 {
            history.push(i);
        }
        assert_eq!(history.undo_count(), 3);
        assert_eq!(history.past().copied().collect::<Vec<_>>(), vec![7, 8, 9]);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.push(1);
        let _ = history.undo(2);
        history.clear();
        assert_eq!(history.undo_count(), 0);
        assert_eq!(history.redo_count(), 0);
    }
}
