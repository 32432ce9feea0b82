//! Checklist tracking for dynamically-selected items.
//!
//! One tracker type serves both activities and goals. Items are resolved in
//! the order the user selected them, so resuming always revisits the same
//! item first.

use super::items::{ItemFlow, ItemKind};

/// Finds the next selected item that still needs its detail screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistTracker {
    kind: ItemKind,
}

impl ChecklistTracker {
    pub fn new(kind: ItemKind) -> Self {
        Self { kind }
    }

    /// First item in `selected` that has a detail flow and is not in
    /// `completed`. Entries in `completed` that were never selected are
    /// ignored.
    pub fn next_incomplete(
        &self,
        selected: &[String],
        completed: &[String],
    ) -> Option<&'static ItemFlow> {
        self.outstanding(selected, completed).next()
    }

    /// Every outstanding item, in selection order.
    pub fn remaining(&self, selected: &[String], completed: &[String]) -> Vec<&'static str> {
        self.outstanding(selected, completed)
            .map(|flow| flow.item)
            .collect()
    }

    /// Add `item` to `completed` unless already there. Returns whether the
    /// set changed.
    pub fn mark_complete(&self, completed: &mut Vec<String>, item: &str) -> bool {
        if completed.iter().any(|c| c == item) {
            return false;
        }
        completed.push(item.to_string());
        true
    }

    fn outstanding<'a>(
        &self,
        selected: &'a [String],
        completed: &'a [String],
    ) -> impl Iterator<Item = &'static ItemFlow> + 'a {
        let kind = self.kind;
        selected
            .iter()
            .filter(move |item| !completed.contains(*item))
            .filter_map(move |item| kind.flow(item))
    }
}
