//! Bulk-action selection

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use staffdesk_transport::RecordId;

/// What a bulk action should act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ids", rename_all = "camelCase")]
pub enum SelectionTarget {
    /// Exactly these records.
    Explicit(Vec<RecordId>),
    /// Every record matching the current filters, on any page. The caller must
    /// resolve the ids itself before acting.
    AllMatchingFilter,
}

impl SelectionTarget {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Explicit(ids) if ids.is_empty())
    }
}

/// Records marked for a bulk action.
///
/// In select-all mode the logical selection is every record matching the filters;
/// `selected` then only mirrors the visible page so checkboxes render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: BTreeSet<RecordId>,
    select_all: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one record. Always leaves select-all mode: a hand-picked set is never
    /// reinterpreted as "all except this one".
    pub fn toggle(&mut self, id: RecordId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        self.select_all = false;
    }

    /// Select every visible record and enter select-all mode, or clear everything if
    /// the visible records are already all selected.
    pub fn toggle_all(&mut self, visible_ids: &[RecordId]) {
        if visible_ids.iter().all(|id| self.selected.contains(id)) {
            self.clear();
        } else {
            self.selected = visible_ids.iter().copied().collect();
            self.select_all = true;
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.select_all = false;
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selected.contains(&id)
    }

    pub fn is_select_all(&self) -> bool {
        self.select_all
    }

    /// Ids to render as checked.
    pub fn selected_ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.selected.iter().copied()
    }

    /// Number of locally marked ids. In select-all mode this is only the visible page.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn resolve_targets(&self) -> SelectionTarget {
        if self.select_all {
            SelectionTarget::AllMatchingFilter
        } else {
            SelectionTarget::Explicit(self.selected.iter().copied().collect())
        }
    }
}
