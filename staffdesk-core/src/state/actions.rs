//! Bulk-action bar derivation
//!
//! A pure function of the page state. Order is fixed (cancel, delete, save) so the
//! bar looks the same on every resource page, and each action appears at most once.

use serde::{Deserialize, Serialize};

use crate::types::FormMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Cancel,
    Delete,
    Save,
}

/// One button of the action bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub label: String,
    pub disabled: bool,
    /// Show a spinner
    pub loading: bool,
}

/// Everything the action bar depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionInputs {
    pub mode: FormMode,
    pub selected_count: usize,
    pub is_dirty: bool,
    pub submitting: bool,
    pub deleting: bool,
}

/// Ordered, de-duplicated list of available actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSurface {
    actions: Vec<Action>,
}

impl ActionSurface {
    pub fn compose(inputs: ActionInputs) -> Self {
        let ActionInputs {
            mode,
            selected_count,
            is_dirty,
            submitting,
            deleting,
        } = inputs;
        let busy = submitting || deleting;
        let mut actions = Vec::with_capacity(3);

        if !mode.is_idle() || selected_count > 0 {
            actions.push(Action {
                kind: ActionKind::Cancel,
                label: "Cancel".to_string(),
                disabled: busy,
                loading: false,
            });
        }

        if selected_count > 0 {
            actions.push(Action {
                kind: ActionKind::Delete,
                label: if deleting {
                    "Deleting...".to_string()
                } else {
                    format!("Delete ({selected_count})")
                },
                disabled: busy,
                loading: deleting,
            });
        }

        if !mode.is_idle() && is_dirty {
            actions.push(Action {
                kind: ActionKind::Save,
                label: if submitting { "Saving..." } else { "Save" }.to_string(),
                disabled: busy,
                loading: submitting,
            });
        }

        Self { actions }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn get(&self, kind: ActionKind) -> Option<&Action> {
        self.actions.iter().find(|action| action.kind == kind)
    }

    /// Present and not disabled.
    pub fn is_enabled(&self, kind: ActionKind) -> bool {
        self.get(kind).is_some_and(|action| !action.disabled)
    }

    pub fn kinds(&self) -> Vec<ActionKind> {
        self.actions.iter().map(|action| action.kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
