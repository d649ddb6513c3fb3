//! Create/edit form state with dirty tracking

use crate::types::FormMode;

/// Where the form is, with the values that only exist in that phase.
#[derive(Debug, Clone)]
enum Session<F, E> {
    Idle,
    Creating {
        current: F,
        original: F,
    },
    Editing {
        target: E,
        current: F,
        original: F,
    },
}

/// Create/edit state for one entity page.
///
/// `original` is the snapshot taken when creating or editing began; dirtiness is a
/// field-wise comparison against it. No I/O and no validation happen here.
#[derive(Debug, Clone)]
pub struct FormState<F, E> {
    initial: F,
    session: Session<F, E>,
}

impl<F, E> FormState<F, E>
where
    F: Clone + PartialEq,
{
    /// `initial` is the blank form used for every new record.
    pub fn new(initial: F) -> Self {
        Self {
            initial,
            session: Session::Idle,
        }
    }

    pub fn mode(&self) -> FormMode {
        match self.session {
            Session::Idle => FormMode::Idle,
            Session::Creating { .. } => FormMode::Creating,
            Session::Editing { .. } => FormMode::Editing,
        }
    }

    pub fn open_create(&mut self) {
        self.open_create_with(|_| {});
    }

    /// Start a new record from the initial values with `overrides` applied.
    /// The overridden values become the baseline, so the form starts clean.
    pub fn open_create_with(&mut self, overrides: impl FnOnce(&mut F)) {
        let mut values = self.initial.clone();
        overrides(&mut values);
        self.session = Session::Creating {
            current: values.clone(),
            original: values,
        };
    }

    /// Start editing `record`; `to_form` maps it to form values.
    pub fn open_edit(&mut self, record: E, to_form: impl FnOnce(&E) -> F) {
        let values = to_form(&record);
        self.session = Session::Editing {
            target: record,
            current: values.clone(),
            original: values,
        };
    }

    /// Apply `patch` to the current values. Returns `false` (and does nothing) while idle.
    pub fn set_field(&mut self, patch: impl FnOnce(&mut F)) -> bool {
        match &mut self.session {
            Session::Idle => false,
            Session::Creating { current, .. } | Session::Editing { current, .. } => {
                patch(current);
                true
            }
        }
    }

    pub fn cancel(&mut self) {
        self.session = Session::Idle;
    }

    pub fn current(&self) -> Option<&F> {
        match &self.session {
            Session::Idle => None,
            Session::Creating { current, .. } | Session::Editing { current, .. } => Some(current),
        }
    }

    pub fn original(&self) -> Option<&F> {
        match &self.session {
            Session::Idle => None,
            Session::Creating { original, .. } | Session::Editing { original, .. } => {
                Some(original)
            }
        }
    }

    /// Record being edited; `None` unless editing.
    pub fn target(&self) -> Option<&E> {
        match &self.session {
            Session::Editing { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Field-wise `current != original`.
    pub fn is_dirty(&self) -> bool {
        self.is_dirty_with(|_| None)
    }

    /// Like [`is_dirty`](Self::is_dirty), but while creating `is_blank` may decide
    /// instead: `Some(true)` means nothing recognizable has been entered yet.
    /// Editing always compares against the snapshot.
    pub fn is_dirty_with(&self, is_blank: impl Fn(&F) -> Option<bool>) -> bool {
        match &self.session {
            Session::Idle => false,
            Session::Creating { current, original } => {
                is_blank(current).map_or_else(|| current != original, |blank| !blank)
            }
            Session::Editing {
                current, original, ..
            } => current != original,
        }
    }
}
