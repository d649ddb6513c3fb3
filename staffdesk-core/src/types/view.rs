//! Render snapshot of an entity page

use serde::Serialize;
use staffdesk_transport::RecordId;

use super::{FieldError, FormMode, Notice, PageError};
use crate::state::{ActionSurface, Pagination};

/// Everything the presentation layer needs to draw one entity page.
///
/// Built fresh from the controller state on every call, so the action list is never
/// stale relative to the flags next to it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView<E, F> {
    pub items: Vec<E>,
    pub total: u32,
    pub pagination: Pagination,
    pub loading: bool,

    pub selected_ids: Vec<RecordId>,
    pub select_all: bool,

    pub form_mode: FormMode,
    pub form: Option<F>,
    pub is_dirty: bool,

    pub submitting: bool,
    pub deleting: bool,
    pub actions: ActionSurface,

    /// Primary error slot
    pub error: Option<PageError>,
    /// Validation failure from the last save attempt
    pub field_error: Option<FieldError>,
    /// Side channel, independent of `error`
    pub notice: Option<Notice>,
}

impl<E, F> PageView<E, F> {
    pub fn selected_count(&self) -> usize {
        self.selected_ids.len()
    }

    pub fn page_number(&self) -> u32 {
        self.pagination.page_number()
    }

    pub fn page_count(&self) -> u32 {
        self.pagination.page_count(self.total)
    }
}
