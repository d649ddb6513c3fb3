//! Entity page orchestrator

use std::sync::Arc;

use tokio::sync::Mutex;

use super::list_loader::{ListLoader, ListState, LoadOutcome};
use super::mutation_executor::MutationExecutor;
use crate::config::ControllerConfig;
use crate::error::{CoreError, CoreResult, FailureClass};
use crate::state::{ActionInputs, ActionSurface, FormState, Pagination, Selection, SelectionTarget};
use crate::traits::{EntityResource, PostSaveHook, Record, Transport};
use crate::types::{
    BatchDeleteReport, ErrorKind, FieldError, Filters, Notice, Operation, PageError, PageView,
    RecordId, SaveKind,
};

/// Mutable page state, only ever touched under the controller's lock
struct PageState<R: EntityResource> {
    pagination: Pagination,
    filters: Filters,
    list: ListState<R::Entity>,
    selection: Selection,
    form: FormState<R::FormData, R::Entity>,
    submitting: bool,
    deleting: bool,
    error: Option<PageError>,
    field_error: Option<FieldError>,
    notice: Option<Notice>,
}

impl<R: EntityResource> PageState<R> {
    fn is_dirty(&self, resource: &R) -> bool {
        self.form.is_dirty_with(|form| resource.is_blank(form))
    }

    fn actions(&self, resource: &R) -> ActionSurface {
        ActionSurface::compose(ActionInputs {
            mode: self.form.mode(),
            selected_count: self.selection.len(),
            is_dirty: self.is_dirty(resource),
            submitting: self.submitting,
            deleting: self.deleting,
        })
    }
}

/// Create/edit/select/paginate/bulk-delete controller for one resource page.
///
/// Every operation takes `&self`; the state lock is released before any transport
/// call, so a load may be issued while a save or delete is in flight. Re-entrant
/// saves and deletes are rejected by the `submitting`/`deleting` flags, and list
/// responses that arrive after a newer load was issued are dropped.
///
/// Failures never escape as panics: each operation records a [`PageError`] in the
/// primary slot and also returns it (or the underlying [`CoreError`]) to the caller.
pub struct EntityPageController<R: EntityResource> {
    resource: Arc<R>,
    loader: ListLoader,
    executor: MutationExecutor,
    post_save_hook: Option<Arc<dyn PostSaveHook<R::Entity>>>,
    state: Mutex<PageState<R>>,
}

impl<R: EntityResource> EntityPageController<R> {
    /// Create a controller; nothing is loaded until [`reload`](Self::reload).
    ///
    /// Fails with [`CoreError::ConfigError`] if `config` does not validate.
    pub fn new(
        resource: R,
        transport: Arc<dyn Transport>,
        config: ControllerConfig,
    ) -> CoreResult<Self> {
        config.validate()?;
        let form = FormState::new(resource.initial_form());
        Ok(Self {
            resource: Arc::new(resource),
            loader: ListLoader::new(Arc::clone(&transport)),
            executor: MutationExecutor::new(transport, config),
            post_save_hook: None,
            state: Mutex::new(PageState {
                pagination: Pagination::new(config.page_size),
                filters: Filters::new(),
                list: ListState::new(),
                selection: Selection::new(),
                form,
                submitting: false,
                deleting: false,
                error: None,
                field_error: None,
                notice: None,
            }),
        })
    }

    /// Chain `hook` after every successful save.
    #[must_use]
    pub fn with_post_save_hook(mut self, hook: Arc<dyn PostSaveHook<R::Entity>>) -> Self {
        self.post_save_hook = Some(hook);
        self
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    // ===== Loading =====

    /// Fetch the current window with the current filters.
    pub async fn reload(&self) -> LoadOutcome {
        let ticket = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let query = state.pagination.to_query(&state.filters);
            state.list.begin(query)
        };

        let result = self
            .loader
            .fetch::<R::Entity>(self.resource.endpoint(), ticket.query())
            .await;

        let mut state = self.state.lock().await;
        let outcome = state.list.apply(&ticket, result);
        match &outcome {
            LoadOutcome::Applied => {
                if state
                    .error
                    .as_ref()
                    .is_some_and(|e| e.operation == Operation::Load)
                {
                    state.error = None;
                }
            }
            LoadOutcome::Failed(error) => state.error = Some(error.clone()),
            LoadOutcome::Stale => {}
        }
        outcome
    }

    async fn navigate(&self, step: impl FnOnce(Pagination, u32) -> Pagination) -> LoadOutcome {
        {
            let mut state = self.state.lock().await;
            let total = state.list.total();
            state.pagination = step(state.pagination, total);
        }
        self.reload().await
    }

    pub async fn first_page(&self) -> LoadOutcome {
        self.navigate(|page, _| page.first()).await
    }

    pub async fn previous_page(&self) -> LoadOutcome {
        self.navigate(|page, _| page.previous()).await
    }

    /// Past the end this loads an empty page rather than stopping.
    pub async fn next_page(&self) -> LoadOutcome {
        self.navigate(|page, _| page.next()).await
    }

    pub async fn last_page(&self) -> LoadOutcome {
        self.navigate(Pagination::last).await
    }

    /// Jump to 1-based page `page`.
    pub async fn go_to_page(&self, page: u32) -> LoadOutcome {
        self.navigate(|window, _| window.at_page(page)).await
    }

    pub async fn set_page_size(&self, limit: u32) -> LoadOutcome {
        self.navigate(|page, _| page.with_limit(limit)).await
    }

    /// Replace the filters, go back to the first page and reload.
    ///
    /// The selection is kept; in select-all mode it now means every record matching
    /// the new filters.
    pub async fn set_filters(&self, filters: Filters) -> LoadOutcome {
        {
            let mut state = self.state.lock().await;
            state.filters = filters;
            state.pagination = state.pagination.first();
        }
        self.reload().await
    }

    // ===== Selection =====

    pub async fn toggle(&self, id: RecordId) {
        self.state.lock().await.selection.toggle(id);
    }

    /// Toggle every record of the visible page (select-all mode).
    pub async fn toggle_all(&self) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let visible: Vec<RecordId> = state.list.items().iter().map(|record| record.id()).collect();
        state.selection.toggle_all(&visible);
    }

    pub async fn clear_selection(&self) {
        self.state.lock().await.selection.clear();
    }

    // ===== Form =====

    pub async fn open_create(&self) {
        self.open_create_with(|_| {}).await;
    }

    pub async fn open_create_with(&self, overrides: impl FnOnce(&mut R::FormData)) {
        let mut state = self.state.lock().await;
        state.field_error = None;
        state.form.open_create_with(overrides);
    }

    pub async fn open_edit(&self, record: R::Entity) {
        let mut state = self.state.lock().await;
        state.field_error = None;
        state
            .form
            .open_edit(record, |entity| self.resource.to_form(entity));
    }

    /// Edit the visible record with `id`. Returns `false` if it is not on this page.
    pub async fn edit_visible(&self, id: RecordId) -> bool {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let Some(record) = state.list.items().iter().find(|r| r.id() == id).cloned() else {
            return false;
        };
        state.field_error = None;
        state
            .form
            .open_edit(record, |entity| self.resource.to_form(entity));
        true
    }

    /// Patch the form values; ignored while no form is open.
    pub async fn set_field(&self, patch: impl FnOnce(&mut R::FormData)) -> bool {
        self.state.lock().await.form.set_field(patch)
    }

    /// Close the form and clear the selection.
    pub async fn cancel(&self) {
        let mut state = self.state.lock().await;
        state.form.cancel();
        state.selection.clear();
        state.field_error = None;
    }

    // ===== Mutations =====

    /// Validate and submit the open form.
    ///
    /// On success the form closes, the list reloads and then the post-save hook runs,
    /// its outcome landing in the notice slot. On failure the form keeps its values
    /// so the user can retry.
    pub async fn save(&self) -> CoreResult<SaveKind> {
        let (target, form) = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let Some(form) = state.form.current().cloned() else {
                return Err(CoreError::NothingToSave);
            };
            if let Err(field_error) = self.resource.validate(&form) {
                log::warn!("Save rejected by validation: {field_error}");
                state.field_error = Some(field_error.clone());
                return Err(CoreError::Validation(field_error));
            }
            if state.submitting {
                return Err(CoreError::AlreadySubmitting);
            }
            if state.deleting {
                return Err(CoreError::AlreadyDeleting);
            }
            state.field_error = None;
            state.notice = None;
            state.submitting = true;
            (state.form.target().cloned(), form)
        };

        let result = self
            .executor
            .save(self.resource.as_ref(), target.as_ref(), &form)
            .await;

        let (saved, kind) = match result {
            Ok(saved) => saved,
            Err(e) => {
                if e.is_expected() {
                    log::warn!("Save on {} failed: {e}", self.resource.endpoint());
                } else {
                    log::error!("Save on {} failed: {e}", self.resource.endpoint());
                }
                let mut state = self.state.lock().await;
                state.submitting = false;
                state.error = Some(PageError::from_error(Operation::Save, &e));
                return Err(e);
            }
        };

        {
            let mut state = self.state.lock().await;
            state.submitting = false;
            state.error = None;
            state.form.cancel();
        }
        self.reload().await;

        if let Some(hook) = &self.post_save_hook {
            let outcome = hook.after_save(&saved, kind).await;
            if let Some(notice) = outcome.to_notice() {
                self.state.lock().await.notice = Some(notice);
            }
        }
        Ok(kind)
    }

    /// Delete every selected record.
    ///
    /// In select-all mode the ids are first collected from the list endpoint with the
    /// current filters. If that fails nothing is deleted and the selection is kept.
    /// Otherwise the selection is cleared and the list reloaded whether or not every
    /// batch succeeded; a partial run is reported in the primary error slot and in
    /// the returned report.
    pub async fn delete_selected(&self) -> CoreResult<BatchDeleteReport> {
        let (target, filters) = {
            let mut state = self.state.lock().await;
            let target = state.selection.resolve_targets();
            if target.is_empty() {
                return Ok(BatchDeleteReport::default());
            }
            if state.deleting {
                return Err(CoreError::AlreadyDeleting);
            }
            if state.submitting {
                return Err(CoreError::AlreadySubmitting);
            }
            state.deleting = true;
            (target, state.filters.clone())
        };

        let endpoint = self.resource.endpoint();
        let ids = match target {
            SelectionTarget::Explicit(ids) => ids,
            SelectionTarget::AllMatchingFilter => {
                match self.executor.resolve_all_matching(endpoint, &filters).await {
                    Ok(ids) => ids,
                    Err(e) => {
                        log::warn!("Could not resolve delete targets on {endpoint}: {e}");
                        let mut state = self.state.lock().await;
                        state.deleting = false;
                        state.error = Some(PageError::from_error(Operation::ResolveTargets, &e));
                        return Err(e);
                    }
                }
            }
        };

        let report = self.executor.delete_in_batches(endpoint, &ids).await;

        {
            let mut state = self.state.lock().await;
            state.deleting = false;
            state.selection.clear();
            state.error = report.failure.as_ref().map(|failure| {
                let kind = if failure.error.classify() == FailureClass::Unauthorized {
                    ErrorKind::SessionExpired
                } else {
                    ErrorKind::PartialBatch
                };
                PageError {
                    operation: Operation::Delete,
                    kind,
                    message: report.failure_message().unwrap_or_default(),
                }
            });
        }
        self.reload().await;
        Ok(report)
    }

    // ===== Derived state =====

    /// Render snapshot with a freshly composed action list.
    pub async fn snapshot(&self) -> PageView<R::Entity, R::FormData> {
        let state = self.state.lock().await;
        PageView {
            items: state.list.items().to_vec(),
            total: state.list.total(),
            pagination: state.pagination,
            loading: state.list.is_loading(),
            selected_ids: state.selection.selected_ids().collect(),
            select_all: state.selection.is_select_all(),
            form_mode: state.form.mode(),
            form: state.form.current().cloned(),
            is_dirty: state.is_dirty(&self.resource),
            submitting: state.submitting,
            deleting: state.deleting,
            actions: state.actions(&self.resource),
            error: state.error.clone(),
            field_error: state.field_error.clone(),
            notice: state.notice.clone(),
        }
    }

    pub async fn actions(&self) -> ActionSurface {
        self.state.lock().await.actions(&self.resource)
    }

    pub async fn filters(&self) -> Filters {
        self.state.lock().await.filters.clone()
    }

    pub async fn pagination(&self) -> Pagination {
        self.state.lock().await.pagination
    }

    pub async fn dismiss_error(&self) {
        self.state.lock().await.error = None;
    }

    pub async fn dismiss_notice(&self) {
        self.state.lock().await.notice = None;
    }
}
