//! Grid controller.
//!
//! A [`Grid`] drives one remote table: it fetches pages from `{url}list/`,
//! keeps the paging state in step with what the server reports, renders
//! through a [`GridView`] and opens the create and edit modals. Any
//! mutation the server accepts is followed by a fresh reload.
//!
//! # Example
//!
//! ```ignore
//! let grid = Grid::builder()
//!     .url("https://example.com/users")
//!     .transport(Arc::new(HttpTransport::new()?))
//!     .view(view)
//!     .presenter(presenter)
//!     .filter("name", |row| row.display("name").to_uppercase())
//!     .build();
//!
//! grid.reload().await;
//! grid.run().await;
//! ```

mod builder;
mod event;
mod view;

pub use builder::GridBuilder;
pub use builder::Missing;
pub use builder::Set;
pub use event::*;
pub use view::*;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::Weak;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use futures::FutureExt;
use log::debug;
use log::warn;
use tokio::sync::mpsc;

use crate::config::GridConfig;
use crate::error::Error;
use crate::error::TransportError;
use crate::form::OnSuccess;
use crate::form::SubmitOutcome;
use crate::modal::ModalHost;
use crate::modal::ModalPresenter;
use crate::modal::ShellId;
use crate::model::ListResponse;
use crate::model::RecordId;
use crate::model::RowRecord;
use crate::pager::compute_pager_window;
use crate::report::ErrorSink;
use crate::report::GridOperation;
use crate::state::PageState;
use crate::state::Reconciliation;
use crate::transport::Transport;
use crate::transport::params;

/// Title of the modal opened by [`Grid::new_record_requested`].
pub const CREATE_TITLE: &str = "New Record";

/// Title of the modal opened by [`Grid::edit_record_requested`].
pub const EDIT_TITLE: &str = "Edit Record";

/// Maps a row to the display text of one column.
pub type CellFilter = Arc<dyn Fn(&RowRecord) -> String + Send + Sync>;

/// What a reload did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The response was rendered.
    Applied {
        /// The current page no longer existed and was reset to 1.
        reset_stale_page: bool,
    },
    /// A newer reload was issued while this one was in flight.
    Discarded,
    /// The request failed and was reported.
    Failed,
}

impl ReloadOutcome {
    /// Returns `true` if the response was rendered.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Controller of one remote table.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct Grid {
    inner: Arc<GridInner>,
}

struct GridInner {
    url: String,
    filters: HashMap<String, CellFilter>,
    config: GridConfig,
    transport: Arc<dyn Transport>,
    view: Arc<dyn GridView>,
    sink: Arc<dyn ErrorSink>,
    columns: Vec<Column>,
    state: Mutex<PageState>,
    latest_request: AtomicU64,
    create_modal: ModalHost,
    edit_modal: ModalHost,
    events: Mutex<Option<mpsc::UnboundedReceiver<GridEvent>>>,
}

/// Parts collected by [`GridBuilder`].
pub(crate) struct GridParts {
    pub url: String,
    pub filters: HashMap<String, CellFilter>,
    pub config: GridConfig,
    pub initial_page: u32,
    pub transport: Arc<dyn Transport>,
    pub view: Arc<dyn GridView>,
    pub presenter: Arc<dyn ModalPresenter>,
    pub sink: Arc<dyn ErrorSink>,
}

impl Grid {
    /// Creates a new builder for constructing a grid.
    pub fn builder() -> GridBuilder<Missing, Missing, Missing, Missing> {
        GridBuilder::new()
    }

    pub(crate) fn from_parts(parts: GridParts) -> Self {
        let mut state = PageState::new(parts.config.default_page_size);
        state.set_current_page(parts.initial_page);

        let columns = parts.view.columns();
        let (events, rx) = GridEvents::channel();
        parts.view.attach(events);

        let create_modal = ModalHost::new(
            CREATE_TITLE,
            Arc::clone(&parts.presenter),
            Arc::clone(&parts.transport),
        );
        let edit_modal = ModalHost::new(EDIT_TITLE, parts.presenter, Arc::clone(&parts.transport));

        Self {
            inner: Arc::new(GridInner {
                url: normalize_base_url(parts.url),
                filters: parts.filters,
                config: parts.config,
                transport: parts.transport,
                view: parts.view,
                sink: parts.sink,
                columns,
                state: Mutex::new(state),
                latest_request: AtomicU64::new(0),
                create_modal,
                edit_modal,
                events: Mutex::new(Some(rx)),
            }),
        }
    }

    /// Returns the base url, always ending with `/`.
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Returns the header mapping read from the view.
    pub fn columns(&self) -> &[Column] {
        &self.inner.columns
    }

    /// Returns the grid configuration.
    pub fn config(&self) -> &GridConfig {
        &self.inner.config
    }

    /// Returns a snapshot of the paging state.
    pub fn page_state(&self) -> PageState {
        *self.lock_state()
    }

    /// Returns the "New Record" modal.
    pub fn create_modal(&self) -> &ModalHost {
        &self.inner.create_modal
    }

    /// Returns the "Edit Record" modal.
    pub fn edit_modal(&self) -> &ModalHost {
        &self.inner.edit_modal
    }

    /// Returns the modal for `target`.
    pub fn modal(&self, target: FormTarget) -> &ModalHost {
        match target {
            FormTarget::Create => self.create_modal(),
            FormTarget::Edit => self.edit_modal(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}{}/", self.inner.url, action)
    }

    fn lock_state(&self) -> MutexGuard<'_, PageState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn report(&self, operation: GridOperation, error: &Error) {
        self.inner.sink.report(operation, error);
    }

    // =========================================================================
    // Reload
    // =========================================================================

    /// Fetches the current page and renders it.
    ///
    /// If a newer reload was issued in the meantime the response is dropped.
    /// Failures are reported once and leave state and view untouched.
    pub async fn reload(&self) -> ReloadOutcome {
        let token = self.inner.latest_request.fetch_add(1, Ordering::AcqRel) + 1;
        let (page, page_size) = {
            let state = self.lock_state();
            (state.current_page(), state.page_size())
        };
        debug!("Reload #{}: page {} size {}", token, page, page_size);

        let result = self.fetch_page(page, page_size).await;

        let mut state = self.lock_state();
        if self.inner.latest_request.load(Ordering::Acquire) != token {
            debug!("Discarding response of superseded reload #{}", token);
            return ReloadOutcome::Discarded;
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                drop(state);
                self.report(GridOperation::Reload, &err);
                return ReloadOutcome::Failed;
            }
        };

        let reset_stale_page = match state.reconcile(response.total_pages) {
            Reconciliation::InRange => false,
            Reconciliation::ResetToFirst { stale_page } => {
                debug!(
                    "Page {} is beyond the {} reported pages, reset to 1",
                    stale_page,
                    state.total_pages()
                );
                true
            }
        };

        let model = self.view_model(&response, &state);
        // Rendering under the state lock keeps renders in token order.
        self.inner.view.render(&model);

        ReloadOutcome::Applied { reset_stale_page }
    }

    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<ListResponse, Error> {
        let query = params([("page", page.to_string()), ("total", page_size.to_string())]);
        let body = self
            .inner
            .transport
            .get_json(&self.endpoint("list"), &query)
            .await?;
        let response = serde_json::from_value(body).map_err(TransportError::from)?;
        Ok(response)
    }

    fn view_model(&self, response: &ListResponse, state: &PageState) -> GridViewModel {
        let rows = response
            .rows
            .iter()
            .map(|row| RenderedRow {
                id: row.id.clone(),
                cells: self.inner.columns.iter().map(|column| self.cell(column, row)).collect(),
            })
            .collect();

        let pager = compute_pager_window(
            response.page,
            state.total_pages(),
            self.inner.config.window_radius,
        );

        let page_sizes = self
            .inner
            .config
            .page_size_options
            .iter()
            .map(|&size| PageSizeOption {
                size,
                active: size == state.page_size(),
            })
            .collect();

        GridViewModel {
            rows,
            pager,
            page_sizes,
            total_rows: response.total_rows,
        }
    }

    fn cell(&self, column: &Column, row: &RowRecord) -> Cell {
        match &column.kind {
            ColumnKind::Buttons => Cell::Actions(row.id.clone()),
            ColumnKind::Field(key) => match self.inner.filters.get(key) {
                Some(filter) => Cell::Text(filter(row)),
                None => Cell::Text(row.display(key)),
            },
        }
    }

    // =========================================================================
    // User interactions
    // =========================================================================

    /// Moves to `page` and reloads.
    pub async fn page_link_clicked(&self, page: u32) -> ReloadOutcome {
        self.lock_state().set_current_page(page);
        self.reload().await
    }

    /// Changes the page size and reloads.
    pub async fn page_size_changed(&self, size: u32) -> ReloadOutcome {
        self.lock_state().set_page_size(size);
        self.reload().await
    }

    /// Opens the "New Record" modal with a fresh form from `{url}add/`.
    ///
    /// Returns the shell shown, or `None` if the form could not be loaded
    /// or a later request for the same modal took over.
    pub async fn new_record_requested(&self) -> Option<ShellId> {
        let url = self.endpoint("add");
        let shown = self
            .inner
            .create_modal
            .show(&url, Vec::new(), self.reload_on_success())
            .await;
        self.shown(GridOperation::OpenCreate, &self.inner.create_modal, shown)
    }

    /// Opens the "Edit Record" modal with the form for `id` from
    /// `{url}update/`.
    ///
    /// When edits for several rows overlap, the row requested last wins.
    pub async fn edit_record_requested(&self, id: &RecordId) -> Option<ShellId> {
        let url = self.endpoint("update");
        let data = params([("id", id.as_str())]);
        let shown = self
            .inner
            .edit_modal
            .show(&url, data, self.reload_on_success())
            .await;
        self.shown(GridOperation::OpenEdit, &self.inner.edit_modal, shown)
    }

    fn shown(
        &self,
        operation: GridOperation,
        modal: &ModalHost,
        result: Result<bool, Error>,
    ) -> Option<ShellId> {
        match result {
            Ok(true) => modal.shell_id(),
            Ok(false) => None,
            Err(err) => {
                self.report(operation, &err);
                None
            }
        }
    }

    /// Deletes the row `id` and reloads.
    ///
    /// Returns the reload outcome, or `None` if the delete failed; failures
    /// are reported and not followed by a reload.
    pub async fn delete_record_requested(&self, id: &RecordId) -> Option<ReloadOutcome> {
        let url = self.endpoint("delete");
        let fields = params([("id", id.as_str())]);

        if let Err(err) = self.inner.transport.post_form(&url, &fields).await {
            self.report(GridOperation::Delete, &Error::from(err));
            return None;
        }

        debug!("Deleted row {}", id);
        Some(self.reload().await)
    }

    /// Submits the form bound to the modal for `target`.
    ///
    /// Returns `None` if nothing was submitted: no form is bound, a
    /// submission is already in flight, or the request failed (reported).
    pub async fn submit_form(&self, target: FormTarget) -> Option<SubmitOutcome> {
        match self.modal(target).submit().await {
            Ok(outcome) => Some(outcome),
            Err(Error::SubmissionInFlight) => {
                debug!("Ignoring submit of {:?} form while one is in flight", target);
                None
            }
            Err(err) => {
                self.report(GridOperation::Submit, &err);
                None
            }
        }
    }

    /// Continuation for the modals: reload if the grid still exists.
    fn reload_on_success(&self) -> OnSuccess {
        let grid: Weak<GridInner> = Arc::downgrade(&self.inner);
        Box::new(move || {
            async move {
                if let Some(inner) = grid.upgrade() {
                    Grid { inner }.reload().await;
                }
            }
            .boxed()
        })
    }

    // =========================================================================
    // Event dispatch
    // =========================================================================

    /// Routes `event` to the matching operation.
    pub async fn dispatch(&self, event: GridEvent) {
        match event {
            GridEvent::PageLinkClicked(page) => {
                self.page_link_clicked(page).await;
            }
            GridEvent::PageSizeChanged(size) => {
                self.page_size_changed(size).await;
            }
            GridEvent::NewRecord => {
                self.new_record_requested().await;
            }
            GridEvent::EditRecord(id) => {
                self.edit_record_requested(&id).await;
            }
            GridEvent::DeleteRecord(id) => {
                self.delete_record_requested(&id).await;
            }
            GridEvent::SubmitForm(target) => {
                self.submit_form(target).await;
            }
        }
    }

    /// Handles events from the view until every sender is dropped.
    ///
    /// Each event runs on its own task, so a slow request never holds up
    /// later interactions. Only the first call receives events.
    pub async fn run(&self) {
        let receiver = self
            .inner
            .events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        let Some(mut receiver) = receiver else {
            warn!("Grid event loop is already running");
            return;
        };

        while let Some(event) = receiver.recv().await {
            let grid = self.clone();
            tokio::spawn(async move {
                grid.dispatch(event).await;
            });
        }
        debug!("Grid event channel closed");
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("url", &self.inner.url)
            .field("columns", &self.inner.columns)
            .field("state", &self.page_state())
            .finish()
    }
}

fn normalize_base_url(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
