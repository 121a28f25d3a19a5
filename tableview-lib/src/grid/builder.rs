//! Typestate builder for [`Grid`].

use std::collections::HashMap;
use std::sync::Arc;

use super::CellFilter;
use super::Grid;
use super::GridParts;
use super::GridView;
use crate::config::GridConfig;
use crate::model::RowRecord;
use crate::modal::ModalPresenter;
use crate::report::ErrorSink;
use crate::report::LogSink;
use crate::transport::Transport;

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`Grid`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `url` - Base url of the endpoint family (`list/`, `add/`, `update/`, `delete/`)
/// - `transport` - A [`Transport`] implementation
/// - `view` - The [`GridView`] that draws the table
/// - `presenter` - The [`ModalPresenter`] that draws the create and edit modals
pub struct GridBuilder<Url, Tr, View, Presenter> {
    url: Url,
    transport: Tr,
    view: View,
    presenter: Presenter,
    filters: HashMap<String, CellFilter>,
    config: GridConfig,
    initial_page: u32,
    sink: Arc<dyn ErrorSink>,
}

impl GridBuilder<Missing, Missing, Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            transport: Missing,
            view: Missing,
            presenter: Missing,
            filters: HashMap::new(),
            config: GridConfig::default(),
            initial_page: 1,
            sink: Arc::new(LogSink),
        }
    }
}

impl Default for GridBuilder<Missing, Missing, Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V, P> GridBuilder<Missing, T, V, P> {
    /// Sets the base url. A trailing `/` is added if missing.
    pub fn url(self, url: impl Into<String>) -> GridBuilder<Set<String>, T, V, P> {
        GridBuilder {
            url: Set(url.into()),
            transport: self.transport,
            view: self.view,
            presenter: self.presenter,
            filters: self.filters,
            config: self.config,
            initial_page: self.initial_page,
            sink: self.sink,
        }
    }
}

impl<U, V, P> GridBuilder<U, Missing, V, P> {
    /// Sets the transport used for every request.
    pub fn transport<T: Transport + 'static>(
        self,
        transport: Arc<T>,
    ) -> GridBuilder<U, Set<Arc<dyn Transport>>, V, P> {
        GridBuilder {
            url: self.url,
            transport: Set(transport as Arc<dyn Transport>),
            view: self.view,
            presenter: self.presenter,
            filters: self.filters,
            config: self.config,
            initial_page: self.initial_page,
            sink: self.sink,
        }
    }
}

impl<U, T, P> GridBuilder<U, T, Missing, P> {
    /// Sets the view. Its columns are read once, when the grid is built.
    pub fn view<V: GridView + 'static>(
        self,
        view: Arc<V>,
    ) -> GridBuilder<U, T, Set<Arc<dyn GridView>>, P> {
        GridBuilder {
            url: self.url,
            transport: self.transport,
            view: Set(view as Arc<dyn GridView>),
            presenter: self.presenter,
            filters: self.filters,
            config: self.config,
            initial_page: self.initial_page,
            sink: self.sink,
        }
    }
}

impl<U, T, V> GridBuilder<U, T, V, Missing> {
    /// Sets the presenter of the create and edit modals.
    pub fn presenter<P: ModalPresenter + 'static>(
        self,
        presenter: Arc<P>,
    ) -> GridBuilder<U, T, V, Set<Arc<dyn ModalPresenter>>> {
        GridBuilder {
            url: self.url,
            transport: self.transport,
            view: self.view,
            presenter: Set(presenter as Arc<dyn ModalPresenter>),
            filters: self.filters,
            config: self.config,
            initial_page: self.initial_page,
            sink: self.sink,
        }
    }
}

impl<U, T, V, P> GridBuilder<U, T, V, P> {
    /// Sets the display filter of a column.
    pub fn filter<F>(mut self, column: impl Into<String>, filter: F) -> Self
    where
        F: Fn(&RowRecord) -> String + Send + Sync + 'static,
    {
        self.filters.insert(column.into(), Arc::new(filter));
        self
    }

    /// Sets page-size and pager options.
    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the page the first reload requests.
    ///
    /// Defaults to 1.
    pub fn initial_page(mut self, page: u32) -> Self {
        self.initial_page = page;
        self
    }

    /// Sets where failed operations are reported.
    ///
    /// Defaults to [`LogSink`].
    pub fn error_sink<S: ErrorSink + 'static>(mut self, sink: Arc<S>) -> Self {
        self.sink = sink;
        self
    }
}

impl
    GridBuilder<
        Set<String>,
        Set<Arc<dyn Transport>>,
        Set<Arc<dyn GridView>>,
        Set<Arc<dyn ModalPresenter>>,
    >
{
    /// Builds the [`Grid`] and hands its event channel to the view.
    ///
    /// Nothing is fetched until the first [`Grid::reload`].
    pub fn build(self) -> Grid {
        Grid::from_parts(GridParts {
            url: self.url.0,
            filters: self.filters,
            config: self.config,
            initial_page: self.initial_page,
            transport: self.transport.0,
            view: self.view.0,
            presenter: self.presenter.0,
            sink: self.sink,
        })
    }
}
