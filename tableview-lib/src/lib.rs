//! Paginated data-grid engine
//!
//! Drives a remote list endpoint family (`list/`, `add/`, `update/`,
//! `delete/`) from the client side: computes pager windows, reconciles page
//! state against the server, loads and submits modal forms, and renders
//! server-side validation errors back onto form fields.
//!
//! Markup, dialogs and HTTP are collaborators behind the [`grid::GridView`],
//! [`modal::ModalPresenter`] and [`transport::Transport`] traits.

pub mod config;
pub mod error;
pub mod form;
pub mod grid;
pub mod modal;
pub mod model;
pub mod pager;
pub mod report;
pub mod state;
pub mod transport;

pub use config::GridConfig;
pub use error::Error;
pub use error::TransportError;
pub use grid::Grid;
pub use grid::GridEvent;
pub use pager::compute_pager_window;
pub use pager::PagerViewModel;
pub use state::PageState;
