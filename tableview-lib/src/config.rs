//! Grid configuration

use serde::Deserialize;
use serde::Serialize;

/// Configuration for paging behaviour of a [`Grid`](crate::Grid).
///
/// # Example
///
/// ```
/// use tableview_lib::GridConfig;
///
/// let config = GridConfig::default()
///     .with_default_page_size(25)
///     .with_page_size_options([25, 50, 100])
///     .with_window_radius(2);
///
/// assert_eq!(config.default_page_size, 25);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Rows requested per page before the user picks another size.
    ///
    /// Default: 10
    pub default_page_size: u32,

    /// Choices offered by the page-size selector.
    ///
    /// Default: 10, 25, 50, 100
    pub page_size_options: Vec<u32>,

    /// Number of page links shown on each side of the current page.
    ///
    /// Default: 4
    pub window_radius: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            page_size_options: vec![10, 25, 50, 100],
            window_radius: crate::pager::DEFAULT_WINDOW_RADIUS,
        }
    }
}

impl GridConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial page size. Zero is raised to 1.
    pub fn with_default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size.max(1);
        self
    }

    /// Sets the page-size choices. Zero entries are dropped.
    pub fn with_page_size_options(mut self, options: impl IntoIterator<Item = u32>) -> Self {
        self.page_size_options = options.into_iter().filter(|size| *size > 0).collect();
        self
    }

    /// Sets the pager window radius.
    pub fn with_window_radius(mut self, radius: u32) -> Self {
        self.window_radius = radius;
        self
    }
}
