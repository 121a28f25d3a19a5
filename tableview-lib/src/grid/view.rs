//! What the grid hands to whatever draws it.

use serde::Serialize;

use super::event::GridEvents;
use crate::model::RecordId;
use crate::pager::PagerViewModel;

/// One column of the table header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header text.
    pub header: String,
    /// What the column's cells hold.
    pub kind: ColumnKind,
}

/// Content source of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// Cells show the row's value for this key.
    Field(String),
    /// Cells hold the row's edit and delete buttons.
    Buttons,
}

impl Column {
    /// A column showing the row value stored under `key`.
    pub fn field(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            kind: ColumnKind::Field(key.into()),
        }
    }

    /// The action button column.
    pub fn buttons(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            kind: ColumnKind::Buttons,
        }
    }

    /// Returns the data key for field columns.
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            ColumnKind::Field(key) => Some(key),
            ColumnKind::Buttons => None,
        }
    }
}

/// A rendered table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    /// Display text.
    Text(String),
    /// Edit and delete controls for the row with this id.
    Actions(RecordId),
}

/// A rendered table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    /// The row's record id.
    pub id: RecordId,
    /// Cells in column order.
    pub cells: Vec<Cell>,
}

impl RenderedRow {
    /// Returns the display texts of the row, skipping action cells.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().filter_map(|cell| match cell {
            Cell::Text(text) => Some(text.as_str()),
            Cell::Actions(_) => None,
        })
    }
}

/// One entry of the page-size selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSizeOption {
    /// Rows per page.
    pub size: u32,
    /// `true` for the size currently in use.
    pub active: bool,
}

/// Everything needed to draw the table body, pager and page-size selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridViewModel {
    /// Table rows.
    pub rows: Vec<RenderedRow>,
    /// Pager controls.
    pub pager: PagerViewModel,
    /// Page-size choices.
    pub page_sizes: Vec<PageSizeOption>,
    /// Number of rows across all pages, when known.
    pub total_rows: Option<u64>,
}

impl GridViewModel {
    /// Returns the active page size, if it is one of the offered choices.
    pub fn active_page_size(&self) -> Option<u32> {
        self.page_sizes
            .iter()
            .find(|option| option.active)
            .map(|option| option.size)
    }
}

/// The table the grid controls.
pub trait GridView: Send + Sync {
    /// Returns the header mapping. Read once when the grid is built.
    fn columns(&self) -> Vec<Column>;

    /// Replaces the table body, pager and page-size selector.
    fn render(&self, model: &GridViewModel);

    /// Receives the event channel the view feeds user interactions into.
    ///
    /// Called exactly once, when the grid is built.
    fn attach(&self, events: GridEvents) {
        let _ = events;
    }
}
