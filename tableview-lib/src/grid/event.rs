//! User interactions delivered to the grid.

use tokio::sync::mpsc;

use crate::model::RecordId;

/// Which of the grid's two modals an event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormTarget {
    /// The "New Record" modal.
    Create,
    /// The "Edit Record" modal.
    Edit,
}

/// A user interaction with the table, its pager or its modals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    /// A numbered or first/previous/next/last link was activated.
    PageLinkClicked(u32),
    /// A different page size was chosen.
    PageSizeChanged(u32),
    /// The "new" button was pressed.
    NewRecord,
    /// A row's edit button was pressed.
    EditRecord(RecordId),
    /// A row's delete button was pressed.
    DeleteRecord(RecordId),
    /// A modal's submit button was pressed.
    SubmitForm(FormTarget),
}

/// Sending half of a grid's event channel.
///
/// A single instance is handed to the view when the grid is built; every
/// control in the table feeds into it.
#[derive(Debug, Clone)]
pub struct GridEvents {
    tx: mpsc::UnboundedSender<GridEvent>,
}

impl GridEvents {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<GridEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Delivers `event`. Returns `false` once the grid is gone.
    pub fn send(&self, event: GridEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}
