//! Error reporting.
//!
//! Grid operations triggered from user events have no caller to return an
//! error to. They report it to an [`ErrorSink`] once and carry on.

use log::error;

use crate::error::Error;

/// The grid operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridOperation {
    /// Fetching a page of rows.
    Reload,
    /// Deleting a row.
    Delete,
    /// Opening the create modal.
    OpenCreate,
    /// Opening the edit modal.
    OpenEdit,
    /// Submitting a modal form.
    Submit,
}

impl std::fmt::Display for GridOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Reload => "reload",
            Self::Delete => "delete",
            Self::OpenCreate => "open create form",
            Self::OpenEdit => "open edit form",
            Self::Submit => "submit",
        };
        f.write_str(name)
    }
}

/// Receives failures of grid operations.
pub trait ErrorSink: Send + Sync {
    /// Called exactly once per failed operation.
    fn report(&self, operation: GridOperation, error: &Error);
}

/// Writes failures to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&self, operation: GridOperation, error: &Error) {
        match error.as_transport().and_then(|err| err.status_code()) {
            Some(status) => error!("Grid {} failed with HTTP {}: {}", operation, status, error),
            None => error!("Grid {} failed: {}", operation, error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_display() {
        assert_eq!(GridOperation::Reload.to_string(), "reload");
        assert_eq!(GridOperation::OpenEdit.to_string(), "open edit form");
    }
}
