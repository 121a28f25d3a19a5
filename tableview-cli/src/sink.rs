//! Error sink that remembers failures for the exit status.

use std::sync::Mutex;

use tableview_lib::error::Error;
use tableview_lib::report::ErrorSink;
use tableview_lib::report::GridOperation;
use tableview_lib::report::LogSink;

/// Logs every failure and keeps the latest one.
#[derive(Default)]
pub struct ExitSink {
    last: Mutex<Option<String>>,
}

impl ExitSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the latest failure, if any.
    pub fn take(&self) -> Option<String> {
        self.last.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}

impl ErrorSink for ExitSink {
    fn report(&self, operation: GridOperation, error: &Error) {
        LogSink.report(operation, error);
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) =
            Some(format!("Failed to {}: {}", operation, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_latest_failure() {
        let sink = ExitSink::new();
        sink.report(GridOperation::Reload, &Error::unknown_field("a"));
        sink.report(GridOperation::Delete, &Error::SubmissionInFlight);

        assert_eq!(
            sink.take().as_deref(),
            Some("Failed to delete: Form submission already in progress")
        );
        assert_eq!(sink.take(), None);
    }
}
