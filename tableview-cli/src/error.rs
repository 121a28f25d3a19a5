//! CLI error type

use std::path::PathBuf;

use tableview_lib::error::Error;
use tableview_lib::error::TransportError;

/// Everything that ends a `tableview` run with a failure.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A grid, modal or form operation failed.
    #[error(transparent)]
    Grid(#[from] Error),

    /// The HTTP client could not be set up.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A failure the grid reported instead of returning.
    #[error("{0}")]
    Reported(String),

    /// The server kept the form open.
    #[error("{0}")]
    Rejected(String),

    /// Reading or creating a file failed.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Logging could not be set up.
    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    /// No log file was given and no cache directory exists.
    #[error("No cache directory available for the log file; pass --log-file")]
    NoLogDir,
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
