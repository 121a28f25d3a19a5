//! Error types

mod transport;

pub use transport::*;

/// Errors returned by grid, modal and form operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP exchange failed or returned something unusable.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A submission on the same form is still outstanding.
    #[error("Form submission already in progress")]
    SubmissionInFlight,

    /// The modal has no form bound to it.
    #[error("No form bound to modal '{title}'")]
    NoFormBound {
        /// Title of the modal.
        title: String,
    },

    /// The form has no field with this name.
    #[error("Form has no field named '{name}'")]
    UnknownField {
        /// The requested field name.
        name: String,
    },

    /// The field exists but cannot take the requested kind of value.
    #[error("Field '{name}' does not accept {expected}")]
    InvalidField {
        /// The field name.
        name: String,
        /// What the caller tried to put into it.
        expected: &'static str,
    },
}

impl Error {
    /// Creates a new unknown field error.
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField { name: name.into() }
    }

    /// Creates a new invalid field error.
    pub fn invalid_field(name: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidField {
            name: name.into(),
            expected,
        }
    }

    /// Returns the transport error, if this is one.
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}
