//! HTTP collaborator.
//!
//! The grid and the modal forms only ever need four kinds of exchange with
//! the server, captured by [`Transport`]. [`HttpTransport`] implements it on
//! top of `reqwest`; tests and embedders can supply their own.

mod http;

pub use http::HttpTransport;
pub use http::HttpTransportBuilder;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::form::FormPayload;

/// Query string or urlencoded body as ordered key/value pairs.
pub type Params = [(String, String)];

/// Issues the requests the grid engine needs.
///
/// Implementations must map any non-2xx status to
/// [`TransportError::Http`].
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use tableview_lib::transport::{Params, Transport};
///
/// struct Offline;
///
/// #[async_trait]
/// impl Transport for Offline {
///     async fn get_json(&self, _: &str, _: &Params) -> Result<Value, TransportError> {
///         Err(TransportError::http(503, "offline"))
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET url?query`, decoding the body as JSON.
    async fn get_json(&self, url: &str, query: &Params) -> Result<Value, TransportError>;

    /// `GET url?query`, returning the body as text (form fragments).
    async fn get_text(&self, url: &str, query: &Params) -> Result<String, TransportError>;

    /// `POST url` with a multipart body, decoding the response as JSON.
    async fn post_multipart(&self, url: &str, payload: FormPayload)
    -> Result<Value, TransportError>;

    /// `POST url` with an urlencoded body. Any 2xx response is success.
    async fn post_form(&self, url: &str, fields: &Params) -> Result<(), TransportError>;
}

/// Turns borrowed pairs into the owned form [`Transport`] takes.
pub fn params<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Vec<(String, String)>
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}
