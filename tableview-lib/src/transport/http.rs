//! `reqwest` implementation of [`Transport`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::multipart;
use serde_json::Value;
use url::Url;

use super::Params;
use super::Transport;
use crate::error::TransportError;
use crate::form::FormPayload;
use crate::form::PartValue;

/// HTTP transport backed by `reqwest`.
///
/// Cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use tableview_lib::transport::HttpTransport;
///
/// let transport = HttpTransport::builder()
///     .request_timeout(Duration::from_secs(10))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct HttpTransport {
    inner: Arc<HttpTransportInner>,
}

struct HttpTransportInner {
    http_client: Client,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Creates a transport with default settings.
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    /// Creates a new builder.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Returns the per-request timeout, if one is set.
    pub fn timeout(&self) -> Option<Duration> {
        self.inner.timeout
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, TransportError> {
        let request = match self.inner.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };

        let response = request.send().await.map_err(|err| match self.inner.timeout {
            Some(timeout) if err.is_timeout() => TransportError::Timeout(timeout),
            _ => TransportError::from(err),
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            Err(TransportError::http(status.as_u16(), message))
        }
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, TransportError> {
        let body = response.text().await?;
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(err) => Err(TransportError::parse_with_body(err.to_string(), body)),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str, query: &Params) -> Result<Value, TransportError> {
        let url = with_query(url, query)?;
        let response = self.send(self.inner.http_client.get(url)).await?;
        Self::read_json(response).await
    }

    async fn get_text(&self, url: &str, query: &Params) -> Result<String, TransportError> {
        let url = with_query(url, query)?;
        let response = self.send(self.inner.http_client.get(url)).await?;
        Ok(response.text().await?)
    }

    async fn post_multipart(
        &self,
        url: &str,
        payload: FormPayload,
    ) -> Result<Value, TransportError> {
        let url = Url::parse(url)?;
        let form = multipart_form(payload)?;
        let response = self
            .send(self.inner.http_client.post(url).multipart(form))
            .await?;
        Self::read_json(response).await
    }

    async fn post_form(&self, url: &str, fields: &Params) -> Result<(), TransportError> {
        let url = Url::parse(url)?;
        self.send(self.inner.http_client.post(url).form(fields))
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

fn with_query(url: &str, query: &Params) -> Result<Url, TransportError> {
    let mut url = Url::parse(url)?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

fn multipart_form(payload: FormPayload) -> Result<multipart::Form, TransportError> {
    let mut form = multipart::Form::new();

    for part in payload {
        form = match part.value {
            PartValue::Text(text) => form.text(part.name, text),
            PartValue::File(upload) => {
                let file = multipart::Part::bytes(upload.bytes)
                    .file_name(upload.file_name)
                    .mime_str(&upload.content_type)?;
                form.part(part.name, file)
            }
        };
    }

    Ok(form)
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`HttpTransport`].
#[derive(Default)]
pub struct HttpTransportBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    http_client: Option<Client>,
}

impl HttpTransportBuilder {
    /// Sets the timeout applied to every request.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// Ignored when a custom client is supplied.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the `User-Agent` header.
    ///
    /// Ignored when a custom client is supplied.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Uses a preconfigured HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the [`HttpTransport`].
    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                builder.build()?
            }
        };

        Ok(HttpTransport {
            inner: Arc::new(HttpTransportInner {
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FileUpload;

    #[test]
    fn test_builder_keeps_timeout() {
        let transport = HttpTransport::builder()
            .request_timeout(Duration::from_secs(3))
            .build()
            .unwrap();
        assert_eq!(transport.timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_multipart_form_accepts_files() {
        let mut payload = FormPayload::new();
        payload.push_text("name", "Ada");
        payload.push_file("avatar", FileUpload::new("a.png", vec![1, 2]));
        assert!(multipart_form(payload).is_ok());
    }

    #[test]
    fn test_multipart_form_rejects_bad_mime() {
        let mut payload = FormPayload::new();
        payload.push_file(
            "avatar",
            FileUpload::new("a.png", vec![1]).with_content_type("not a mime"),
        );
        assert!(multipart_form(payload).is_err());
    }

    #[test]
    fn test_with_query_appends_pairs() {
        let query = crate::transport::params([("page", "2"), ("q", "a b")]);
        let url = with_query("http://localhost/users/list/", &query).unwrap();
        assert_eq!(url.as_str(), "http://localhost/users/list/?page=2&q=a+b");

        let url = with_query("http://localhost/users/add/", &[]).unwrap();
        assert_eq!(url.query(), None);
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let transport = HttpTransport::new().unwrap();
        let err = transport.get_text("not a url", &[]).await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }
}
