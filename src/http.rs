//! Transport abstraction: the thin HTTP layer the base [`crate::HttpSender`]
//! drives.
//!
//! Kept separate from [`crate::Request`]/[`crate::Response`] (the
//! sender-level contract) so the base sender can inject a mock transport in
//! tests without fabricating a full `reqwest::Client`.

use std::time::Duration;

use thiserror::Error;

/// A single wire-level HTTP request.
#[derive(Debug, Clone)]
pub struct WireRequest {
    /// HTTP method.
    pub method: http::Method,
    /// Target URL, including any query string.
    pub url: url::Url,
    /// Headers to send.
    pub headers: http::HeaderMap,
    /// Request body, if any.
    pub body: Option<Vec<u8>>,
    /// Per-call timeout, raced against the in-flight request.
    pub timeout: Option<Duration>,
}

/// A single wire-level HTTP response.
#[derive(Debug, Clone)]
pub struct WireResponse {
    /// HTTP status code.
    pub status: http::StatusCode,
    /// Response headers.
    pub headers: http::HeaderMap,
    /// Response body, fully buffered.
    pub body: Vec<u8>,
}

/// Error surfaced by a [`Transport`] implementation.
///
/// Distinct from [`crate::SenderError`]: this is the narrow vocabulary a
/// transport can raise; [`crate::HttpSender`] translates it into the
/// broader sender-level taxonomy.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The client refused to assemble a request descriptor from the given
    /// method/URL/headers/body (e.g. an unsupported URL scheme). Classified
    /// via `reqwest::Error::is_builder()`. Distinct from [`Self::Send`]:
    /// the request never reached the network.
    #[error("failed to build request: {0}")]
    Build(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The round-trip failed before a complete response was received.
    #[error("request failed: {0}")]
    Send(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Response headers arrived but the body could not be fully read.
    #[error("failed to read response body: {0}")]
    Read(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The timeout elapsed before headers returned.
    #[error("request timed out")]
    Timeout,
}

impl TransportError {
    /// True if the underlying `reqwest::Error` (if any) reports itself as a
    /// connect or a timeout failure — the structured half of the retry
    /// decorator's network-error classification.
    #[must_use]
    pub fn is_network(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Build(source) | Self::Send(source) | Self::Read(source) => source
                .downcast_ref::<reqwest::Error>()
                .is_some_and(|e| e.is_connect() || e.is_timeout()),
        }
    }
}

/// Abstraction over the HTTP transport, so [`crate::HttpSender`] can accept
/// an injected `reqwest::Client` or a test double instead of hard-coding
/// one concrete client.
pub trait Transport: Send + Sync {
    /// Sends a single request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on connection failure, body-read failure,
    /// or timeout.
    fn request(
        &self,
        req: WireRequest,
    ) -> impl std::future::Future<Output = Result<WireResponse, TransportError>> + Send;
}

/// Production transport backed by `reqwest::Client`.
///
/// A thin wrapper that inherits `reqwest`'s connection pooling; cheap to
/// clone since `reqwest::Client` is internally `Arc`-backed.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport wrapping a fresh default `reqwest::Client`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Wraps an existing, possibly customized, `reqwest::Client`.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    async fn request(&self, req: WireRequest) -> Result<WireResponse, TransportError> {
        let mut builder = self.inner.request(req.method, req.url.as_str());
        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = req.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else if e.is_builder() {
                TransportError::Build(Box::new(e))
            } else {
                TransportError::Send(Box::new(e))
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Read(Box::new(e)))?
            .to_vec();

        Ok(WireResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reqwest_transport_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReqwestTransport>();
    }

    #[test]
    fn debug_format_is_readable() {
        let transport = ReqwestTransport::new();
        let debug = format!("{transport:?}");
        assert!(debug.contains("ReqwestTransport"));
    }

    #[tokio::test]
    async fn request_to_unreachable_host_is_a_network_error() {
        let transport = ReqwestTransport::new();
        let url = url::Url::parse("http://127.0.0.1:1").unwrap();
        let req = WireRequest {
            method: http::Method::GET,
            url,
            headers: http::HeaderMap::new(),
            body: None,
            timeout: Some(Duration::from_millis(500)),
        };

        let err = transport.request(req).await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn non_http_scheme_is_a_build_error_not_a_network_error() {
        let transport = ReqwestTransport::new();
        let url = url::Url::parse("file:///etc/hosts").unwrap();
        let req = WireRequest {
            method: http::Method::GET,
            url,
            headers: http::HeaderMap::new(),
            body: None,
            timeout: None,
        };

        let err = transport.request(req).await.unwrap_err();
        assert!(matches!(err, TransportError::Build(_)));
        assert!(!err.is_network());
    }
}
