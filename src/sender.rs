//! The [`Sender`] contract and its base HTTP-backed implementation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::SenderError;
use crate::http::{ReqwestTransport, Transport, TransportError, WireRequest, WireResponse};
use crate::params::Params;
use crate::request::{Request, RequestOption, RequestOptions};
use crate::response::Response;

/// The one polymorphic contract every decorator wraps: take a URL, a
/// payload, and per-call options, and produce a [`Response`] or a
/// classified [`SenderError`].
///
/// Implemented by [`HttpSender`] (the base, HTTP-backed implementation) and
/// by the `RetryDecorator`/`LoggerDecorator` wrappers, which forward to an
/// inner `Sender` and add their own behavior without changing the contract.
pub trait Sender: Send + Sync {
    /// Sends `params` to `url`, merging `opts` over this sender's defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError`] if the URL or method is invalid, the params
    /// cannot be marshalled, the round-trip fails, or the cancellation
    /// token fires before completion.
    fn send(
        &self,
        cancel: CancellationToken,
        url: &str,
        params: Params,
        opts: &[RequestOption],
    ) -> impl std::future::Future<Output = Result<Response, SenderError>> + Send;
}

/// Read-only configuration shared by every call to an [`HttpSender`].
///
/// Built once at construction (see `crate::config::SenderBuilder`) and
/// never mutated afterward; safe to share across concurrently-calling
/// threads via the `Arc` the sender holds internally.
#[derive(Debug, Clone)]
pub struct SenderDefaults {
    /// Default HTTP method used when no per-request `Method` option is given.
    pub method: http::Method,
    /// Default headers, applied before per-request overrides.
    pub headers: http::HeaderMap,
    /// Default timeout, overridden by a per-request `Timeout` option.
    pub timeout: Option<Duration>,
    /// Convenience retry knobs. **Not executed by [`HttpSender::send`]** —
    /// the base sender performs exactly one attempt per call. These exist
    /// only so a caller can build a `RetryDecorator` from the same
    /// defaults in one step (see `crate::config::SenderBuilder::build_with_retry`)
    /// without duplicating the retry loop here.
    pub max_retries: u32,
    /// Convenience retry-interval knob; see `max_retries`.
    pub retry_interval: Duration,
}

impl Default for SenderDefaults {
    fn default() -> Self {
        Self {
            method: http::Method::POST,
            headers: http::HeaderMap::new(),
            timeout: None,
            max_retries: 0,
            retry_interval: Duration::from_secs(0),
        }
    }
}

/// The base, HTTP-backed [`Sender`] implementation.
///
/// Owns an injected [`Transport`] (a `reqwest::Client` by default) and a
/// read-only set of [`SenderDefaults`]. Every `send` call merges defaults
/// with per-request options, marshals `params` per the method class,
/// performs exactly one HTTP round-trip, and buffers the full response
/// body before returning.
#[derive(Debug, Clone)]
pub struct HttpSender<T = ReqwestTransport> {
    transport: T,
    defaults: Arc<SenderDefaults>,
}

impl HttpSender<ReqwestTransport> {
    /// Creates a base sender with the given defaults, using a fresh
    /// `reqwest::Client` as its transport.
    #[must_use]
    pub fn new(defaults: SenderDefaults) -> Self {
        Self {
            transport: ReqwestTransport::new(),
            defaults: Arc::new(defaults),
        }
    }
}

impl<T> HttpSender<T> {
    /// Creates a base sender with an explicit transport — the injection
    /// point tests use to swap in a mock without a real socket.
    #[must_use]
    pub fn with_transport(transport: T, defaults: SenderDefaults) -> Self {
        Self {
            transport,
            defaults: Arc::new(defaults),
        }
    }

    /// Returns the sender's read-only defaults.
    #[must_use]
    pub fn defaults(&self) -> &SenderDefaults {
        &self.defaults
    }
}

impl<T: Transport> HttpSender<T> {
    fn merge_options(&self, opts: &[RequestOption]) -> RequestOptions {
        let mut merged = RequestOptions {
            method: self.defaults.method.clone(),
            headers: self.defaults.headers.clone(),
            timeout: self.defaults.timeout,
        };
        for opt in opts {
            opt.apply(&mut merged);
        }
        merged
    }

    fn build_request(
        &self,
        url: &str,
        params: &Params,
        merged: RequestOptions,
    ) -> Result<Request, SenderError> {
        if url.is_empty() {
            return Err(SenderError::InvalidUrl("URL must not be empty".to_string()));
        }

        let is_body_bearing = !matches!(
            merged.method,
            http::Method::GET | http::Method::HEAD | http::Method::DELETE
        );

        let (url, body, headers) = if is_body_bearing {
            let url =
                url::Url::parse(url).map_err(|e| SenderError::InvalidUrl(e.to_string()))?;
            let body = if params.is_none() {
                None
            } else {
                Some(params.to_json_bytes()?)
            };
            let mut headers = merged.headers;
            if body.is_some() && !headers.contains_key(http::header::CONTENT_TYPE) {
                headers.insert(
                    http::header::CONTENT_TYPE,
                    http::HeaderValue::from_static("application/json"),
                );
            }
            (url, body, headers)
        } else {
            let mut url =
                url::Url::parse(url).map_err(|e| SenderError::InvalidUrl(e.to_string()))?;
            let pairs = params.to_query_pairs()?;
            if !pairs.is_empty() {
                let mut query = url.query_pairs_mut();
                for (key, value) in &pairs {
                    query.append_pair(key, value);
                }
            }
            (url, None, merged.headers)
        };

        Ok(Request {
            url,
            method: merged.method,
            headers,
            timeout: merged.timeout,
            body,
        })
    }
}

impl<T: Transport> Sender for HttpSender<T> {
    async fn send(
        &self,
        cancel: CancellationToken,
        url: &str,
        params: Params,
        opts: &[RequestOption],
    ) -> Result<Response, SenderError> {
        let merged = self.merge_options(opts);
        let request = self.build_request(url, &params, merged)?;

        let wire = WireRequest {
            method: request.method.clone(),
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
            timeout: request.timeout,
        };

        let start = Instant::now();
        let outcome = match request.timeout {
            Some(timeout) => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(SenderError::Canceled { last_response: None, source: None }),
                    result = tokio::time::timeout(timeout, self.transport.request(wire)) => {
                        match result {
                            Ok(inner) => inner,
                            Err(_) => return Err(SenderError::ResponseTimeout),
                        }
                    }
                }
            }
            None => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(SenderError::Canceled { last_response: None, source: None }),
                    result = self.transport.request(wire) => result,
                }
            }
        };

        let duration = start.elapsed();

        match outcome {
            Ok(wire_response) => Ok(Response::new(
                wire_response.status,
                wire_response.headers,
                wire_response.body,
                duration,
                request,
            )),
            Err(TransportError::Timeout) => Err(SenderError::ResponseTimeout),
            Err(TransportError::Build(source)) => {
                Err(SenderError::CreateRequest(source.to_string()))
            }
            Err(err @ TransportError::Send(_)) if err.is_network() => {
                Err(SenderError::NetworkError(err.to_string()))
            }
            Err(TransportError::Send(source)) => Err(SenderError::SendRequest { source }),
            Err(TransportError::Read(source)) => Err(SenderError::ReadResponse { source }),
        }
    }
}
