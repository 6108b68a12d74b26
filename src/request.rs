//! Request model and per-call option merging.

use std::time::Duration;

use crate::error::SenderError;

/// An HTTP request, immutable once constructed.
///
/// Built by a [`crate::Sender`] after merging its defaults with the
/// per-call [`RequestOption`]s and marshalling `params` into either a body
/// or a query string. Never constructed directly by callers.
#[derive(Debug, Clone)]
pub struct Request {
    /// Target URL, including any query string appended for non-body methods.
    pub url: url::Url,
    /// Effective HTTP method.
    pub method: http::Method,
    /// Effective headers, defaults merged with per-request overrides.
    pub headers: http::HeaderMap,
    /// Effective timeout, if any.
    pub timeout: Option<Duration>,
    /// Request body, present only for body-bearing methods with non-empty params.
    pub body: Option<Vec<u8>>,
}

/// Scratch value mutated in place by [`RequestOption`]s in the order given.
///
/// Exists so decorators can discover the effective method (or other
/// overrides) without depending on the base sender's internals — see
/// [`effective_method`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: http::Method,
    pub headers: http::HeaderMap,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Creates a scratch value seeded with the given default method and no
    /// headers or timeout.
    #[must_use]
    pub fn with_default_method(method: http::Method) -> Self {
        Self {
            method,
            headers: http::HeaderMap::new(),
            timeout: None,
        }
    }
}

/// A single per-request override, applied in the order the caller lists
/// them. Later options override earlier ones on conflicting keys.
#[derive(Debug, Clone)]
pub enum RequestOption {
    /// Overrides the HTTP method.
    Method(http::Method),
    /// Adds or overrides a single header.
    Header(http::HeaderName, http::HeaderValue),
    /// Merges a bulk header map; per-key, these override earlier headers.
    Headers(http::HeaderMap),
    /// Overrides the per-call timeout.
    Timeout(Duration),
}

impl RequestOption {
    /// Parses `raw` as an HTTP verb and builds a [`Self::Method`] option.
    ///
    /// The `Method(http::Method)` variant is itself infallible (an
    /// `http::Method` is already a recognized verb by construction); this
    /// is the fallible entry point for callers holding a raw string, and
    /// is where `SenderError::InvalidMethod` is actually raised.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::InvalidMethod`] if `raw` is not a valid HTTP
    /// method token.
    pub fn method(raw: &str) -> Result<Self, SenderError> {
        http::Method::from_bytes(raw.as_bytes())
            .map(Self::Method)
            .map_err(|_| SenderError::InvalidMethod(raw.to_string()))
    }

    /// Applies this option to a scratch [`RequestOptions`] value.
    pub fn apply(&self, target: &mut RequestOptions) {
        match self {
            Self::Method(method) => target.method = method.clone(),
            Self::Header(name, value) => {
                target.headers.insert(name.clone(), value.clone());
            }
            Self::Headers(headers) => {
                for (name, value) in headers {
                    target.headers.insert(name.clone(), value.clone());
                }
            }
            Self::Timeout(timeout) => target.timeout = Some(*timeout),
        }
    }
}

/// Constructs a scratch [`RequestOptions`] defaulting to `POST`, applies
/// `opts` in order, and reads back the resulting method.
///
/// Used by the logger and retry decorators to learn the effective method
/// for an outgoing call without depending on the base sender's option
/// merging.
#[must_use]
pub fn effective_method(opts: &[RequestOption]) -> http::Method {
    let mut scratch = RequestOptions::with_default_method(http::Method::POST);
    for opt in opts {
        opt.apply(&mut scratch);
    }
    scratch.method
}
