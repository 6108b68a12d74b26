//! Typed, layered construction of [`crate::HttpSender`]/[`crate::RetryPolicy`]/
//! [`crate::LoggerOptions`] from explicit builder calls.
//!
//! Follows the same split as the rest of this crate's error handling: a
//! `ConfigError` enum for construction-time misconfiguration and a
//! builder that consumes itself field by field
//! (`#[must_use] pub fn with_*(mut self, ...) -> Self`).

use std::time::Duration;

use thiserror::Error;

use crate::retry::RetryPolicy;
use crate::sender::{HttpSender, SenderDefaults};

/// Error type for sender/retry-policy construction.
///
/// Distinct from [`crate::SenderError`]: this covers misconfiguration
/// caught while *building* a sender, not failures of an individual `send`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The default method string is not a recognized HTTP verb.
    #[error("invalid default method '{0}'")]
    InvalidMethod(String),

    /// A default header's name or value failed `http` validation.
    #[error("invalid default header '{name}': {reason}")]
    InvalidHeader {
        /// The header name as supplied by the caller.
        name: String,
        /// Why `http::HeaderName`/`HeaderValue` rejected it.
        reason: String,
    },
}

/// Builder over [`SenderDefaults`], consuming `self` field by field.
///
/// Construction-time only: once [`Self::build`] produces an [`HttpSender`],
/// its defaults are read-only for the sender's lifetime.
#[derive(Debug, Clone, Default)]
pub struct SenderBuilder {
    method: Option<http::Method>,
    headers: http::HeaderMap,
    timeout: Option<Duration>,
    max_retries: u32,
    retry_interval: Duration,
}

impl SenderBuilder {
    /// Starts from an empty builder: default method `POST`, no headers, no
    /// timeout, no retry convenience values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default HTTP method from a recognized verb string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMethod`] if `method` is not a
    /// recognized HTTP verb token.
    pub fn default_method(mut self, method: &str) -> Result<Self, ConfigError> {
        let parsed = http::Method::from_bytes(method.as_bytes())
            .map_err(|_| ConfigError::InvalidMethod(method.to_string()))?;
        self.method = Some(parsed);
        Ok(self)
    }

    /// Adds a default header, validating the name/value against `http`'s
    /// own rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHeader`] if `name` or `value` fails
    /// `http::HeaderName`/`HeaderValue` validation.
    pub fn default_header(mut self, name: &str, value: &str) -> Result<Self, ConfigError> {
        let header_name =
            http::HeaderName::try_from(name).map_err(|e| ConfigError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value =
            http::HeaderValue::try_from(value).map_err(|e| ConfigError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Sets the sender-wide default timeout.
    #[must_use]
    pub const fn default_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the convenience `max_retries`/`retry_interval` fields consumed
    /// by [`Self::build_with_retry`]. Has no effect on [`Self::build`]'s
    /// plain `HttpSender` — see `SenderDefaults`'s doc comment.
    #[must_use]
    pub const fn retry_convenience(mut self, max_retries: u32, retry_interval: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_interval = retry_interval;
        self
    }

    /// Builds the final [`SenderDefaults`], defaulting the method to
    /// `POST` if none was set.
    fn into_defaults(self) -> SenderDefaults {
        SenderDefaults {
            method: self.method.unwrap_or(http::Method::POST),
            headers: self.headers,
            timeout: self.timeout,
            max_retries: self.max_retries,
            retry_interval: self.retry_interval,
        }
    }

    /// Builds a base [`HttpSender`] with a fresh `reqwest::Client` transport.
    #[must_use]
    pub fn build(self) -> HttpSender {
        HttpSender::new(self.into_defaults())
    }

    /// Builds a base [`HttpSender`] and a [`RetryPolicy`] seeded from this
    /// builder's `max_retries`/`retry_interval` convenience fields, in one
    /// step, for callers who don't need custom retry rules beyond the
    /// count/delay.
    #[must_use]
    pub fn build_with_retry(self) -> (HttpSender, RetryPolicy) {
        let defaults = self.into_defaults();
        let policy = RetryPolicy::from_sender_defaults(&defaults);
        (HttpSender::new(defaults), policy)
    }
}

/// Builder over [`RetryPolicy`] for callers who prefer the `ConfigError`
/// path over [`RetryPolicy`]'s own infallible `with_*` methods — useful
/// when the count/delay originate from parsed, possibly-invalid external
/// input (a config file, CLI flags) rather than literals in code.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicyBuilder {
    count: u32,
    delay: Duration,
    backoff: bool,
    log: bool,
}

impl RetryPolicyBuilder {
    /// Starts from a policy with no retries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of additional attempts beyond the first.
    #[must_use]
    pub const fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Sets the base delay before the first retry.
    #[must_use]
    pub const fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Enables exponential backoff.
    #[must_use]
    pub const fn backoff(mut self, enabled: bool) -> Self {
        self.backoff = enabled;
        self
    }

    /// Enables `tracing` events for retries and the final outcome.
    #[must_use]
    pub const fn log(mut self, enabled: bool) -> Self {
        self.log = enabled;
        self
    }

    /// Builds the policy with the default predicate; chain
    /// [`RetryPolicy::on_status`]/[`RetryPolicy::on_server_errors`]/
    /// [`RetryPolicy::on_network_errors`] on the result to compose rules.
    #[must_use]
    pub fn build(self) -> RetryPolicy {
        let mut policy = RetryPolicy::new().with_count(self.count).with_delay(self.delay);
        if self.backoff {
            policy = policy.with_backoff();
        }
        if self.log {
            policy = policy.with_logger();
        }
        policy
    }
}
