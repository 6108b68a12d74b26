//! Logger decorator: wraps any [`Sender`], emitting structured start/
//! success/failure `tracing` events with optional parameter hiding or
//! per-field masking.

use std::collections::HashSet;

use tokio_util::sync::CancellationToken;

use crate::error::SenderError;
use crate::mask::mask_fields;
use crate::params::Params;
use crate::request::{RequestOption, effective_method};
use crate::response::Response;
use crate::sender::Sender;

/// Privacy configuration for the logger decorator.
///
/// `hide_params` and `masked_fields` are mutually compatible; when both are
/// set, `hide_params` wins (the params field is omitted entirely, so there
/// is nothing left to mask).
#[derive(Debug, Clone, Default)]
pub struct LoggerOptions {
    /// Never include the params field in the start event.
    pub hide_params: bool,
    /// Field names (map keys or serde names) to redact when params are
    /// logged. Built once at construction and read-only thereafter.
    pub masked_fields: HashSet<String>,
}

impl LoggerOptions {
    /// No privacy restrictions: params are logged in full.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Never logs params.
    #[must_use]
    pub fn hide_params(mut self) -> Self {
        self.hide_params = true;
        self
    }

    /// Redacts the given field names wherever they appear in logged
    /// params.
    #[must_use]
    pub fn masked_fields(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.masked_fields
            .extend(names.into_iter().map(Into::into));
        self
    }
}

/// Wraps an inner [`Sender`], emitting one `tracing` "start" event before
/// delegating and one "success" or "failure" event after.
#[derive(Debug, Clone)]
pub struct LoggerDecorator<S> {
    inner: S,
    options: LoggerOptions,
}

impl<S> LoggerDecorator<S> {
    /// Wraps `inner`, applying `options`'s privacy rules to every call.
    #[must_use]
    pub const fn new(inner: S, options: LoggerOptions) -> Self {
        Self { inner, options }
    }

    /// Returns the configured options.
    #[must_use]
    pub const fn options(&self) -> &LoggerOptions {
        &self.options
    }

    /// The params value that would be logged for `params`, applying
    /// hide/mask privacy rules. `None` means "omit the field entirely"
    /// (hidden, or the payload has no loggable value).
    fn loggable_params(&self, params: &Params) -> Option<serde_json::Value> {
        if self.options.hide_params {
            return None;
        }
        let value = params.as_value()?;
        if self.options.masked_fields.is_empty() {
            Some(value)
        } else {
            Some(mask_fields(&value, &self.options.masked_fields))
        }
    }
}

impl<S: Sender> Sender for LoggerDecorator<S> {
    async fn send(
        &self,
        cancel: CancellationToken,
        url: &str,
        params: Params,
        opts: &[RequestOption],
    ) -> Result<Response, SenderError> {
        let method = effective_method(opts);

        match self.loggable_params(&params) {
            Some(value) => tracing::info!(url, %method, params = %value, "sending webhook"),
            None => tracing::info!(url, %method, "sending webhook"),
        }

        let start = std::time::Instant::now();
        let outcome = self.inner.send(cancel, url, params, opts).await;
        let duration = start.elapsed();

        match &outcome {
            Ok(response) => {
                tracing::info!(
                    url,
                    %method,
                    status = response.status.as_u16(),
                    is_successful = response.is_successful(),
                    duration_ms = duration.as_millis() as u64,
                    body_size = response.body.len(),
                    "webhook send succeeded"
                );
            }
            Err(err) => {
                tracing::warn!(
                    url,
                    %method,
                    duration_ms = duration.as_millis() as u64,
                    error = %err,
                    "webhook send failed"
                );
            }
        }

        outcome
    }
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
