//! Error types for the webhook sender.

use thiserror::Error;

use crate::response::Response;

/// Error type for sender operations.
///
/// Each variant is a sentinel the caller can match on to classify a failure;
/// see the retry decorator for how these feed into retry predicates.
#[derive(Debug, Error)]
pub enum SenderError {
    /// The target URL was empty or failed to parse.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The configured or requested HTTP method is not a recognized verb.
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// The params payload could not be rendered to JSON or to query pairs.
    #[error("failed to marshal params: {0}")]
    MarshalParams(String),

    /// The transport refused to assemble a request descriptor (e.g. a URL
    /// scheme the client doesn't support). Raised via
    /// `reqwest::Error::is_builder()`, surfaced before any network I/O.
    #[error("failed to create request: {0}")]
    CreateRequest(String),

    /// The HTTP round-trip failed before a complete response was received.
    #[error("request failed: {source}")]
    SendRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Response headers arrived but the body could not be fully read.
    #[error("failed to read response body: {source}")]
    ReadResponse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The effective deadline fired before headers returned.
    #[error("request timed out")]
    ResponseTimeout,

    /// A transport-layer failure classified as transient by a lower layer
    /// (used as a retry-classification marker rather than raised directly
    /// by the base sender).
    #[error("network error: {0}")]
    NetworkError(String),

    /// The caller's cancellation token fired before the operation completed.
    ///
    /// `last_response` carries the response produced by the most recent
    /// attempt, if one completed before cancellation won the race (e.g.
    /// cancellation during a retry wait that follows a completed attempt).
    /// `source` carries the error from that same attempt, if it failed
    /// rather than producing a response.
    #[error("operation canceled")]
    Canceled {
        last_response: Option<Box<Response>>,
        #[source]
        source: Option<Box<SenderError>>,
    },
}

impl SenderError {
    /// The response from the last attempt, if one produced one before the
    /// error was raised. A response and an error are not mutually
    /// exclusive: a variant can carry both.
    #[must_use]
    pub fn last_response(&self) -> Option<&Response> {
        match self {
            Self::Canceled { last_response, .. } => last_response.as_deref(),
            _ => None,
        }
    }

    /// True if this error is a cancellation.
    #[must_use]
    pub const fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled { .. })
    }

    /// Wraps this error as the cause of a cancellation with no associated
    /// response, used by the retry decorator when the cancellation token
    /// wins the race against an in-flight attempt.
    #[must_use]
    pub fn into_canceled(self) -> Self {
        Self::Canceled {
            last_response: None,
            source: Some(Box::new(self)),
        }
    }

    /// Builds a cancellation error carrying the response from the attempt
    /// that completed just before cancellation won the race during a retry
    /// wait.
    #[must_use]
    pub fn canceled_after_response(response: Response) -> Self {
        Self::Canceled {
            last_response: Some(Box::new(response)),
            source: None,
        }
    }

    /// Returns true if the error's string form matches one of the
    /// last-resort network-error heuristics documented in the retry
    /// decorator. Kept separate from [`Self::NetworkError`] because it
    /// inspects `Display` output rather than structured state, and is only
    /// meant as a fallback for transports that don't expose `reqwest`'s
    /// structured `is_connect`/`is_timeout` predicates.
    #[must_use]
    pub fn matches_network_error_heuristic(&self) -> bool {
        const NEEDLES: &[&str] = &[
            "connection refused",
            "timeout",
            "deadline exceeded",
            "reset by peer",
            "connection closed",
        ];
        let text = self.to_string().to_lowercase();
        NEEDLES.iter().any(|needle| text.contains(needle))
    }

    /// True for the deadline-exceeded classification the default retry
    /// predicate excludes (a context/token deadline is not itself grounds
    /// for a retry — it's a sibling of cancellation in the base sender,
    /// and the caller's own timeout choice should not be second-guessed).
    #[must_use]
    pub const fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::ResponseTimeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canceled_without_response_has_no_last_response() {
        let err = SenderError::ResponseTimeout.into_canceled();
        assert!(err.is_canceled());
        assert!(err.last_response().is_none());
    }

    #[test]
    fn matches_network_error_heuristic_on_display_text() {
        let err = SenderError::NetworkError("connection refused by peer".to_string());
        assert!(err.matches_network_error_heuristic());
    }

    #[test]
    fn non_network_error_does_not_match_heuristic() {
        let err = SenderError::InvalidUrl("empty".to_string());
        assert!(!err.matches_network_error_heuristic());
    }
}
