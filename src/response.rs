//! Response model.

use std::time::Duration;

use crate::request::Request;

/// An HTTP response received from a server.
///
/// The body is fully buffered into memory; callers never see a streaming
/// body. Carries a back-pointer to the [`Request`] that actually went on
/// the wire, after option merging, for diagnostics.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: http::StatusCode,
    /// Response headers.
    pub headers: http::HeaderMap,
    /// Response body, fully buffered.
    pub body: Vec<u8>,
    /// Elapsed wall time between dispatch and full body read.
    pub duration: Duration,
    /// The request that produced this response.
    pub request: Request,
}

impl Response {
    /// Creates a new response.
    #[must_use]
    pub const fn new(
        status: http::StatusCode,
        headers: http::HeaderMap,
        body: Vec<u8>,
        duration: Duration,
        request: Request,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            duration,
            request,
        }
    }

    /// Returns true if the status code indicates success (`200..=299`).
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as a UTF-8 string, if valid.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> Request {
        Request {
            url: url::Url::parse("http://svc/wh").unwrap(),
            method: http::Method::POST,
            headers: http::HeaderMap::new(),
            timeout: None,
            body: None,
        }
    }

    #[test]
    fn is_successful_covers_the_2xx_range() {
        let ok = Response::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            Vec::new(),
            Duration::from_millis(0),
            request(),
        );
        let not_found = Response::new(
            http::StatusCode::NOT_FOUND,
            http::HeaderMap::new(),
            Vec::new(),
            Duration::from_millis(0),
            request(),
        );

        assert!(ok.is_successful());
        assert!(!not_found.is_successful());
    }

    #[test]
    fn body_text_rejects_invalid_utf8() {
        let response = Response::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            vec![0xFF, 0xFE],
            Duration::from_millis(0),
            request(),
        );

        assert_eq!(response.body_text(), None);
    }
}
