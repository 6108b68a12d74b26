//! webhook-sender: a reusable outbound webhook delivery client.
//!
//! Sends one-shot HTTP requests to arbitrary third-party endpoints with
//! pluggable retry, observability, and request-shaping behavior. The
//! [`Sender`] trait is the single polymorphic contract; [`HttpSender`] is
//! the base, HTTP-backed implementation, and [`RetryDecorator`]/
//! [`LoggerDecorator`] wrap any `Sender` to add retry and structured
//! logging without changing the contract.
//!
//! ```no_run
//! use std::time::Duration;
//! use webhook_sender::{
//!     HttpSender, LoggerDecorator, LoggerOptions, Params, RetryDecorator, RetryPolicy, Sender,
//!     SenderDefaults,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let base = HttpSender::new(SenderDefaults::default());
//! let logged = LoggerDecorator::new(base, LoggerOptions::new().masked_fields(["api_key"]));
//! let policy = RetryPolicy::new()
//!     .with_count(3)
//!     .with_delay(Duration::from_millis(100))
//!     .with_backoff()
//!     .on_server_errors();
//! let sender = RetryDecorator::new(logged, policy);
//!
//! let mut params = serde_json::Map::new();
//! params.insert("event".to_string(), serde_json::json!("user.created"));
//!
//! let response = sender
//!     .send(
//!         CancellationToken::new(),
//!         "https://example.com/webhook",
//!         Params::Map(params),
//!         &[],
//!     )
//!     .await?;
//! assert!(response.is_successful());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod mask;
pub mod params;
pub mod request;
pub mod response;
pub mod retry;
pub mod sender;
pub mod time;

pub use config::{ConfigError, RetryPolicyBuilder, SenderBuilder};
pub use error::SenderError;
pub use http::{ReqwestTransport, Transport, TransportError, WireRequest, WireResponse};
pub use logger::{LoggerDecorator, LoggerOptions};
pub use params::Params;
pub use request::{Request, RequestOption, RequestOptions, effective_method};
pub use response::Response;
pub use retry::{RetryDecorator, RetryPolicy, RetryPredicate};
pub use sender::{HttpSender, Sender, SenderDefaults};

#[cfg(test)]
#[path = "scenario_tests.rs"]
mod scenario_tests;
