//! Retry decorator: wraps any [`Sender`] with a retry state machine driven
//! by a pluggable, compositional predicate and an optional backoff
//! schedule.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::SenderError;
use crate::params::Params;
use crate::request::RequestOption;
use crate::response::Response;
use crate::sender::{Sender, SenderDefaults};
use crate::time::{Sleeper, TokioSleeper};

/// A pure function deciding whether a completed attempt should be retried.
///
/// Exactly one of `resp`/`err` is ever `Some`: an attempt either produced a
/// [`Response`] (possibly a non-2xx one) or failed with a [`SenderError`].
pub type RetryPredicate = Arc<dyn Fn(Option<&Response>, Option<&SenderError>) -> bool + Send + Sync>;

/// The default predicate: retry iff the attempt failed with an error that
/// is neither a cancellation nor a deadline-exceeded classification.
fn default_predicate() -> RetryPredicate {
    Arc::new(|_resp, err| err.is_some_and(|e| !e.is_canceled() && !e.is_deadline_exceeded()))
}

/// Retry configuration: attempt budget, delay schedule, and the
/// compositional retry predicate.
///
/// Built fluently, in the same `with_*`/rule-builder style as the base
/// sender's option types: each rule-adding method ORs a new rule onto
/// whatever predicate the policy already carries.
#[derive(Clone)]
pub struct RetryPolicy {
    /// Maximum number of *additional* attempts beyond the first.
    pub count: u32,
    /// Base delay before the first retry.
    pub delay: Duration,
    /// When true, each subsequent delay doubles the previous one.
    pub backoff: bool,
    /// When true, emits `tracing` events for each retry and the final
    /// outcome. The ambient `tracing` dispatcher plays the role of the
    /// spec's injectable "logger handle" — there is no separate logger
    /// value to pass in.
    pub log: bool,
    predicate: RetryPredicate,
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("count", &self.count)
            .field("delay", &self.delay)
            .field("backoff", &self.backoff)
            .field("log", &self.log)
            .field("predicate", &"<fn>")
            .finish()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            count: 0,
            delay: Duration::from_millis(0),
            backoff: false,
            log: false,
            predicate: default_predicate(),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with no retries and the default predicate — the
    /// same starting point as [`Self::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a policy from a base sender's convenience `max_retries`/
    /// `retry_interval` fields, per the construction-time wiring described
    /// in `SenderDefaults`'s doc comment.
    #[must_use]
    pub fn from_sender_defaults(defaults: &SenderDefaults) -> Self {
        Self::new()
            .with_count(defaults.max_retries)
            .with_delay(defaults.retry_interval)
    }

    /// Sets the number of additional attempts beyond the first.
    #[must_use]
    pub const fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Sets the base delay before the first retry.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Enables exponential backoff: `delay(i+1) = 2 * delay(i)`.
    #[must_use]
    pub const fn with_backoff(mut self) -> Self {
        self.backoff = true;
        self
    }

    /// Enables `tracing` events for retry entries and the final outcome.
    #[must_use]
    pub const fn with_logger(mut self) -> Self {
        self.log = true;
        self
    }

    /// ORs a rule that retries when the response carries one of `codes`.
    #[must_use]
    pub fn on_status(self, codes: impl IntoIterator<Item = u16>) -> Self {
        let codes: HashSet<u16> = codes.into_iter().collect();
        self.or_with(move |resp, _err| resp.is_some_and(|r| codes.contains(&r.status.as_u16())))
    }

    /// ORs a rule that retries on any `5xx` response.
    #[must_use]
    pub fn on_server_errors(self) -> Self {
        self.or_with(|resp, _err| resp.is_some_and(|r| r.status.is_server_error()))
    }

    /// ORs a rule that retries on network-classified errors: the crate's
    /// own [`SenderError::NetworkError`] marker, a deadline-exceeded
    /// classification, or the string-matching fallback in
    /// [`SenderError::matches_network_error_heuristic`].
    #[must_use]
    pub fn on_network_errors(self) -> Self {
        self.or_with(|_resp, err| {
            err.is_some_and(|e| {
                matches!(e, SenderError::NetworkError(_))
                    || e.is_deadline_exceeded()
                    || e.matches_network_error_heuristic()
            })
        })
    }

    /// ORs `rule` onto the predicate built so far: `P'(resp, err) =
    /// P(resp, err) OR rule(resp, err)`.
    fn or_with<F>(mut self, rule: F) -> Self
    where
        F: Fn(Option<&Response>, Option<&SenderError>) -> bool + Send + Sync + 'static,
    {
        let previous = self.predicate.clone();
        self.predicate = Arc::new(move |resp, err| previous(resp, err) || rule(resp, err));
        self
    }

    fn should_retry(&self, resp: Option<&Response>, err: Option<&SenderError>) -> bool {
        (self.predicate)(resp, err)
    }

    /// `delay(0) = base`; `delay(i+1) = 2 * delay(i)` when backoff is
    /// enabled, `delay(i)` unchanged otherwise. Saturates rather than
    /// overflowing for pathologically large `i`.
    fn delay_for(&self, i: u32) -> Duration {
        if self.backoff {
            let factor = 2u32.checked_pow(i).unwrap_or(u32::MAX);
            self.delay.saturating_mul(factor)
        } else {
            self.delay
        }
    }
}

/// Wraps an inner [`Sender`], adding a retry state machine: on each
/// attempt's outcome, either terminate (success, budget exhausted,
/// predicate says no, or cancellation) or wait out the delay schedule and
/// attempt again.
///
/// Generic over the sleeper so tests can swap in
/// [`crate::time::InstantSleeper`] and assert on attempt counts without
/// waiting out real delays.
#[derive(Clone)]
pub struct RetryDecorator<S, SL = TokioSleeper> {
    inner: S,
    policy: RetryPolicy,
    sleeper: SL,
}

impl<S> RetryDecorator<S, TokioSleeper> {
    /// Wraps `inner` with `policy`, using the real `tokio` sleeper.
    #[must_use]
    pub const fn new(inner: S, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            sleeper: TokioSleeper,
        }
    }
}

impl<S, SL> RetryDecorator<S, SL> {
    /// Swaps in a different [`Sleeper`] — the injection point tests use to
    /// avoid real wall-clock waits.
    pub fn with_sleeper<SL2>(self, sleeper: SL2) -> RetryDecorator<S, SL2> {
        RetryDecorator {
            inner: self.inner,
            policy: self.policy,
            sleeper,
        }
    }

    /// Returns the configured policy.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<S: Sender, SL: Sleeper> Sender for RetryDecorator<S, SL> {
    async fn send(
        &self,
        cancel: CancellationToken,
        url: &str,
        params: Params,
        opts: &[RequestOption],
    ) -> Result<Response, SenderError> {
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(SenderError::Canceled {
                    last_response: None,
                    source: None,
                });
            }

            let outcome = self
                .inner
                .send(cancel.clone(), url, params.clone(), opts)
                .await;

            if cancel.is_cancelled() {
                return Err(canceled_from_outcome(outcome));
            }

            let succeeded = matches!(&outcome, Ok(resp) if resp.status.as_u16() < 400);
            if succeeded {
                return outcome;
            }

            if attempt == self.policy.count {
                if self.policy.log {
                    tracing::warn!(url, attempts = attempt + 1, "retry budget exhausted");
                }
                return outcome;
            }

            let should_retry = match &outcome {
                Ok(resp) => self.policy.should_retry(Some(resp), None),
                Err(err) => self.policy.should_retry(None, Some(err)),
            };
            if !should_retry {
                return outcome;
            }

            let delay = self.policy.delay_for(attempt);
            if self.policy.log {
                tracing::debug!(
                    url,
                    attempt,
                    remaining = self.policy.count - attempt,
                    next_delay_ms = delay.as_millis() as u64,
                    "retrying webhook send"
                );
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(canceled_from_outcome(outcome)),
                () = self.sleeper.sleep(delay) => {}
            }

            attempt += 1;
        }
    }
}

/// Joins whatever outcome the last attempt produced with the cancellation
/// cause, without double-wrapping an outcome that was already a
/// cancellation.
fn canceled_from_outcome(outcome: Result<Response, SenderError>) -> SenderError {
    match outcome {
        Ok(response) => SenderError::canceled_after_response(response),
        Err(err) if err.is_canceled() => err,
        Err(err) => err.into_canceled(),
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
