//! Transport retry for backend calls.
//!
//! Only transport errors (connection refused, timeouts) are retried. HTTP
//! error statuses are answers and go straight back to the caller.
//!
//! `POST` is never retried: a create whose response timed out may already
//! be committed, and resending it would turn success into `DUPLICATE_ID`.
//! `GET` and `PUT` carry the full resource and are safe to resend.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use reqwest::Method;

/// How often, and how patiently, to resend a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Delay before the first retry; doubles per attempt (200ms, 400ms, 800ms).
    pub(crate) const BASE_DELAY: Duration = Duration::from_millis(200);

    pub(crate) fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Self::BASE_DELAY,
        }
    }

    /// The policy to use for a request with `method`.
    pub(crate) fn for_method(self, method: &Method) -> Self {
        if *method == Method::POST {
            Self {
                max_retries: 0,
                ..self
            }
        } else {
            self
        }
    }

    pub(crate) fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry number `attempt` (zero-based).
    pub(crate) fn delay(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }
}

/// Run `send` until it succeeds or the policy's retries are spent.
///
/// Returns the last error when every attempt fails.
pub(crate) async fn with_retry<T, E, F, Fut>(
    policy: RetryPolicy,
    endpoint: &str,
    send: F,
) -> Result<T, E>
where
    E: Display,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match send().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_retries() => {
                let delay = policy.delay(attempt);
                attempt += 1;
                tracing::warn!(
                    endpoint,
                    attempt,
                    max_retries = policy.max_retries(),
                    "request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn instant(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::ZERO,
        }
    }

    /// Fails the first `failures` calls, then answers with the call number.
    async fn flaky(calls: &AtomicU32, failures: u32) -> Result<u32, String> {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= failures {
            Err(format!("connection reset on call {n}"))
        } else {
            Ok(n)
        }
    }

    #[test]
    fn delay_doubles_from_base() {
        let policy = RetryPolicy::new(3);
        assert_eq!(policy.delay(0), Duration::from_millis(200));
        assert_eq!(policy.delay(1), Duration::from_millis(400));
        assert_eq!(policy.delay(2), Duration::from_millis(800));
        assert_eq!(policy.delay(40), Duration::MAX);
    }

    #[test]
    fn post_is_never_retried() {
        let policy = RetryPolicy::new(3);
        assert_eq!(policy.for_method(&Method::POST).max_retries(), 0);
        assert_eq!(policy.for_method(&Method::PUT).max_retries(), 3);
        assert_eq!(policy.for_method(&Method::GET).max_retries(), 3);
    }

    #[tokio::test]
    async fn recovers_once_the_transport_does() {
        let calls = AtomicU32::new(0);
        let result = with_retry(instant(3), "GET /api/disputes", || flaky(&calls, 2)).await;
        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_with_the_last_error() {
        let calls = AtomicU32::new(0);
        let result = with_retry(instant(2), "GET /api/disputes", || flaky(&calls, 10)).await;
        assert_eq!(result, Err("connection reset on call 3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_retries_means_single_attempt() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3).for_method(&Method::POST);
        let result = with_retry(policy, "POST /api/incidents", || flaky(&calls, 1)).await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
