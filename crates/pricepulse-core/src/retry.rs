//! Retry with exponential backoff for transient upstream failures.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Retry policy: up to `max_attempts` invocations with exponential backoff.
///
/// The delay before attempt `k` (1-based, `k >= 2`) is
/// `base_delay * 2^k`: with the default 1s base, attempt 2 waits 4s and
/// attempt 3 waits 8s. No jitter is applied.
///
/// Orthogonal to [`CircuitBreaker`](crate::CircuitBreaker): a policy can wrap
/// breaker-protected calls (each attempt is one breaker signal) or a breaker
/// can wrap an already-retried operation. Callers choose the composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Single attempt, no backoff.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff delay before the given 1-based attempt index.
    ///
    /// The first attempt runs immediately; attempt `k >= 2` waits
    /// `base_delay * 2^k`.
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt < 2 {
            return None;
        }
        let factor = 2_u32.saturating_pow(attempt.min(20));
        Some(self.base_delay.saturating_mul(factor))
    }

    /// Invoke `operation` until it succeeds or attempts are exhausted.
    ///
    /// The final attempt's error propagates unmodified; no result is
    /// synthesized.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            if let Some(delay) = self.delay_before(attempt) {
                tokio::time::sleep(delay).await;
            }

            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= attempts {
                        return Err(error);
                    }
                    tracing::warn!(
                        attempt,
                        max_attempts = attempts,
                        error = %error,
                        "operation failed, backing off before retry"
                    );
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn delay_uses_current_attempt_index_as_exponent() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_before(1), None);
        assert_eq!(policy.delay_before(2), Some(Duration::from_secs(4)));
        assert_eq!(policy.delay_before(3), Some(Duration::from_secs(8)));
        assert_eq!(policy.delay_before(4), Some(Duration::from_secs(16)));
    }

    #[test]
    fn delay_scales_with_base_unit() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        assert_eq!(policy.delay_before(2), Some(Duration::from_millis(400)));
        assert_eq!(policy.delay_before(3), Some(Duration::from_millis(800)));
    }

    #[tokio::test]
    async fn returns_first_success_without_further_attempts() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let calls = AtomicU32::new(0);

        let result: Result<u32, String> = policy
            .run(|| {
                let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if call < 2 {
                        Err(String::from("transient"))
                    } else {
                        Ok(call)
                    }
                }
            })
            .await;

        assert_eq!(result.expect("second attempt succeeds"), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn final_error_propagates_unmodified() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = policy
            .run(|| {
                let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Err(format!("failure {call}")) }
            })
            .await;

        assert_eq!(result.expect_err("all attempts fail"), "failure 3");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn none_policy_runs_exactly_once() {
        let policy = RetryPolicy::none();
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(String::from("boom")) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
