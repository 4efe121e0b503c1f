use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::SourceError;

/// Runtime circuit state for upstream endpoint calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// Circuit breaker thresholds and timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures in `Closed` before the circuit opens.
    pub failure_threshold: u32,
    /// How long the circuit stays open before admitting a single probe.
    pub open_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            open_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug)]
struct CircuitInner {
    state: CircuitState,
    consecutive_failures: u32,
    last_failure: Option<Instant>,
}

impl Default for CircuitInner {
    fn default() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            last_failure: None,
        }
    }
}

/// Thread-safe per-endpoint fault-isolation state machine.
///
/// Each upstream endpoint owns an independent instance for the lifetime of
/// the process; failures on one endpoint never affect another. Transitions
/// are serialized by a single mutex, so concurrent callers cannot lose
/// `consecutive_failures` updates.
#[derive(Debug)]
pub struct CircuitBreaker {
    endpoint: String,
    config: CircuitBreakerConfig,
    inner: Mutex<CircuitInner>,
}

impl CircuitBreaker {
    pub fn new(endpoint: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            endpoint: endpoint.into(),
            config,
            inner: Mutex::new(CircuitInner::default()),
        }
    }

    pub fn with_defaults(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, CircuitBreakerConfig::default())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether a request may proceed right now.
    ///
    /// In `Open`, once the open timeout has elapsed the circuit moves to
    /// `HalfOpen` and this call admits exactly one probe; further calls are
    /// refused until the probe's outcome is recorded.
    pub fn allow_request(&self) -> bool {
        let mut inner = self
            .inner
            .lock()
            .expect("circuit breaker lock is not poisoned");
        match inner.state {
            CircuitState::Closed => true,
            // A probe is already in flight; its outcome decides the state.
            CircuitState::HalfOpen => false,
            CircuitState::Open => {
                let timeout_elapsed = inner
                    .last_failure
                    .map(|at| at.elapsed() > self.config.open_timeout)
                    .unwrap_or(true);

                if timeout_elapsed {
                    inner.state = CircuitState::HalfOpen;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self
            .inner
            .lock()
            .expect("circuit breaker lock is not poisoned");
        inner.state = CircuitState::Closed;
        inner.consecutive_failures = 0;
        inner.last_failure = None;
    }

    pub fn record_failure(&self) {
        let mut inner = self
            .inner
            .lock()
            .expect("circuit breaker lock is not poisoned");
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
        inner.last_failure = Some(Instant::now());

        if inner.state == CircuitState::HalfOpen
            || inner.consecutive_failures >= self.config.failure_threshold
        {
            inner.state = CircuitState::Open;
        }
    }

    /// Run `operation` under the breaker.
    ///
    /// When the circuit refuses the request, the operation is not invoked
    /// and the call fails with a circuit-open error immediately.
    pub async fn execute<T, F, Fut>(&self, operation: F) -> Result<T, SourceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        if !self.allow_request() {
            return Err(SourceError::circuit_open(&self.endpoint));
        }

        match operation().await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(error) => {
                self.record_failure();
                Err(error)
            }
        }
    }

    pub fn state(&self) -> CircuitState {
        let inner = self
            .inner
            .lock()
            .expect("circuit breaker lock is not poisoned");
        inner.state
    }

    pub fn consecutive_failures(&self) -> u32 {
        let inner = self
            .inner
            .lock()
            .expect("circuit breaker lock is not poisoned");
        inner.consecutive_failures
    }
}
