//! Polling waits.
//!
//! Every query-and-assert in the suite funnels through [`Waiter::until`]:
//! check, and if the check is not yet satisfied sleep one poll interval and
//! check again, until the deadline. This is the only place a scenario
//! suspends. Check errors end the wait immediately; there is no retry.

use crate::result::CheckResult;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default element timeout
pub const DEFAULT_ELEMENT_TIMEOUT_MS: u64 = 4_000;

/// Default alert timeout
pub const DEFAULT_ALERT_TIMEOUT_MS: u64 = 4_000;

/// Default navigation timeout
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Default window an absence must hold, e.g. cart rows still loading
pub const DEFAULT_SETTLE_MS: u64 = 1_000;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for one wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_ELEMENT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Timeout as a duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Poll interval as a duration, never zero
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

// =============================================================================
// WAIT OUTCOME
// =============================================================================

/// Result of a wait that did not error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    /// The check was satisfied
    Ready {
        /// Value produced by the check
        value: T,
        /// Time spent waiting
        elapsed: Duration,
    },
    /// The deadline passed first
    TimedOut {
        /// Time spent waiting
        elapsed: Duration,
    },
}

impl<T> WaitOutcome<T> {
    /// The ready value, if any
    pub fn into_ready(self) -> Option<T> {
        match self {
            Self::Ready { value, .. } => Some(value),
            Self::TimedOut { .. } => None,
        }
    }

    /// Whether the wait timed out
    pub const fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }

    /// Time spent waiting
    pub const fn elapsed(&self) -> Duration {
        match self {
            Self::Ready { elapsed, .. } | Self::TimedOut { elapsed } => *elapsed,
        }
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Polls an async check until it yields a value or the timeout passes
#[derive(Debug, Clone, Copy, Default)]
pub struct Waiter {
    options: WaitOptions,
}

impl Waiter {
    /// Create a waiter
    #[must_use]
    pub const fn new(options: WaitOptions) -> Self {
        Self { options }
    }

    /// Options in use
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Check until `Some`. The check always runs at least once, even with a
    /// zero timeout.
    pub async fn until<T, F, Fut>(&self, mut check: F) -> CheckResult<WaitOutcome<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = CheckResult<Option<T>>>,
    {
        let start = Instant::now();
        let deadline = start + self.options.timeout();
        loop {
            if let Some(value) = check().await? {
                return Ok(WaitOutcome::Ready {
                    value,
                    elapsed: start.elapsed(),
                });
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(WaitOutcome::TimedOut {
                    elapsed: start.elapsed(),
                });
            }
            let remaining = deadline - now;
            tokio::time::sleep(self.options.poll_interval().min(remaining)).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::result::CheckError;
    use std::sync::atomic::{AtomicU32, Ordering};

    mod options_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, DEFAULT_ELEMENT_TIMEOUT_MS);
            assert_eq!(opts.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_zero_poll_interval_is_clamped() {
            let opts = WaitOptions::new().with_poll_interval(0);
            assert_eq!(opts.poll_interval(), Duration::from_millis(1));
        }
    }

    mod waiter_tests {
        use super::*;

        fn quick(timeout_ms: u64) -> Waiter {
            Waiter::new(
                WaitOptions::new()
                    .with_timeout(timeout_ms)
                    .with_poll_interval(5),
            )
        }

        #[tokio::test]
        async fn test_ready_after_a_few_polls() {
            let calls = AtomicU32::new(0);
            let outcome = quick(1_000)
                .until(|| {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    async move { Ok((n >= 2).then_some(n)) }
                })
                .await
                .unwrap();
            assert_eq!(outcome.into_ready(), Some(2));
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn test_times_out() {
            let outcome = quick(30)
                .until(|| async { Ok::<Option<()>, CheckError>(None) })
                .await
                .unwrap();
            assert!(outcome.is_timed_out());
            assert!(outcome.elapsed() >= Duration::from_millis(30));
        }

        #[tokio::test]
        async fn test_zero_timeout_checks_once() {
            let calls = AtomicU32::new(0);
            let outcome = quick(0)
                .until(|| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(Some(())) }
                })
                .await
                .unwrap();
            assert!(!outcome.is_timed_out());
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_check_error_stops_wait() {
            let calls = AtomicU32::new(0);
            let result = quick(1_000)
                .until(|| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err::<Option<()>, _>(CheckError::driver("socket closed")) }
                })
                .await;
            assert!(matches!(result, Err(CheckError::Driver { .. })));
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }
}
