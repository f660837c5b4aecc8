//! Bounded retry around client construction.
//!
//! # Design
//! - Attempts and interval are plain values so callers and tests can tune them.
//! - Waiting goes through [`Sleeper`]; tests substitute a recorder instead of
//!   sleeping for real.
//! - Only construction is retried. Request failures surface to the caller.

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

/// Default number of construction attempts.
pub const CONNECT_ATTEMPTS: u32 = 10;
/// Default pause between construction attempts.
pub const CONNECT_RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// Attempt budget for client construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts; values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: CONNECT_ATTEMPTS,
            interval: CONNECT_RETRY_INTERVAL,
        }
    }
}

/// Time source used between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Pause for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Every attempt failed.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    /// Number of attempts made.
    pub attempts: u32,
    /// Error of the final attempt.
    pub last_error: E,
}

/// Call `construct` until it succeeds or the policy's attempts are spent,
/// pausing `policy.interval` between attempts.
///
/// `construct` receives the 1-based attempt number.
///
/// # Errors
///
/// Returns [`RetryExhausted`] carrying the final attempt's error.
pub async fn retry_construct<T, E, F>(
    policy: RetryPolicy,
    sleeper: &dyn Sleeper,
    mut construct: F,
) -> Result<T, RetryExhausted<E>>
where
    T: Send,
    E: Display + Send,
    F: FnMut(u32) -> Result<T, E> + Send,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match construct(attempt) {
            Ok(value) => return Ok(value),
            Err(err) => {
                warn!(
                    attempt,
                    max_attempts,
                    error = %err,
                    "log store client construction failed"
                );
                if attempt >= max_attempts {
                    return Err(RetryExhausted {
                        attempts: attempt,
                        last_error: err,
                    });
                }
            }
        }
        sleeper.sleep(policy.interval).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSleeper {
        pauses: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        fn pauses(&self) -> Vec<Duration> {
            self.pauses.lock().map(|p| p.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            if let Ok(mut pauses) = self.pauses.lock() {
                pauses.push(duration);
            }
        }
    }

    #[tokio::test]
    async fn exhausts_attempts_and_returns_last_error() -> Result<()> {
        let sleeper = RecordingSleeper::default();
        let mut calls = Vec::new();

        let result: Result<(), _> = retry_construct(RetryPolicy::default(), &sleeper, |attempt| {
            calls.push(attempt);
            Err(format!("attempt {attempt} failed"))
        })
        .await;

        let exhausted = match result {
            Err(exhausted) => exhausted,
            Ok(()) => return Err(anyhow!("expected retries to be exhausted")),
        };
        assert_eq!(exhausted.attempts, 10);
        assert_eq!(exhausted.last_error, "attempt 10 failed");
        assert_eq!(calls, (1..=10).collect::<Vec<_>>());

        let pauses = sleeper.pauses();
        assert_eq!(pauses.len(), 9);
        assert!(pauses.iter().all(|pause| *pause >= Duration::from_millis(500)));
        Ok(())
    }

    #[tokio::test]
    async fn stops_at_first_success() -> Result<()> {
        let sleeper = RecordingSleeper::default();
        let value = retry_construct(RetryPolicy::default(), &sleeper, |attempt| {
            if attempt < 3 {
                Err("not yet")
            } else {
                Ok(attempt)
            }
        })
        .await
        .map_err(|exhausted| anyhow!("exhausted after {}", exhausted.attempts))?;

        assert_eq!(value, 3);
        assert_eq!(sleeper.pauses().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() -> Result<()> {
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy {
            max_attempts: 0,
            interval: Duration::from_millis(1),
        };
        let result: Result<(), _> = retry_construct(policy, &sleeper, |_| Err("down")).await;
        assert!(matches!(result, Err(RetryExhausted { attempts: 1, .. })));
        assert!(sleeper.pauses().is_empty());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_sleeper_waits_for_interval() {
        let started = tokio::time::Instant::now();
        TokioSleeper.sleep(CONNECT_RETRY_INTERVAL).await;
        assert!(started.elapsed() >= CONNECT_RETRY_INTERVAL);
    }
}
