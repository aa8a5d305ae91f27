//! Retry with exponential backoff for embedding API calls.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::warn;

/// Configuration for retry behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first try.
    pub max_retries: u32,
    /// Initial delay between retries (base for exponential backoff) in milliseconds.
    #[serde(with = "crate::serde_millis")]
    pub base_delay: Duration,
    /// Maximum delay between retries in milliseconds.
    #[serde(with = "crate::serde_millis")]
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,
    /// Spread each delay by ±25% so concurrent evaluations do not retry in lockstep.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before retry `attempt` (0-indexed; attempt 0 is the first try and never waits).
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        // base_delay * multiplier^(attempt-1), capped at max_delay
        let exponential = self.base_delay.as_millis() as f64
            * self
                .backoff_multiplier
                .powi(i32::try_from(attempt - 1).unwrap_or(i32::MAX));
        let delay_ms = exponential.min(self.max_delay.as_millis() as f64) as u64;

        if self.jitter {
            let jitter_range = delay_ms / 4;
            if jitter_range > 0 {
                let jitter = fastrand::u64(0..jitter_range * 2);
                return Duration::from_millis(delay_ms - jitter_range + jitter);
            }
        }

        Duration::from_millis(delay_ms)
    }
}

/// Outcome of a retried operation.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    /// The final result (success or last error).
    pub result: Result<T, E>,
    /// Number of attempts made (1 = first try succeeded).
    pub attempts: u32,
    /// Total time spent including backoff sleeps.
    pub total_duration: Duration,
}

impl<T, E> RetryOutcome<T, E> {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Runs `operation` until it succeeds, returns a non-retryable error, or the
/// retry budget is spent.
///
/// ```
/// use semantic::retry::{execute_with_retry_async, RetryConfig};
/// use std::time::Duration;
///
/// let rt = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
/// rt.block_on(async {
///     let config = RetryConfig::default().with_base_delay(Duration::from_millis(1));
///     let outcome = execute_with_retry_async(
///         &config,
///         |attempt| async move {
///             if attempt == 0 { Err("transient".to_string()) } else { Ok("done") }
///         },
///         |_err: &String| true,
///     )
///     .await;
///     assert!(outcome.succeeded());
///     assert_eq!(outcome.attempts, 2);
/// });
/// ```
pub async fn execute_with_retry_async<T, E, F, Fut, R>(
    config: &RetryConfig,
    mut operation: F,
    is_retryable: R,
) -> RetryOutcome<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let start = Instant::now();
    let mut attempt = 0u32;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                return RetryOutcome {
                    result: Ok(value),
                    attempts: attempt + 1,
                    total_duration: start.elapsed(),
                };
            }
            Err(err) => {
                if attempt >= config.max_retries || !is_retryable(&err) {
                    return RetryOutcome {
                        result: Err(err),
                        attempts: attempt + 1,
                        total_duration: start.elapsed(),
                    };
                }

                attempt += 1;
                let delay = config.calculate_delay(attempt);
                warn!(
                    attempt,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "embedding_request_retry"
                );
                if !delay.is_zero() {
                    sleep(delay).await;
                }
            }
        }
    }
}
