// src/llm/retry.rs
use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry policy with jittered exponential backoff. The delay before retry
/// `n` is drawn uniformly from `[min_backoff, ceiling]`, where the ceiling is
/// `base * 2^(n-1)` clamped into `[min_backoff, max_backoff]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Lower bound of every backoff
    pub min_backoff: Duration,

    /// Upper bound of every backoff
    pub max_backoff: Duration,

    /// Ceiling of the first backoff before clamping; doubles per retry
    pub base: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, min_backoff: Duration, max_backoff: Duration, base: Duration) -> Self {
        Self {
            max_attempts,
            min_backoff,
            max_backoff,
            base,
        }
    }

    /// Policy for report generation: 3 attempts, 10-60 s jittered waits.
    pub fn generation() -> Self {
        Self::new(3, Duration::from_secs(10), Duration::from_secs(60), Duration::from_secs(10))
    }

    #[cfg(test)]
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    /// Upper bound for the wait before retry number `retry` (1-based).
    fn backoff_ceiling(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        let raw = self.base.saturating_mul(1u32 << exponent);
        raw.clamp(self.min_backoff, self.max_backoff.max(self.min_backoff))
    }

    /// Jittered wait before retry number `retry` (1-based).
    pub fn backoff_duration(&self, retry: u32) -> Duration {
        let ceiling = self.backoff_ceiling(retry);
        if ceiling <= self.min_backoff {
            return self.min_backoff;
        }
        let millis = rand::thread_rng().gen_range(self.min_backoff.as_millis()..=ceiling.as_millis());
        Duration::from_millis(millis as u64)
    }

    /// Runs `operation` until it succeeds, retrying every error.
    pub async fn execute<F, Fut, T, E>(&self, operation_name: &str, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.execute_if(operation_name, |_| true, operation).await
    }

    /// Runs `operation`, retrying only errors accepted by `retry_if`.
    /// The last error is returned once attempts are exhausted.
    pub async fn execute_if<F, Fut, T, E, P>(
        &self,
        operation_name: &str,
        retry_if: P,
        mut operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: Fn(&E) -> bool,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!("Attempt {}/{} for operation: {}", attempt, max_attempts, operation_name);

            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("Operation '{}' succeeded after {} retries", operation_name, attempt - 1);
                    }
                    return Ok(result);
                }
                Err(e) if attempt < max_attempts && retry_if(&e) => {
                    let backoff = self.backoff_duration(attempt);
                    warn!(
                        "Operation '{}' failed (attempt {}/{}): {}. Retrying in {:?}",
                        operation_name, attempt, max_attempts, e, backoff
                    );
                    sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!("Operation '{}' failed after {} attempts: {}", operation_name, attempt, e);
                    return Err(e);
                }
            }
        }
    }
}
