use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Waits between attempts; one attempt more than there are delays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    #[serde(default = "RetryPolicy::default_delays_ms")]
    pub delays_ms: Vec<u64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delays_ms: Self::default_delays_ms(),
        }
    }
}

impl RetryPolicy {
    fn default_delays_ms() -> Vec<u64> {
        vec![1000, 2000, 4000]
    }

    /// A single attempt with no retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            delays_ms: Vec::new(),
        }
    }

    #[must_use]
    pub fn attempts(&self) -> usize {
        self.delays_ms.len() + 1
    }

    fn delay_after(&self, attempt: usize) -> Duration {
        let ms = self.delays_ms.get(attempt - 1).copied().unwrap_or_default();
        Duration::from_millis(ms)
    }
}

/// Retry an async operation, sleeping per `policy` between attempts.
///
/// Errors for which `retryable` returns `false` are returned immediately.
/// Otherwise the last error is returned once every attempt has failed.
pub async fn retry_with_backoff<F, Fut, T, E, R>(
    mut operation: F,
    policy: &RetryPolicy,
    retryable: R,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
    R: Fn(&E) -> bool,
{
    let attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < attempts && retryable(&e) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "Request failed (attempt {attempt}/{attempts}): {e}. Retrying after {}ms...",
                    delay.as_millis()
                );
                sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
