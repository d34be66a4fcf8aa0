//! Bounded retry for upstream calls.

use std::future::Future;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::warn;

use crate::errors::UpstreamError;

const BACKOFF_FACTOR_MS: u64 = 50;
const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Number of extra attempts after the first one. Zero keeps a single attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: usize,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_retries: usize) -> Self {
        Self { max_retries }
    }

    #[must_use]
    pub const fn single_attempt() -> Self {
        Self { max_retries: 0 }
    }

    /// Runs `operation`, retrying with jittered exponential backoff
    /// (100ms, 200ms, 400ms, ...) only while the error is retryable.
    ///
    /// # Errors
    ///
    /// Returns the last error once it is not retryable or attempts run out.
    pub async fn run<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T, UpstreamError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>>,
    {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(BACKOFF_FACTOR_MS)
            .max_delay(MAX_BACKOFF)
            .map(jitter)
            .take(self.max_retries);

        let max_retries = self.max_retries;
        let mut failures = 0;
        RetryIf::spawn(strategy, operation, |e: &UpstreamError| {
            failures += 1;
            let retry = should_retry(failures, max_retries, e);
            if retry {
                warn!(
                    operation = operation_name,
                    attempt = failures + 1,
                    error = %e,
                    "Retrying upstream call"
                );
            }
            retry
        })
        .await
    }
}

/// The condition runs before the backoff strategy is consulted, so it has to
/// stop on its own once the retry budget is spent.
fn should_retry(failures: usize, max_retries: usize, error: &UpstreamError) -> bool {
    failures <= max_retries && error.is_retryable()
}
