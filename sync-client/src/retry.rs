//! Retry-with-backoff transport wrapper.
//!
//! The coordinator itself never retries: a failed sync is replayed only
//! when another request arrives. When automatic retry is wanted, it is
//! layered here, inside the transport, so the coordinator still sees one
//! logical call per sync.

use async_trait::async_trait;
use bloom_sync_core::backoff_delay;
use bloom_sync_types::SyncError;
use std::time::Duration;

use crate::transport::RemoteSyncTransport;

/// Retry tunables for [`RetryingTransport`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per logical sync, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles per attempt.
    pub base_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

/// Transport wrapper that retries transient failures with exponential
/// backoff.
///
/// Only retryable categories (network-level failures) are retried; auth,
/// validation, and storage errors fail the same way on replay and are
/// returned immediately.
#[derive(Debug)]
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: RemoteSyncTransport> RetryingTransport<T> {
    /// Wrap `inner` with the given retry policy.
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Access the wrapped transport (for testing).
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: RemoteSyncTransport> RemoteSyncTransport for RetryingTransport<T> {
    async fn perform_sync(&self) -> Result<(), SyncError> {
        let mut attempt = 1;
        loop {
            match self.inner.perform_sync().await {
                Ok(()) => return Ok(()),
                Err(error) if !error.category().is_retryable() => {
                    tracing::debug!(error = %error, "failure is not retryable, giving up");
                    return Err(error);
                }
                Err(error) => {
                    if attempt >= self.policy.max_attempts {
                        tracing::warn!(
                            attempts = attempt,
                            error = %error,
                            "retries exhausted"
                        );
                        return Err(error);
                    }
                    let delay =
                        backoff_delay(self.policy.base_delay, self.policy.max_delay, attempt);
                    tracing::debug!(attempt, ?delay, error = %error, "retrying after backoff");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn success_needs_no_retry() {
        let mock = MockTransport::new();
        let transport = RetryingTransport::new(mock.clone(), policy());

        transport.perform_sync().await.unwrap();

        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_until_success() {
        let mock = MockTransport::new();
        mock.fail_times(SyncError::Network("flaky".into()), 2);
        let transport = RetryingTransport::new(mock.clone(), policy());

        transport.perform_sync().await.unwrap();

        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let mock = MockTransport::new();
        mock.fail_times(SyncError::Timeout, 5);
        let transport = RetryingTransport::new(mock.clone(), policy());

        let result = transport.perform_sync().await;

        assert_eq!(result, Err(SyncError::Timeout));
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn auth_failures_are_not_retried() {
        let mock = MockTransport::new();
        mock.fail_next(SyncError::Unauthorized("session expired".into()));
        let transport = RetryingTransport::new(mock.clone(), policy());

        let result = transport.perform_sync().await;

        assert!(matches!(result, Err(SyncError::Unauthorized(_))));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn validation_failures_are_not_retried() {
        let mock = MockTransport::new();
        mock.fail_next(SyncError::Validation("bad mood value".into()));
        let transport = RetryingTransport::new(mock.clone(), policy());

        let result = transport.perform_sync().await;

        assert!(matches!(result, Err(SyncError::Validation(_))));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn works_as_coordinator_transport() {
        use crate::coordinator::{CoordinatorConfig, NullObserver, SyncCoordinator};

        let mock = MockTransport::new();
        mock.fail_next(SyncError::Network("blip".into()));
        let transport = RetryingTransport::new(mock.clone(), policy());
        let coord = SyncCoordinator::new(CoordinatorConfig::default(), transport, NullObserver);

        let outcome = coord.request_sync().await;

        // One logical sync, two physical attempts; the coordinator never
        // saw the transient failure.
        assert!(outcome.was_executed());
        assert_eq!(mock.call_count(), 2);
        assert_eq!(coord.status(), bloom_sync_types::SyncStatus::Idle);
    }
}
