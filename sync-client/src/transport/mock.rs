//! Mock transport for testing.
//!
//! Records every call and allows scripting latency and failures, so tests
//! can verify the coordinator's single-flight and merging behavior.

use super::RemoteSyncTransport;
use async_trait::async_trait;
use bloom_sync_types::SyncError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock transport for testing.
///
/// Counts invocations, tracks overlap, and allows scripting per-call
/// failures and a fixed latency per call.
#[derive(Debug, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    latency: Duration,
    calls: u32,
    in_flight: u32,
    max_in_flight: u32,
    fail_queue: VecDeque<SyncError>,
}

impl MockTransport {
    /// Create a new mock transport that succeeds instantly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call take `latency` before completing.
    pub fn set_latency(&self, latency: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.latency = latency;
    }

    /// Total number of `perform_sync` invocations so far.
    pub fn call_count(&self) -> u32 {
        let inner = self.inner.lock().unwrap();
        inner.calls
    }

    /// The largest number of calls that were ever executing at once.
    ///
    /// The coordinator's single-flight guarantee means this should never
    /// exceed 1, no matter how many requests were issued.
    pub fn max_in_flight(&self) -> u32 {
        let inner = self.inner.lock().unwrap();
        inner.max_in_flight
    }

    /// Cause the next call to fail with the given error.
    ///
    /// Scripted failures are consumed in order, one per call; once the
    /// queue is empty, calls succeed again.
    pub fn fail_next(&self, error: SyncError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_queue.push_back(error);
    }

    /// Cause the next `count` calls to fail with clones of `error`.
    pub fn fail_times(&self, error: SyncError, count: u32) {
        let mut inner = self.inner.lock().unwrap();
        for _ in 0..count {
            inner.fail_queue.push_back(error.clone());
        }
    }

    /// Clear all recorded and scripted state.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockTransportInner::default();
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl RemoteSyncTransport for MockTransport {
    async fn perform_sync(&self) -> Result<(), SyncError> {
        let (latency, scripted) = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls += 1;
            inner.in_flight += 1;
            inner.max_in_flight = inner.max_in_flight.max(inner.in_flight);
            (inner.latency, inner.fail_queue.pop_front())
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        self.inner.lock().unwrap().in_flight -= 1;

        match scripted {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
