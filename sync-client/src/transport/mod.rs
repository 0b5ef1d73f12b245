//! Transport abstraction for Bloom sync.
//!
//! This module provides the seam between the coordinator and whatever
//! actually moves journal entries to the backend (HTTP client, mock for
//! testing).
//!
//! # Design
//!
//! The transport takes no arguments: each call reads whatever local state
//! needs uploading at that moment. This is what makes the coordinator's
//! "replay once after a burst" policy sound - a replayed call can never
//! sync a stale snapshot.
//!
//! # Example
//!
//! ```ignore
//! let transport = MockTransport::new();
//! transport.perform_sync().await?;
//! assert_eq!(transport.call_count(), 1);
//! ```

mod mock;

pub use mock::MockTransport;

use async_trait::async_trait;
use bloom_sync_types::SyncError;

/// Uploads the current local journal state to the backend.
///
/// Implementations must be safely re-invocable: the coordinator calls
/// this again after a failure whenever a queued request is waiting, and
/// the retry wrapper calls it repeatedly within one logical sync.
#[async_trait]
pub trait RemoteSyncTransport: Send + Sync {
    /// Perform one full sync of current local state.
    async fn perform_sync(&self) -> Result<(), SyncError>;
}
