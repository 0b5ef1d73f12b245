//! # sync-client
//!
//! Background sync driver for the Bloom journal app.
//!
//! This is the crate applications embed to sync local journal entries to
//! the backend without ever issuing overlapping uploads.
//!
//! ## Features
//!
//! - **Single-flight**: at most one transport call in flight at any instant
//! - **Request merging**: bursts of requests collapse into one debounced follow-up
//! - **Best-effort**: transport failures become observable status, not errors
//! - **Pure State Machine**: uses sync-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use bloom_sync_client::{CoordinatorConfig, MockTransport, NullObserver, SyncCoordinator};
//!
//! let transport = MockTransport::new();
//! let coordinator = SyncCoordinator::new(CoordinatorConfig::default(), transport, NullObserver);
//!
//! // After every local mutation:
//! let outcome = coordinator.request_sync().await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coordinator;
pub mod dispatch;
pub mod retry;
pub mod transport;

pub use coordinator::{CoordinatorConfig, NullObserver, StatusObserver, SyncCoordinator};
pub use dispatch::{ErrorCallbacks, ErrorDispatcher};
pub use retry::{RetryPolicy, RetryingTransport};
pub use transport::{MockTransport, RemoteSyncTransport};
