//! # sync-types
//!
//! Shared vocabulary for the Bloom journal sync pipeline.
//!
//! This crate provides the foundational types used across all bloom-sync
//! crates:
//! - [`SyncStatus`], [`SyncOutcome`] - Observable sync state and request results
//! - [`SyncError`], [`ErrorCategory`] - Failure taxonomy and classification
//!
//! Everything here is plain data: no I/O, no async, no timers. UI layers
//! consume these types directly (the status drives the sync indicator, the
//! error category drives offline-mode and sign-out handling).

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod status;

pub use error::{classify_message, ErrorCategory, SyncError};
pub use status::{SyncOutcome, SyncStatus};
