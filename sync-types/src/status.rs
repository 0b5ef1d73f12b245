//! Observable sync state.
//!
//! [`SyncStatus`] is what UI layers render (the sync indicator, error
//! toasts); [`SyncOutcome`] is what callers of `request_sync` get back.

use serde::{Deserialize, Serialize};

/// Observable status of the sync pipeline.
///
/// Reflects the most recent of: a sync starting (`Syncing`), a request
/// being queued or debounced behind an in-flight sync (`Pending`), a sync
/// succeeding (`Idle`), or a sync failing (`Error`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// No sync in flight; the last sync (if any) succeeded.
    #[default]
    Idle,
    /// A sync call is physically executing.
    Syncing,
    /// A request arrived while a sync was in flight (or is being
    /// debounced) and will be replayed after it completes.
    Pending,
    /// The last sync attempt failed.
    Error,
}

impl SyncStatus {
    /// True while work is either executing or queued.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Syncing | Self::Pending)
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Syncing => "syncing",
            Self::Pending => "pending",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// What happened to a single `request_sync` call.
///
/// `Queued` means the request was coalesced into an already in-flight or
/// already scheduled sync; the transport was not invoked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOutcome {
    /// The transport was invoked for this request.
    Executed,
    /// The request was recorded and merged into a follow-up sync.
    Queued,
}

impl SyncOutcome {
    /// True if this request caused a physical transport call.
    pub fn was_executed(&self) -> bool {
        matches!(self, Self::Executed)
    }
}
