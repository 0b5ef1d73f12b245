//! Error types for Bloom journal sync.
//!
//! [`SyncError`] is the failure type returned by sync transports.
//! [`ErrorCategory`] is the coarse bucket the app reacts to: network
//! failures flip the app into offline mode, auth failures force
//! re-authentication, everything else surfaces as an unexpected error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while syncing journal entries to the backend.
///
/// `Clone` so the coordinator can retain the most recent failure for
/// inspection without giving up ownership.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// Network-level failure (no connectivity, DNS, connection reset).
    #[error("network error: {0}")]
    Network(String),

    /// The backend did not respond in time.
    #[error("request timed out")]
    Timeout,

    /// The session is missing, expired, or rejected.
    #[error("not authorized: {0}")]
    Unauthorized(String),

    /// The backend is rate limiting this client.
    #[error("rate limit exceeded")]
    RateLimited,

    /// The entry payload was rejected by the backend.
    #[error("invalid entry data: {0}")]
    Validation(String),

    /// Local persistence failed (cache read/write, quota).
    #[error("local storage error: {0}")]
    Storage(String),

    /// Anything that doesn't fit the buckets above.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SyncError {
    /// The coarse category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network(_) | Self::Timeout | Self::RateLimited => ErrorCategory::Network,
            Self::Unauthorized(_) => ErrorCategory::Auth,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Storage(_) => ErrorCategory::Storage,
            Self::Internal(_) => ErrorCategory::Unknown,
        }
    }

    /// Build a `SyncError` from opaque backend error text.
    ///
    /// Backends report failures as bare strings; this classifies the
    /// message and wraps it in the matching variant.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        match classify_message(&message) {
            ErrorCategory::Network => Self::Network(message),
            ErrorCategory::Auth => Self::Unauthorized(message),
            ErrorCategory::Validation => Self::Validation(message),
            ErrorCategory::Storage => Self::Storage(message),
            ErrorCategory::Unknown => Self::Internal(message),
        }
    }
}

/// Coarse failure buckets the app reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Connectivity or backend availability problems.
    Network,
    /// Authentication or session problems.
    Auth,
    /// The data itself was rejected.
    Validation,
    /// Local persistence problems.
    Storage,
    /// Unclassified.
    Unknown,
}

impl ErrorCategory {
    /// Whether a failure in this category is worth retrying.
    ///
    /// Network problems are transient; auth, validation, and storage
    /// failures will fail the same way on replay.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::Unknown)
    }
}

/// Classify opaque error text into a category by substring matching.
///
/// Matching is case-insensitive. Auth markers are checked before network
/// ones so a "fetch failed: 401" lands in `Auth`, not `Network`.
pub fn classify_message(message: &str) -> ErrorCategory {
    let lower = message.to_lowercase();

    const AUTH_MARKERS: &[&str] = &[
        "unauthorized",
        "forbidden",
        "401",
        "403",
        "jwt",
        "session expired",
    ];
    const NETWORK_MARKERS: &[&str] = &[
        "network",
        "fetch",
        "connection",
        "offline",
        "timeout",
        "timed out",
        "unreachable",
    ];
    const VALIDATION_MARKERS: &[&str] = &["invalid", "validation", "constraint", "422"];
    const STORAGE_MARKERS: &[&str] = &["storage", "quota", "disk", "database"];

    if AUTH_MARKERS.iter().any(|m| lower.contains(m)) {
        ErrorCategory::Auth
    } else if NETWORK_MARKERS.iter().any(|m| lower.contains(m)) {
        ErrorCategory::Network
    } else if VALIDATION_MARKERS.iter().any(|m| lower.contains(m)) {
        ErrorCategory::Validation
    } else if STORAGE_MARKERS.iter().any(|m| lower.contains(m)) {
        ErrorCategory::Storage
    } else {
        ErrorCategory::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SyncError::Network("connection reset".into());
        assert_eq!(err.to_string(), "network error: connection reset");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncError>();
    }

    #[test]
    fn categories_map_to_buckets() {
        assert_eq!(SyncError::Timeout.category(), ErrorCategory::Network);
        assert_eq!(SyncError::RateLimited.category(), ErrorCategory::Network);
        assert_eq!(
            SyncError::Unauthorized("expired".into()).category(),
            ErrorCategory::Auth
        );
        assert_eq!(
            SyncError::Validation("mood out of range".into()).category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            SyncError::Internal("???".into()).category(),
            ErrorCategory::Unknown
        );
    }

    #[test]
    fn network_and_unknown_are_retryable() {
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Unknown.is_retryable());
        assert!(!ErrorCategory::Auth.is_retryable());
        assert!(!ErrorCategory::Validation.is_retryable());
        assert!(!ErrorCategory::Storage.is_retryable());
    }

    #[test]
    fn classifies_network_messages() {
        assert_eq!(
            classify_message("TypeError: Failed to fetch"),
            ErrorCategory::Network
        );
        assert_eq!(
            classify_message("Network request failed"),
            ErrorCategory::Network
        );
        assert_eq!(classify_message("request timed out"), ErrorCategory::Network);
    }

    #[test]
    fn classifies_auth_messages() {
        assert_eq!(classify_message("401 Unauthorized"), ErrorCategory::Auth);
        assert_eq!(classify_message("JWT expired"), ErrorCategory::Auth);
        assert_eq!(
            classify_message("session expired, please sign in"),
            ErrorCategory::Auth
        );
    }

    #[test]
    fn auth_markers_win_over_network_markers() {
        // A 401 coming back from a fetch call is an auth problem, not a
        // connectivity problem.
        assert_eq!(classify_message("fetch failed: 401"), ErrorCategory::Auth);
    }

    #[test]
    fn classifies_validation_and_storage() {
        assert_eq!(
            classify_message("invalid entry payload"),
            ErrorCategory::Validation
        );
        assert_eq!(classify_message("quota exceeded"), ErrorCategory::Storage);
    }

    #[test]
    fn unmatched_messages_are_unknown() {
        assert_eq!(
            classify_message("something odd happened"),
            ErrorCategory::Unknown
        );
    }

    #[test]
    fn from_message_wraps_classified_variant() {
        assert_eq!(
            SyncError::from_message("Network request failed"),
            SyncError::Network("Network request failed".into())
        );
        assert_eq!(
            SyncError::from_message("401 Unauthorized"),
            SyncError::Unauthorized("401 Unauthorized".into())
        );
        assert!(matches!(
            SyncError::from_message("weird"),
            SyncError::Internal(_)
        ));
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&ErrorCategory::Network).unwrap();
        assert_eq!(json, "\"network\"");
    }
}
