//! Error dispatch to app-level handlers.
//!
//! The app reacts to sync failures in exactly three ways: flip into
//! offline mode, force re-authentication, or surface the error to the
//! user. [`ErrorDispatcher`] routes a classified [`SyncError`] to the
//! matching handler. All handlers are supplied at construction time -
//! there is no global instance and no late registration.

use bloom_sync_types::{ErrorCategory, SyncError};

/// Handler invoked without error detail (the category says it all).
pub type Callback = Box<dyn Fn() + Send + Sync>;

/// Handler invoked with the error for user-facing rendering.
pub type ErrorCallback = Box<dyn Fn(&SyncError) + Send + Sync>;

/// The complete set of app reactions to sync failures.
///
/// Every field is required: a dispatcher with a missing handler cannot be
/// constructed, so there is no "callback not registered yet" window.
pub struct ErrorCallbacks {
    /// Network failure: switch the app into offline mode.
    pub on_network: Callback,
    /// Auth failure: drop the session and prompt for sign-in.
    pub on_auth: Callback,
    /// Everything else: surface to the user (e.g. a toast).
    pub on_unexpected: ErrorCallback,
}

/// Routes classified sync errors to the app's handlers.
pub struct ErrorDispatcher {
    callbacks: ErrorCallbacks,
}

impl ErrorDispatcher {
    /// Create a dispatcher with the given handlers.
    pub fn new(callbacks: ErrorCallbacks) -> Self {
        Self { callbacks }
    }

    /// Classify `error` and invoke exactly one handler.
    pub fn dispatch(&self, error: &SyncError) {
        let category = error.category();
        tracing::warn!(?category, error = %error, "sync error reported");

        match category {
            ErrorCategory::Network => (self.callbacks.on_network)(),
            ErrorCategory::Auth => (self.callbacks.on_auth)(),
            ErrorCategory::Validation | ErrorCategory::Storage | ErrorCategory::Unknown => {
                (self.callbacks.on_unexpected)(error)
            }
        }
    }
}

impl std::fmt::Debug for ErrorDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorDispatcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct Counters {
        network: AtomicUsize,
        auth: AtomicUsize,
        unexpected: AtomicUsize,
    }

    fn dispatcher() -> (Arc<Counters>, ErrorDispatcher) {
        let counters = Arc::new(Counters {
            network: AtomicUsize::new(0),
            auth: AtomicUsize::new(0),
            unexpected: AtomicUsize::new(0),
        });

        let (n, a, u) = (
            Arc::clone(&counters),
            Arc::clone(&counters),
            Arc::clone(&counters),
        );
        let dispatcher = ErrorDispatcher::new(ErrorCallbacks {
            on_network: Box::new(move || {
                n.network.fetch_add(1, Ordering::SeqCst);
            }),
            on_auth: Box::new(move || {
                a.auth.fetch_add(1, Ordering::SeqCst);
            }),
            on_unexpected: Box::new(move |_| {
                u.unexpected.fetch_add(1, Ordering::SeqCst);
            }),
        });
        (counters, dispatcher)
    }

    #[test]
    fn network_errors_trigger_offline_handler() {
        let (counters, dispatcher) = dispatcher();

        dispatcher.dispatch(&SyncError::Network("down".into()));
        dispatcher.dispatch(&SyncError::Timeout);

        assert_eq!(counters.network.load(Ordering::SeqCst), 2);
        assert_eq!(counters.auth.load(Ordering::SeqCst), 0);
        assert_eq!(counters.unexpected.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn auth_errors_trigger_signout_handler() {
        let (counters, dispatcher) = dispatcher();

        dispatcher.dispatch(&SyncError::Unauthorized("jwt expired".into()));

        assert_eq!(counters.auth.load(Ordering::SeqCst), 1);
        assert_eq!(counters.network.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn remaining_categories_reach_unexpected_handler() {
        let (counters, dispatcher) = dispatcher();

        dispatcher.dispatch(&SyncError::Validation("bad payload".into()));
        dispatcher.dispatch(&SyncError::Storage("quota".into()));
        dispatcher.dispatch(&SyncError::Internal("???".into()));

        assert_eq!(counters.unexpected.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn unexpected_handler_receives_the_error() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let dispatcher = ErrorDispatcher::new(ErrorCallbacks {
            on_network: Box::new(|| {}),
            on_auth: Box::new(|| {}),
            on_unexpected: Box::new(move |e| {
                *sink.lock().unwrap() = Some(e.clone());
            }),
        });

        dispatcher.dispatch(&SyncError::Internal("oops".into()));

        assert_eq!(
            *seen.lock().unwrap(),
            Some(SyncError::Internal("oops".into()))
        );
    }
}
