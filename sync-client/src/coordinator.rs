//! SyncCoordinator - the main interface for Bloom background sync.
//!
//! This module provides [`SyncCoordinator`], the entry point applications
//! call after every local mutation. It guarantees that at most one
//! transport call is physically in flight at any instant, and that
//! requests arriving during an in-flight call are coalesced into at most
//! one debounced follow-up.
//!
//! # Architecture
//!
//! SyncCoordinator uses a pure state machine (from sync-core) for the
//! coordination logic and interprets the actions to perform actual I/O
//! via the RemoteSyncTransport trait.
//!
//! ```text
//! Application → SyncCoordinator → RemoteSyncTransport → Backend
//!                      ↓
//!                 sync-core (pure state machine)
//! ```
//!
//! Transport failures never propagate out of [`request_sync`]: they are
//! logged, retained for inspection via [`last_error`], and surfaced as
//! [`SyncStatus::Error`] through the observer. Sync is best-effort
//! background work; nothing upstream should have to handle its errors.
//!
//! [`request_sync`]: SyncCoordinator::request_sync
//! [`last_error`]: SyncCoordinator::last_error

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bloom_sync_core::{Action, CoordinatorState, Event, DEFAULT_DEBOUNCE_WINDOW};
use bloom_sync_types::{SyncError, SyncOutcome, SyncStatus};
use tokio::task::JoinHandle;

use crate::transport::RemoteSyncTransport;

/// Receives every status transition from the coordinator.
///
/// Invoked synchronously, outside the coordinator's internal lock, and
/// never with the same status twice in a row. Implementations must not
/// panic.
pub trait StatusObserver: Send + Sync {
    /// Called once per status transition.
    fn on_status_change(&self, status: SyncStatus);
}

impl<F> StatusObserver for F
where
    F: Fn(SyncStatus) + Send + Sync,
{
    fn on_status_change(&self, status: SyncStatus) {
        self(status)
    }
}

/// Observer that ignores all transitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl StatusObserver for NullObserver {
    fn on_status_change(&self, _status: SyncStatus) {}
}

/// Tunables for [`SyncCoordinator`].
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// How long a queued follow-up waits after the in-flight sync
    /// completes. Each request arriving during the wait restarts it.
    pub debounce_window: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
        }
    }
}

impl CoordinatorConfig {
    /// Set the debounce window.
    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }
}

/// State behind the coordinator's lock.
///
/// Never held across an await: every mutation happens synchronously
/// inside one lock scope, so completion handlers evaluate the pending
/// flag in the same critical section that clears the in-flight state.
struct Shared {
    machine: CoordinatorState,
    status: SyncStatus,
    last_error: Option<SyncError>,
    debounce: Option<JoinHandle<()>>,
    /// Bumped under the lock by every cancel and every (re)start. A woken
    /// timer task re-checks this before acting: `abort` only lands at the
    /// task's next await, so a task that has already passed its sleep
    /// must not trust it.
    debounce_generation: u64,
}

struct Inner<T> {
    transport: T,
    observer: Box<dyn StatusObserver>,
    debounce_window: Duration,
    shared: Mutex<Shared>,
}

/// The single-flight, debounced sync coordinator.
///
/// Created once per session and disposed (or dropped) when the owning
/// store goes away. Holds no persisted state.
pub struct SyncCoordinator<T: RemoteSyncTransport + 'static> {
    inner: Arc<Inner<T>>,
}

impl<T: RemoteSyncTransport + 'static> SyncCoordinator<T> {
    /// Create a new coordinator.
    ///
    /// All collaborators are supplied up front; there is no late
    /// registration of callbacks and no global instance.
    pub fn new(
        config: CoordinatorConfig,
        transport: T,
        observer: impl StatusObserver + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                observer: Box::new(observer),
                debounce_window: config.debounce_window,
                shared: Mutex::new(Shared {
                    machine: CoordinatorState::new(),
                    status: SyncStatus::Idle,
                    last_error: None,
                    debounce: None,
                    debounce_generation: 0,
                }),
            }),
        }
    }

    /// Request a sync of current local state.
    ///
    /// If nothing is in flight the transport is invoked, and the call
    /// resolves [`SyncOutcome::Executed`] once it completes (success or
    /// failure alike). If a sync is already in flight or a follow-up is
    /// already scheduled, the request is coalesced and the call resolves
    /// [`SyncOutcome::Queued`] immediately.
    ///
    /// The sync runs on its own task: cancelling this future (timeout,
    /// `select!`, task abort) only abandons the wait, the in-flight call
    /// still completes and the machine still observes its outcome.
    ///
    /// Never returns an error: transport failures are captured, surfaced
    /// via the observer as [`SyncStatus::Error`], and retained in
    /// [`last_error`](Self::last_error).
    pub async fn request_sync(&self) -> SyncOutcome {
        let begin = Inner::apply(&self.inner, Event::SyncRequested);
        if !begin {
            tracing::debug!("sync already in flight or scheduled, request queued");
            return SyncOutcome::Queued;
        }

        // Dropping the sync future mid-flight would strand the machine in
        // Syncing with nothing running; a detached task cannot be dropped
        // by the caller.
        let inner = Arc::clone(&self.inner);
        let sync = tokio::spawn(async move { Inner::drive(&inner, true).await });
        let _ = sync.await;
        SyncOutcome::Executed
    }

    /// The most recently emitted status.
    pub fn status(&self) -> SyncStatus {
        self.inner.shared.lock().unwrap().status
    }

    /// The most recent transport failure, cleared by the next success.
    pub fn last_error(&self) -> Option<SyncError> {
        self.inner.shared.lock().unwrap().last_error.clone()
    }

    /// Cancel any scheduled follow-up and drop the pending flag.
    ///
    /// An in-flight transport call is left alone; only work that has not
    /// started yet is cancelled. Idempotent: safe to call any number of
    /// times, including before any sync has run. Also runs on drop.
    pub fn dispose(&self) {
        tracing::debug!("disposing sync coordinator");
        Inner::apply(&self.inner, Event::DisposeRequested);
    }
}

impl<T: RemoteSyncTransport + 'static> Drop for SyncCoordinator<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T: RemoteSyncTransport + 'static> Inner<T> {
    /// Apply one event to the state machine and execute the resulting
    /// bookkeeping actions (status recording, timer arm/cancel).
    ///
    /// Returns true if the transition produced `BeginSync`. Observer
    /// notification happens after the lock is released, so observers may
    /// call back into the coordinator's accessors.
    fn apply(inner: &Arc<Self>, event: Event) -> bool {
        let (begin, notify) = {
            let mut shared = inner.shared.lock().unwrap();
            let (next, actions) = shared.machine.on_event(event);
            shared.machine = next;

            let mut begin = false;
            let mut notify = Vec::new();
            for action in actions {
                match action {
                    Action::BeginSync => begin = true,
                    Action::EmitStatus(status) => {
                        if shared.status != status {
                            shared.status = status;
                            notify.push(status);
                        }
                    }
                    Action::CancelDebounce => {
                        shared.debounce_generation = shared.debounce_generation.wrapping_add(1);
                        if let Some(handle) = shared.debounce.take() {
                            handle.abort();
                        }
                    }
                    Action::StartDebounce => {
                        shared.debounce_generation = shared.debounce_generation.wrapping_add(1);
                        let generation = shared.debounce_generation;
                        shared.debounce = Some(Self::spawn_debounce(inner, generation));
                    }
                }
            }
            (begin, notify)
        };

        for status in notify {
            inner.observer.on_status_change(status);
        }
        begin
    }

    /// Run the transport while `begin` holds, feeding completions back
    /// into the state machine. The loop re-enters only when a fired
    /// debounce timer produces another `BeginSync` (never directly from a
    /// completion, so this terminates after one call per invocation).
    async fn drive(inner: &Arc<Self>, mut begin: bool) {
        while begin {
            tracing::debug!("starting sync");
            let event = match inner.transport.perform_sync().await {
                Ok(()) => {
                    tracing::debug!("sync completed");
                    inner.shared.lock().unwrap().last_error = None;
                    Event::SyncSucceeded
                }
                Err(error) => {
                    tracing::warn!(error = %error, "sync failed");
                    inner.shared.lock().unwrap().last_error = Some(error);
                    Event::SyncFailed
                }
            };
            begin = Self::apply(inner, event);
        }
    }

    /// Arm the debounce timer for the given generation.
    ///
    /// A cancel racing with the fire can abort this task after it has
    /// already passed the sleep, in which case the abort only lands at
    /// some later await. The woken task therefore re-checks its
    /// generation under the lock: if a cancel or restart superseded it,
    /// it backs out without touching the handle slot (which may already
    /// hold a newer timer) and without firing.
    fn spawn_debounce(inner: &Arc<Self>, generation: u64) -> JoinHandle<()> {
        let inner = Arc::clone(inner);
        let window = inner.debounce_window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            {
                let mut shared = inner.shared.lock().unwrap();
                if shared.debounce_generation != generation {
                    return;
                }
                shared.debounce = None;
            }
            tracing::debug!("debounce window elapsed");
            let begin = Self::apply(&inner, Event::DebounceElapsed);
            Self::drive(&inner, begin).await;
        })
    }
}
