//! Single-flight sync coordination state machine.
//!
//! This module provides a pure, side-effect-free state machine that
//! guarantees at most one sync call is physically in flight at a time,
//! while coalescing requests that arrive during an in-flight call into at
//! most one debounced follow-up. The state machine takes events as input
//! and produces a new state plus a list of actions to execute.
//!
//! The actual I/O (invoking the transport, arming the debounce timer) is
//! performed by sync-client, not by this module. This enables instant unit
//! testing without async or mocks.

use bloom_sync_types::SyncStatus;
use std::time::Duration;

/// Default debounce window between a sync completing and a queued
/// follow-up starting.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Coordination state machine - NO I/O, just state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// No sync in flight, no follow-up scheduled.
    Idle,
    /// A transport call is physically executing.
    Syncing {
        /// True if a request arrived during this call and must be
        /// replayed after it completes. A single sticky flag, not a
        /// counter: the transport re-reads current state on every call,
        /// so replaying once is equivalent to replaying N times.
        pending: bool,
    },
    /// A follow-up sync is scheduled behind the debounce timer.
    Debouncing,
}

impl CoordinatorState {
    /// Create a new state machine in the Idle state.
    pub fn new() -> Self {
        Self::Idle
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller (sync-client)
    /// is responsible for executing the returned actions, in order.
    pub fn on_event(self, event: Event) -> (Self, Vec<Action>) {
        match (self, event) {
            // From Idle: the only path that starts a sync directly.
            (Self::Idle, Event::SyncRequested) => (
                Self::Syncing { pending: false },
                vec![Action::EmitStatus(SyncStatus::Syncing), Action::BeginSync],
            ),

            // Requests during an in-flight call set the sticky flag and do
            // not touch the transport. The duplicate Pending emission for
            // an already-pending state is deduplicated by the driver.
            (Self::Syncing { .. }, Event::SyncRequested) => (
                Self::Syncing { pending: true },
                vec![Action::EmitStatus(SyncStatus::Pending)],
            ),

            // Completion without pending work.
            (Self::Syncing { pending: false }, Event::SyncSucceeded) => {
                (Self::Idle, vec![Action::EmitStatus(SyncStatus::Idle)])
            }
            (Self::Syncing { pending: false }, Event::SyncFailed) => {
                (Self::Idle, vec![Action::EmitStatus(SyncStatus::Error)])
            }

            // Completion with pending work: schedule exactly one debounced
            // follow-up. Failure takes the same path - an error must not
            // poison the pending flag.
            (Self::Syncing { pending: true }, Event::SyncSucceeded) => (
                Self::Debouncing,
                vec![
                    Action::EmitStatus(SyncStatus::Idle),
                    Action::StartDebounce,
                ],
            ),
            (Self::Syncing { pending: true }, Event::SyncFailed) => (
                Self::Debouncing,
                vec![
                    Action::EmitStatus(SyncStatus::Error),
                    Action::StartDebounce,
                ],
            ),

            // A request while a follow-up is already scheduled coalesces
            // into it and restarts the wait window: the most recent
            // trigger wins, and at most one timer exists at any time.
            (Self::Debouncing, Event::SyncRequested) => (
                Self::Debouncing,
                vec![
                    Action::EmitStatus(SyncStatus::Pending),
                    Action::CancelDebounce,
                    Action::StartDebounce,
                ],
            ),

            // Timer fired: run the follow-up through the same single-flight
            // path as a direct request.
            (Self::Debouncing, Event::DebounceElapsed) => (
                Self::Syncing { pending: false },
                vec![Action::EmitStatus(SyncStatus::Syncing), Action::BeginSync],
            ),

            // Disposal cancels scheduled work and drops the pending flag,
            // but leaves an in-flight call alone (it cannot be cancelled
            // from here). No status is emitted.
            (Self::Debouncing, Event::DisposeRequested) => {
                (Self::Idle, vec![Action::CancelDebounce])
            }
            (Self::Syncing { .. }, Event::DisposeRequested) => {
                (Self::Syncing { pending: false }, vec![])
            }

            // Everything else (stale timer fires, completion events outside
            // Syncing, dispose when already Idle) is a no-op.
            (state, _) => (state, vec![]),
        }
    }

    /// Check if a transport call is physically executing.
    pub fn is_syncing(&self) -> bool {
        matches!(self, Self::Syncing { .. })
    }

    /// Check if a follow-up sync is scheduled behind the debounce timer.
    pub fn is_debouncing(&self) -> bool {
        matches!(self, Self::Debouncing)
    }

    /// Check if a request is waiting behind the in-flight call.
    pub fn has_pending(&self) -> bool {
        matches!(self, Self::Syncing { pending: true })
    }
}

impl Default for CoordinatorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Events that can occur in the sync lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A caller asked for a sync.
    SyncRequested,
    /// The in-flight transport call completed successfully.
    SyncSucceeded,
    /// The in-flight transport call failed.
    SyncFailed,
    /// The debounce timer fired.
    DebounceElapsed,
    /// The owner is shutting the coordinator down.
    DisposeRequested,
}

/// Actions to be executed by the sync-client driver.
///
/// These are instructions, not side effects. The driver interprets them
/// and performs the actual I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Invoke the transport. Produced only from Idle or from a fired
    /// debounce timer, never while a call is already in flight.
    BeginSync,
    /// Arm the debounce timer for one window.
    StartDebounce,
    /// Cancel the armed debounce timer, if any.
    CancelDebounce,
    /// Report a status transition to the observer.
    EmitStatus(SyncStatus),
}
