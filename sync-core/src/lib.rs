//! # sync-core
//!
//! Pure coordination logic for Bloom journal sync (no I/O, instant tests).
//!
//! This crate implements the single-flight/debounce state machine and the
//! backoff arithmetic without any network, timers, or disk I/O, enabling
//! fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (transport calls, debounce timers) is performed by
//! `sync-client`, which interprets the actions produced by the state machine.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backoff;
pub mod coordinator;

pub use backoff::backoff_delay;
pub use coordinator::{Action, CoordinatorState, Event, DEFAULT_DEBOUNCE_WINDOW};
