//! Async request-state tracker for the settle workspace.
//!
//! This crate provides:
//! - `AsyncStateTracker` - owns the state of one in-flight operation
//! - `Deferred` - the operation handed to `run`
//! - `RunConfig` - how `retry` rebuilds the last operation
//! - `RunFuture` / `Settled` - what `run` hands back
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──run──▶ Loading ──ok──▶ Success
//!                  │
//!                  └────err───▶ Error
//! ```
//!
//! `set_data` and `set_error` jump straight to Success or Error from any
//! state. Every transition is broadcast to subscribers.

mod deferred;
mod retry;
mod run;
mod tracker;

pub use deferred::Deferred;
pub use retry::{RetryFactory, RunConfig};
pub use run::{RunFuture, Settled};
pub use tracker::AsyncStateTracker;

// Re-export settle_core types for convenience
pub use settle_core::{AsyncState, Status, TrackerConfig, TrackerError};
