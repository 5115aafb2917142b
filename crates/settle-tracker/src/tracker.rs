//! Tracker for the lifecycle of one asynchronous operation.
//!
//! The key rule is the same as any observable store here: mutation =
//! notification. Every transition goes through `Shared::replace` or
//! `Shared::update`, which broadcast the new snapshot to subscribers.

use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;

use settle_core::{AsyncState, Status, TrackerConfig, TrackerError};

use crate::deferred::Deferred;
use crate::retry::{self, RetryThunk, RunConfig};
use crate::run::{RunFuture, Settled};

/// Global counter for tagging runs in logs.
static RUN_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_run_id() -> u64 {
    RUN_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

// =============================================================================
// Shared State
// =============================================================================

struct Shared<D, E> {
    state: RwLock<AsyncState<D, E>>,
    /// Held across a write and its broadcast so snapshots go out in order.
    /// Never taken by readers.
    broadcast: Mutex<()>,
    tx: watch::Sender<AsyncState<D, E>>,
    rx: watch::Receiver<AsyncState<D, E>>,
    retry: RwLock<RetryThunk>,
    config: TrackerConfig,
}

impl<D, E> Shared<D, E>
where
    D: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Overwrite the state and broadcast it.
    fn replace(&self, next: AsyncState<D, E>) {
        self.update(|_| next);
    }

    /// Derive the next state from the current one and broadcast it.
    ///
    /// The state lock is released before sending: a subscriber holding a
    /// borrow of the channel may read the tracker while the send waits.
    fn update<F>(&self, f: F)
    where
        F: FnOnce(AsyncState<D, E>) -> AsyncState<D, E>,
    {
        let _order = self.broadcast.lock();
        let snapshot = {
            let mut state = self.state.write();
            *state = f(std::mem::take(&mut *state));
            state.clone()
        };
        self.tx.send_replace(snapshot);
    }
}

// =============================================================================
// AsyncStateTracker
// =============================================================================

/// Tracks one asynchronous operation through Idle, Loading, Error and Success.
///
/// The tracker is a handle: clones share the same state. State lives behind a
/// `parking_lot::RwLock` (never poisons) and every change is broadcast through
/// `tokio::sync::watch`.
///
/// ## Usage
///
/// ```ignore
/// let tracker = AsyncStateTracker::<u32, String>::new();
/// assert!(tracker.is_idle());
///
/// let pending = tracker.run(Deferred::ready(Ok(42)), None)?;
/// assert!(tracker.is_loading());
///
/// pending.await?;
/// assert_eq!(tracker.data(), Some(42));
/// ```
///
/// Overlapping runs are not sequenced: whichever settles last writes the
/// final state.
pub struct AsyncStateTracker<D, E> {
    shared: Arc<Shared<D, E>>,
}

impl<D, E> AsyncStateTracker<D, E>
where
    D: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create an idle tracker with the default config.
    pub fn new() -> Self {
        Self::from_parts(AsyncState::idle(), TrackerConfig::default())
    }

    /// Create a tracker starting from `state`.
    pub fn from_state(state: AsyncState<D, E>) -> Self {
        Self::from_parts(state, TrackerConfig::default())
    }

    /// Create an idle tracker with `config`.
    pub fn with_config(config: TrackerConfig) -> Self {
        Self::from_parts(AsyncState::idle(), config)
    }

    /// Create a tracker from an initial snapshot and a config.
    pub fn from_parts(state: AsyncState<D, E>, config: TrackerConfig) -> Self {
        let (tx, rx) = watch::channel(state.clone());
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(state),
                broadcast: Mutex::new(()),
                tx,
                rx,
                retry: RwLock::new(retry::noop()),
                config,
            }),
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Start tracking `operation`.
    ///
    /// Fails with `TrackerError::InvalidArgument` if `operation` is empty; in
    /// that case nothing changes. Otherwise the state moves to Loading before
    /// this returns and the retry thunk is replaced: with `config` it rebuilds
    /// the operation from the factory and runs it again, without it the thunk
    /// does nothing.
    ///
    /// The returned future settles the state. A failure resolves to
    /// `Settled::Error` unless `throw_on_error` is set, in which case the
    /// future returns `Err`.
    pub fn run(
        &self,
        operation: Deferred<D, E>,
        config: Option<RunConfig<D, E>>,
    ) -> Result<RunFuture<D, E>, TrackerError> {
        let Some(operation) = operation.into_future() else {
            return Err(TrackerError::InvalidArgument(
                "run expects a pending operation, got an empty one".to_string(),
            ));
        };

        let run_id = next_run_id();
        let thunk = match config {
            Some(config) => self.retry_thunk(config),
            None => retry::noop(),
        };
        *self.shared.retry.write() = thunk;

        self.shared.update(AsyncState::into_loading);
        tracing::debug!(run_id, "Run started, status: loading");

        let shared = Arc::downgrade(&self.shared);
        let throw_on_error = self.shared.config.throw_on_error;

        let settle = async move {
            match operation.await {
                Ok(data) => {
                    write_back(&shared, run_id, AsyncState::success(data.clone()));
                    Ok(Settled::Data(data))
                }
                Err(error) => {
                    write_back(&shared, run_id, AsyncState::failed(error.clone()));
                    if throw_on_error {
                        Err(error)
                    } else {
                        Ok(Settled::Error(error))
                    }
                }
            }
        };

        Ok(RunFuture::new(settle.boxed()))
    }

    /// Set Success with `data`, whatever the current state.
    pub fn set_data(&self, data: D) {
        self.shared.replace(AsyncState::success(data));
    }

    /// Set Error with `error`, whatever the current state.
    pub fn set_error(&self, error: E) {
        self.shared.replace(AsyncState::failed(error));
    }

    /// Invoke the retry thunk captured by the last `run`.
    ///
    /// Does nothing if no run has supplied a `RunConfig`. The restarted run
    /// is driven on the current tokio runtime.
    pub fn retry(&self) {
        let thunk = self.shared.retry.read().clone();
        thunk();
    }

    /// Build the thunk that re-runs with a fresh operation from `config`.
    fn retry_thunk(&self, config: RunConfig<D, E>) -> RetryThunk {
        let shared = Arc::downgrade(&self.shared);

        Arc::new(move || {
            let Some(shared) = shared.upgrade() else {
                tracing::debug!("Retry skipped: tracker dropped");
                return;
            };
            let Ok(handle) = tokio::runtime::Handle::try_current() else {
                tracing::warn!("Retry skipped: no tokio runtime to drive it");
                return;
            };

            let tracker = AsyncStateTracker { shared };
            match tracker.run(config.make_operation(), Some(config.clone())) {
                Ok(pending) => {
                    tracing::debug!("Retrying last operation");
                    handle.spawn(async move {
                        if pending.await.is_err() {
                            tracing::debug!("Retried operation failed");
                        }
                    });
                }
                Err(e) => tracing::warn!("Retry skipped: {}", e),
            }
        })
    }

    // =========================================================================
    // Read Methods
    // =========================================================================

    /// Snapshot of the current state.
    pub fn state(&self) -> AsyncState<D, E> {
        self.shared.state.read().clone()
    }

    /// Read the state with a closure, without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AsyncState<D, E>) -> R,
    {
        f(&*self.shared.state.read())
    }

    pub fn status(&self) -> Status {
        self.read(AsyncState::status)
    }

    pub fn data(&self) -> Option<D> {
        self.read(|s| s.data().cloned())
    }

    pub fn error(&self) -> Option<E> {
        self.read(|s| s.error().cloned())
    }

    pub fn is_idle(&self) -> bool {
        self.status() == Status::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.status() == Status::Loading
    }

    pub fn is_error(&self) -> bool {
        self.status() == Status::Error
    }

    pub fn is_success(&self) -> bool {
        self.status() == Status::Success
    }

    pub fn config(&self) -> TrackerConfig {
        self.shared.config
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribe to state changes.
    ///
    /// The receiver starts with the current state and sees every later
    /// transition. Clone the receiver for multiple subscribers.
    pub fn subscribe(&self) -> watch::Receiver<AsyncState<D, E>> {
        self.shared.rx.clone()
    }
}

/// Settle the tracker behind `shared`, if it still exists.
fn write_back<D, E>(shared: &Weak<Shared<D, E>>, run_id: u64, next: AsyncState<D, E>)
where
    D: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    match shared.upgrade() {
        Some(shared) => {
            tracing::debug!(run_id, "Run settled, status: {}", next.status());
            shared.replace(next);
        }
        None => tracing::debug!(run_id, "Run settled after tracker was dropped"),
    }
}

impl<D, E> Clone for AsyncStateTracker<D, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<D, E> Default for AsyncStateTracker<D, E>
where
    D: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<D, E> fmt::Debug for AsyncStateTracker<D, E>
where
    D: fmt::Debug,
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncStateTracker")
            .field("state", &*self.shared.state.read())
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
