//! Retry configuration and the stored retry thunk.

use std::fmt;
use std::sync::Arc;

use crate::deferred::Deferred;

/// Builds a fresh operation each time `retry` fires.
pub type RetryFactory<D, E> = Arc<dyn Fn() -> Deferred<D, E> + Send + Sync>;

/// Per-run options passed to `AsyncStateTracker::run`.
pub struct RunConfig<D, E> {
    pub(crate) retry: RetryFactory<D, E>,
}

impl<D, E> RunConfig<D, E> {
    /// Re-run with whatever `factory` returns when `retry` is called.
    pub fn retry<F>(factory: F) -> Self
    where
        F: Fn() -> Deferred<D, E> + Send + Sync + 'static,
    {
        Self {
            retry: Arc::new(factory),
        }
    }

    pub(crate) fn make_operation(&self) -> Deferred<D, E> {
        (self.retry)()
    }
}

impl<D, E> Clone for RunConfig<D, E> {
    fn clone(&self) -> Self {
        Self {
            retry: Arc::clone(&self.retry),
        }
    }
}

impl<D, E> fmt::Debug for RunConfig<D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig").finish_non_exhaustive()
    }
}

/// Zero-argument action stored by the tracker and invoked by `retry`.
pub(crate) type RetryThunk = Arc<dyn Fn() + Send + Sync>;

/// The thunk installed before any retryable run.
pub(crate) fn noop() -> RetryThunk {
    Arc::new(|| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_factory_called_per_operation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let config = RunConfig::<i32, String>::retry(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Deferred::ready(Ok(1))
        });

        assert!(config.make_operation().is_valid());
        assert!(config.clone().make_operation().is_valid());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
