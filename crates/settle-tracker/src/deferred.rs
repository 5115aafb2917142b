//! The operation handed to `AsyncStateTracker::run`.

use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;

/// A pending computation that resolves to `Result<D, E>`, or nothing at all.
///
/// An empty `Deferred` stands in for "not an operation": `run` rejects it
/// with `TrackerError::InvalidArgument` before touching any state.
pub struct Deferred<D, E> {
    inner: Option<BoxFuture<'static, Result<D, E>>>,
}

impl<D, E> Deferred<D, E> {
    /// Wrap a future.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<D, E>> + Send + 'static,
    {
        Self {
            inner: Some(future.boxed()),
        }
    }

    /// An operation that has already settled.
    pub fn ready(result: Result<D, E>) -> Self
    where
        D: Send + 'static,
        E: Send + 'static,
    {
        Self::new(futures::future::ready(result))
    }

    /// No operation.
    pub fn empty() -> Self {
        Self { inner: None }
    }

    /// Wrap a future if there is one.
    pub fn from_option<F>(future: Option<F>) -> Self
    where
        F: Future<Output = Result<D, E>> + Send + 'static,
    {
        future.map(Self::new).unwrap_or_else(Self::empty)
    }

    /// Whether this holds a future.
    pub fn is_valid(&self) -> bool {
        self.inner.is_some()
    }

    pub(crate) fn into_future(self) -> Option<BoxFuture<'static, Result<D, E>>> {
        self.inner
    }
}

impl<D, E> fmt::Debug for Deferred<D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("valid", &self.is_valid())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(Deferred::<i32, String>::ready(Ok(1)).is_valid());
        assert!(!Deferred::<i32, String>::empty().is_valid());
    }

    #[test]
    fn test_from_option() {
        let some = Deferred::from_option(Some(async { Ok::<_, String>(1) }));
        assert!(some.is_valid());

        let none: Deferred<i32, String> =
            Deferred::from_option(None::<futures::future::Ready<Result<i32, String>>>);
        assert!(!none.is_valid());
    }

    #[tokio::test]
    async fn test_resolves_wrapped_future() {
        let deferred = Deferred::<i32, String>::new(async { Ok(5) });
        let result = deferred.into_future().unwrap().await;
        assert_eq!(result, Ok(5));
    }
}
