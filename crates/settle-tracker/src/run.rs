//! What `AsyncStateTracker::run` hands back.

use futures::future::BoxFuture;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// How a run settled when the failure was absorbed.
///
/// With `throw_on_error` off, a failing operation still resolves the
/// `RunFuture` successfully, carrying the error as `Settled::Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<D, E> {
    Data(D),
    Error(E),
}

impl<D, E> Settled<D, E> {
    pub fn is_data(&self) -> bool {
        matches!(self, Settled::Data(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Settled::Error(_))
    }

    /// Convert back into a plain `Result`.
    pub fn into_result(self) -> Result<D, E> {
        match self {
            Settled::Data(data) => Ok(data),
            Settled::Error(error) => Err(error),
        }
    }
}

/// The pending result of `run`.
///
/// State has already moved to Loading when this is returned. The wrapped
/// operation only makes progress while this future is polled; the Success or
/// Error transition happens when it completes.
#[must_use = "the operation does not settle unless the future is awaited"]
pub struct RunFuture<D, E> {
    inner: BoxFuture<'static, Result<Settled<D, E>, E>>,
}

impl<D, E> RunFuture<D, E> {
    pub(crate) fn new(inner: BoxFuture<'static, Result<Settled<D, E>, E>>) -> Self {
        Self { inner }
    }
}

impl<D, E> Future for RunFuture<D, E> {
    type Output = Result<Settled<D, E>, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}
