//! Snapshot of a tracked operation.
//!
//! `AsyncState` pairs a `Status` with the payload that status allows:
//! data for Success, an error for Error, nothing for Idle. Loading keeps
//! whichever payload the previous state carried so a refetch can still show
//! the last result. Data and error are never present together.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::Status;

// =============================================================================
// AsyncState
// =============================================================================

/// The state of one tracked operation.
///
/// Fields are private: the constructors are the only way to build a state,
/// which keeps `data` and `error` mutually exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawState<D, E>")]
pub struct AsyncState<D, E> {
    status: Status,
    data: Option<D>,
    error: Option<E>,
}

impl<D, E> AsyncState<D, E> {
    /// Nothing has run yet.
    pub fn idle() -> Self {
        Self {
            status: Status::Idle,
            data: None,
            error: None,
        }
    }

    /// The operation resolved with `data`.
    pub fn success(data: D) -> Self {
        Self {
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    /// The operation failed with `error`.
    pub fn failed(error: E) -> Self {
        Self {
            status: Status::Error,
            data: None,
            error: Some(error),
        }
    }

    /// Move into Loading, keeping the current payload.
    pub fn into_loading(self) -> Self {
        Self {
            status: Status::Loading,
            ..self
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&E> {
        self.error.as_ref()
    }

    /// Split into status, data and error.
    pub fn into_parts(self) -> (Status, Option<D>, Option<E>) {
        (self.status, self.data, self.error)
    }

    pub fn is_idle(&self) -> bool {
        self.status == Status::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

impl<D, E> Default for AsyncState<D, E> {
    fn default() -> Self {
        Self::idle()
    }
}

// =============================================================================
// Deserialization
// =============================================================================

/// Unchecked wire form, validated into `AsyncState`.
#[derive(Deserialize)]
struct RawState<D, E> {
    #[serde(default)]
    status: Status,
    data: Option<D>,
    error: Option<E>,
}

/// A snapshot whose payload does not match its status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {status} snapshot: {reason}")]
pub struct InvalidSnapshot {
    status: Status,
    reason: &'static str,
}

impl<D, E> TryFrom<RawState<D, E>> for AsyncState<D, E> {
    type Error = InvalidSnapshot;

    fn try_from(raw: RawState<D, E>) -> Result<Self, Self::Error> {
        let reject = |reason| {
            Err(InvalidSnapshot {
                status: raw.status,
                reason,
            })
        };

        match (raw.status, raw.data.is_some(), raw.error.is_some()) {
            (_, true, true) => return reject("data and error are both set"),
            (Status::Idle, false, false) => {}
            (Status::Idle, _, _) => return reject("idle carries no payload"),
            (Status::Success, false, _) => return reject("success requires data"),
            (Status::Error, _, false) => return reject("error requires an error"),
            _ => {}
        }

        Ok(Self {
            status: raw.status,
            data: raw.data,
            error: raw.error,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
