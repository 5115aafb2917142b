//! Error types for the settle tracker.

use thiserror::Error;

/// Errors raised by the tracker itself.
///
/// Failures of the wrapped operation are not represented here; they are the
/// caller's own error type and flow through the Error state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// `run` was handed something that is not a pending operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}
