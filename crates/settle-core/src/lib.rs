//! Core types for the settle async state tracker.
//!
//! This crate contains the data structures shared by every settle crate:
//! - The `Status` enum and the `AsyncState` snapshot
//! - Tracker configuration
//! - Error types

mod config;
mod error;
mod state;
mod status;

pub use config::TrackerConfig;
pub use error::{ConfigError, TrackerError};
pub use state::{AsyncState, InvalidSnapshot};
pub use status::Status;
