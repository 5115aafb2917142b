//! Tracker configuration.
//!
//! Configuration is a single flat table. It is usually built in code, but can
//! also be read from a TOML file:
//!
//! ```toml
//! throw_on_error = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Options recognized by a tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Re-raise a failed operation's error to the caller of `run`.
    ///
    /// The error is recorded in the Error state either way.
    pub throw_on_error: bool,
}

impl TrackerConfig {
    /// Config that propagates failures to the caller of `run`.
    pub fn throwing() -> Self {
        Self {
            throw_on_error: true,
        }
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }
}
