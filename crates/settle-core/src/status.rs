//! Lifecycle status of a tracked operation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a tracked operation currently is. Exactly one variant holds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Nothing has run yet.
    #[default]
    Idle,
    Loading,
    Error,
    Success,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Idle => "idle",
            Status::Loading => "loading",
            Status::Error => "error",
            Status::Success => "success",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(Status::default(), Status::Idle);
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&Status::Loading).unwrap();
        assert_eq!(json, "\"loading\"");

        let parsed: Status = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(parsed, Status::Success);
    }

    #[test]
    fn test_display_matches_serde_name() {
        assert_eq!(Status::Error.to_string(), "error");
        assert_eq!(Status::Idle.to_string(), "idle");
    }
}
