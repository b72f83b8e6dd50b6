//! Component identity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a component.
///
/// Fresh ids are random UUID v4 strings. Any string is accepted when an id is
/// restored from an envelope, so ids produced by other writers survive a
/// round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    /// Create a new random ComponentId
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a ComponentId from an existing string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
