//! Narration voice identifiers.

use serde::{Deserialize, Serialize};

/// Speech-synthesis voice identifier.
///
/// # Examples
///
/// ```
/// use magicbook_core::Voice;
///
/// assert_eq!(Voice::default().as_str(), "alloy");
/// assert_eq!(Voice::from("nova").to_string(), "nova");
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display, derive_more::From,
)]
#[display("{}", _0)]
#[serde(transparent)]
pub struct Voice(String);

impl Voice {
    /// Voice used when a book does not specify one.
    pub const DEFAULT: &'static str = "alloy";

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl From<&str> for Voice {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
