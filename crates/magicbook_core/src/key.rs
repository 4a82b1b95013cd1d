//! Short prompt hashes used as bookshelf keys.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Bookshelf key: `book:` followed by the first 8 hex digits of the
/// SHA-256 of the prompt.
///
/// # Examples
///
/// ```
/// use magicbook_core::BookKey;
///
/// let key = BookKey::from_prompt("hello");
/// assert_eq!(key.as_str(), "book:2cf24dba");
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[display("{}", _0)]
pub struct BookKey(String);

impl BookKey {
    /// Prefix shared by every key.
    pub const PREFIX: &'static str = "book:";

    /// Derives the key for a prompt.
    pub fn from_prompt(prompt: &str) -> Self {
        let digest = Sha256::digest(prompt.as_bytes());
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        Self(format!("{}{}", Self::PREFIX, &hex[..8]))
    }

    /// Parses a key previously produced by [`BookKey::from_prompt`].
    ///
    /// Accepts both `book:1a2b3c4d` and the bare hash.
    pub fn parse(raw: &str) -> Option<Self> {
        let hash = raw.strip_prefix(Self::PREFIX).unwrap_or(raw);
        (hash.len() == 8 && hash.chars().all(|c| c.is_ascii_hexdigit()))
            .then(|| Self(format!("{}{}", Self::PREFIX, hash.to_ascii_lowercase())))
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The hash portion without the prefix.
    pub fn hash(&self) -> &str {
        &self.0[Self::PREFIX.len()..]
    }
}
