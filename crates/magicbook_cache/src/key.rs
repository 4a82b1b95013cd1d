//! Cache key derivation.

use serde::{Deserialize, Serialize};

/// Cache key derived from the exact text a payload was generated from.
///
/// Every character outside `A-Z`/`a-z` is dropped. Texts that differ only in
/// punctuation, digits, whitespace or combining marks share one entry, so a
/// decomposed `"Cafe\u{301}"` and `"Cafe!"` both map to `"Cafe"`. A
/// precomposed `'é'` is dropped whole. Existing tables depend on this rule;
/// changing it orphans every stored entry.
///
/// # Examples
///
/// ```
/// use magicbook_cache::CacheKey;
///
/// assert_eq!(CacheKey::from_text("Cafe\u{301}"), CacheKey::from_text("Cafe!"));
/// assert_eq!(CacheKey::from_text("Caf\u{e9}").as_str(), "Caf");
/// assert_eq!(CacheKey::from_text("It's 9 o'clock."), CacheKey::from_text("Its oclock"));
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[display("{}", _0)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for `text`.
    pub fn from_text(text: &str) -> Self {
        Self(text.chars().filter(char::is_ascii_alphabetic).collect())
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether nothing survived stripping.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_everything_but_latin_letters() {
        let key = CacheKey::from_text("  A tree: 3 nodes, (troff) layout!\n");
        assert_eq!(key.as_str(), "Atreenodestrofflayout");
    }

    #[test]
    fn test_non_latin_text_strips_to_empty() {
        assert!(CacheKey::from_text("東京 2024").is_empty());
    }

    #[test]
    fn test_case_is_preserved() {
        assert_ne!(CacheKey::from_text("Tide"), CacheKey::from_text("tide"));
    }
}
