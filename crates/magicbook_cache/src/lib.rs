//! Get-or-generate caching for generated media.
//!
//! Generated images and narration are expensive, so every request goes
//! through [`GenerationCache::fetch_or_generate`]: a stored payload is
//! returned as-is, otherwise the supplied generator runs and its result is
//! stored before being returned. Payloads persist in a
//! [`magicbook_storage::BlobTable`] across sessions.

#![warn(missing_docs)]

mod cache;
mod key;

pub use cache::{CacheStats, GenerationCache};
pub use key::CacheKey;
