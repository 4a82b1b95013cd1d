//! Get-or-generate cache over a blob table.

use crate::CacheKey;
use derive_getters::Getters;
use magicbook_error::MagicBookResult;
use magicbook_storage::{AddOutcome, BlobTable};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one cache instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters)]
pub struct CacheStats {
    /// Lookups answered from the table
    hits: u64,
    /// Lookups that ran the generator
    misses: u64,
    /// Generated payloads written to the table
    stored: u64,
    /// Generator runs that failed
    failures: u64,
}

/// Cache for generated media.
///
/// Stores opaque bytes; images and narration share one table and are told
/// apart only by the text they were generated from.
///
/// There is no per-key locking. Two concurrent misses for the same key both
/// run their generator; the table keeps whichever payload is stored first
/// and both callers get their own result back.
///
/// # Example
///
/// ```
/// use magicbook_cache::GenerationCache;
/// use magicbook_error::MagicBookResult;
/// use magicbook_storage::MemoryBlobTable;
///
/// # async fn example() -> MagicBookResult<()> {
/// let cache = GenerationCache::new(MemoryBlobTable::new());
///
/// let audio = cache
///     .fetch_or_generate("The keeper waits.", || async { Ok(b"mp3".to_vec()) })
///     .await?;
/// assert_eq!(audio, b"mp3");
///
/// // Second call is a hit; the generator is not run
/// let again = cache
///     .fetch_or_generate("The keeper waits.", || async { Ok(b"other".to_vec()) })
///     .await?;
/// assert_eq!(again, b"mp3");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GenerationCache<T> {
    table: T,
    hits: AtomicU64,
    misses: AtomicU64,
    stored: AtomicU64,
    failures: AtomicU64,
}

impl<T: BlobTable> GenerationCache<T> {
    /// Create a cache over `table`.
    pub fn new(table: T) -> Self {
        tracing::debug!(backend = table.backend_name(), "Creating generation cache");
        Self {
            table,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stored: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// The underlying table.
    pub fn table(&self) -> &T {
        &self.table
    }

    /// Return the payload stored for `source_text`, or run `generate`, store
    /// its result and return it.
    ///
    /// `generate` runs only on a miss. If it fails the error is returned and
    /// nothing is stored. Table errors are returned as-is.
    ///
    /// # Errors
    ///
    /// Returns the generator's error, or a storage error if the table cannot
    /// be opened, read or written.
    #[tracing::instrument(
        skip(self, source_text, generate),
        fields(key, backend = self.table.backend_name())
    )]
    pub async fn fetch_or_generate<F, Fut>(
        &self,
        source_text: &str,
        generate: F,
    ) -> MagicBookResult<Vec<u8>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = MagicBookResult<Vec<u8>>>,
    {
        let key = CacheKey::from_text(source_text);
        tracing::Span::current().record("key", key.as_str());

        self.table.open().await?;

        if let Some(payload) = self.table.get(key.as_str()).await? {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(size = payload.len(), "Cache hit");
            return Ok(payload);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Cache miss, generating");

        let payload = match generate().await {
            Ok(payload) => payload,
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        match self.table.add(key.as_str(), &payload).await? {
            AddOutcome::Inserted => {
                self.stored.fetch_add(1, Ordering::Relaxed);
                tracing::info!(size = payload.len(), "Cached generated payload");
            }
            AddOutcome::Duplicate => {
                tracing::debug!("Entry appeared while generating, first payload kept");
            }
        }

        Ok(payload)
    }

    /// Remove the entry for `key`. Returns whether one existed.
    #[tracing::instrument(skip(self), fields(key = %key))]
    pub async fn evict(&self, key: &CacheKey) -> MagicBookResult<bool> {
        self.table.open().await?;
        let removed = self.table.delete(key.as_str()).await?;
        tracing::info!(removed, "Evicted cache entry");
        Ok(removed)
    }

    /// Whether an entry exists for `source_text`.
    pub async fn contains(&self, source_text: &str) -> MagicBookResult<bool> {
        self.table.open().await?;
        self.table
            .contains(CacheKey::from_text(source_text).as_str())
            .await
    }

    /// Snapshot of the hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stored: self.stored.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}
