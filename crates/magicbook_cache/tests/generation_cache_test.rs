//! Tests for get-or-generate semantics.

use magicbook_cache::{CacheKey, GenerationCache};
use magicbook_error::{
    GenerationError, GenerationErrorKind, MagicBookErrorKind, MagicBookResult, StorageError,
    StorageErrorKind,
};
use magicbook_storage::{AddOutcome, BlobTable, FileSystemBlobTable, MemoryBlobTable};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Generator that returns different bytes on every call.
struct CountingGenerator {
    calls: AtomicUsize,
}

impl CountingGenerator {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    async fn generate(&self) -> MagicBookResult<Vec<u8>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("payload-{}", n).into_bytes())
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn failing_generator() -> MagicBookResult<Vec<u8>> {
    Err(GenerationError::new(GenerationErrorKind::Api {
        status: 500,
        message: "Internal Server Error".to_string(),
    }))?
}

/// Table whose storage is unavailable.
struct BrokenTable;

#[async_trait::async_trait]
impl BlobTable for BrokenTable {
    async fn open(&self) -> MagicBookResult<()> {
        Err(StorageError::new(StorageErrorKind::Unavailable("disk gone".to_string())).into())
    }

    async fn get(&self, _key: &str) -> MagicBookResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn add(&self, _key: &str, _data: &[u8]) -> MagicBookResult<AddOutcome> {
        Ok(AddOutcome::Inserted)
    }

    async fn delete(&self, _key: &str) -> MagicBookResult<bool> {
        Ok(false)
    }

    fn backend_name(&self) -> &'static str {
        "broken"
    }
}

#[tokio::test]
async fn test_second_call_returns_first_payload() {
    let cache = GenerationCache::new(MemoryBlobTable::new());
    let generator = CountingGenerator::new();

    let first = cache
        .fetch_or_generate("A lighthouse at dusk", || generator.generate())
        .await
        .unwrap();
    let second = cache
        .fetch_or_generate("A lighthouse at dusk", || generator.generate())
        .await
        .unwrap();

    assert_eq!(first, b"payload-0");
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_repeated_requests_generate_once() {
    let cache = GenerationCache::new(MemoryBlobTable::new());
    let generator = CountingGenerator::new();

    for _ in 0..5 {
        cache
            .fetch_or_generate("The keeper waits.", || generator.generate())
            .await
            .unwrap();
    }

    assert_eq!(generator.calls(), 1);
    assert_eq!(*cache.stats().hits(), 4);
    assert_eq!(*cache.stats().misses(), 1);
    assert_eq!(*cache.stats().stored(), 1);
}

#[tokio::test]
async fn test_texts_with_same_stripped_form_share_entry() {
    let cache = GenerationCache::new(MemoryBlobTable::new());
    let generator = CountingGenerator::new();

    // Decomposed accent: 'e' followed by a combining acute accent
    let accented = "Cafe\u{301}";
    assert_eq!(CacheKey::from_text(accented), CacheKey::from_text("Cafe!"));

    let first = cache
        .fetch_or_generate(accented, || generator.generate())
        .await
        .unwrap();
    let second = cache
        .fetch_or_generate("Cafe!", || generator.generate())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_failed_generation_is_not_cached() {
    let cache = GenerationCache::new(MemoryBlobTable::new());

    let result = cache
        .fetch_or_generate("Storm", failing_generator)
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err.kind(), MagicBookErrorKind::Generation(_)));
    assert!(!cache.contains("Storm").await.unwrap());
    assert_eq!(*cache.stats().failures(), 1);

    let generator = CountingGenerator::new();
    let payload = cache
        .fetch_or_generate("Storm", || generator.generate())
        .await
        .unwrap();
    assert_eq!(payload, b"payload-0");
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_evict_forces_regeneration() {
    let cache = GenerationCache::new(MemoryBlobTable::new());
    let generator = CountingGenerator::new();

    cache
        .fetch_or_generate("Harbor", || generator.generate())
        .await
        .unwrap();
    assert!(cache.evict(&CacheKey::from_text("Harbor")).await.unwrap());
    assert!(!cache.evict(&CacheKey::from_text("Harbor")).await.unwrap());

    let regenerated = cache
        .fetch_or_generate("Harbor", || generator.generate())
        .await
        .unwrap();
    assert_eq!(regenerated, b"payload-1");
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn test_entries_persist_across_cache_instances() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("media");
    let generator = CountingGenerator::new();

    {
        let cache = GenerationCache::new(FileSystemBlobTable::new(&root));
        cache
            .fetch_or_generate("Night train", || generator.generate())
            .await
            .unwrap();
    }

    let cache = GenerationCache::new(FileSystemBlobTable::new(&root));
    let payload = cache
        .fetch_or_generate("Night train", || generator.generate())
        .await
        .unwrap();

    assert_eq!(payload, b"payload-0");
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_storage_failure_surfaces_without_generating() {
    let cache = GenerationCache::new(BrokenTable);
    let generator = CountingGenerator::new();

    let err = cache
        .fetch_or_generate("Anything", || generator.generate())
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), MagicBookErrorKind::Storage(_)));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_concurrent_misses_keep_first_stored_payload() {
    let cache = GenerationCache::new(MemoryBlobTable::new());
    let generator = CountingGenerator::new();

    let (a, b) = tokio::join!(
        cache.fetch_or_generate("Twin", || generator.generate()),
        cache.fetch_or_generate("Twin", || generator.generate()),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    let stored = cache.table().get("Twin").await.unwrap().unwrap();
    assert!(stored == a || stored == b);

    // Every later lookup sees the stored payload
    let later = cache
        .fetch_or_generate("Twin", || generator.generate())
        .await
        .unwrap();
    assert_eq!(later, stored);
}
