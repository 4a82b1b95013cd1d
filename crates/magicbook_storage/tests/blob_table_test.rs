//! Tests for the blob table backends.

use magicbook_error::{MagicBookErrorKind, StorageErrorKind};
use magicbook_storage::{AddOutcome, BlobTable, FileSystemBlobTable, MemoryBlobTable};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_open_creates_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("media").join("nested");
    let table = FileSystemBlobTable::new(&root);

    assert!(!root.exists());
    table.open().await.unwrap();
    assert!(root.exists());

    // Opening again is a no-op
    table.open().await.unwrap();
}

#[tokio::test]
async fn test_filesystem_add_and_get() {
    let temp_dir = TempDir::new().unwrap();
    let table = FileSystemBlobTable::new(temp_dir.path());
    table.open().await.unwrap();

    assert_eq!(table.get("Lighthouse").await.unwrap(), None);
    assert_eq!(
        table.add("Lighthouse", b"png bytes").await.unwrap(),
        AddOutcome::Inserted
    );
    assert_eq!(
        table.get("Lighthouse").await.unwrap(),
        Some(b"png bytes".to_vec())
    );
    assert!(table.contains("Lighthouse").await.unwrap());
}

#[tokio::test]
async fn test_filesystem_add_is_write_once() {
    let temp_dir = TempDir::new().unwrap();
    let table = FileSystemBlobTable::new(temp_dir.path());
    table.open().await.unwrap();

    table.add("Tide", b"first").await.unwrap();
    let outcome = table.add("Tide", b"second").await.unwrap();

    assert_eq!(outcome, AddOutcome::Duplicate);
    assert_eq!(table.get("Tide").await.unwrap(), Some(b"first".to_vec()));
}

#[tokio::test]
async fn test_filesystem_empty_key_is_storable() {
    let temp_dir = TempDir::new().unwrap();
    let table = FileSystemBlobTable::new(temp_dir.path());
    table.open().await.unwrap();

    table.add("", b"digits only").await.unwrap();
    assert_eq!(table.get("").await.unwrap(), Some(b"digits only".to_vec()));
}

#[tokio::test]
async fn test_filesystem_delete() {
    let temp_dir = TempDir::new().unwrap();
    let table = FileSystemBlobTable::new(temp_dir.path());
    table.open().await.unwrap();

    table.add("Gone", b"bytes").await.unwrap();
    assert!(table.delete("Gone").await.unwrap());
    assert!(!table.contains("Gone").await.unwrap());
    assert!(!table.delete("Gone").await.unwrap());

    // After deletion the key can be written again
    assert_eq!(
        table.add("Gone", b"again").await.unwrap(),
        AddOutcome::Inserted
    );
}

#[tokio::test]
async fn test_filesystem_concurrent_adds_keep_one_payload() {
    let temp_dir = TempDir::new().unwrap();
    let table = Arc::new(FileSystemBlobTable::new(temp_dir.path()));
    table.open().await.unwrap();

    let mut handles = Vec::new();
    for i in 0..8u8 {
        let table = Arc::clone(&table);
        handles.push(tokio::spawn(async move { table.add("Race", &[i; 16]).await }));
    }

    let mut inserted = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() == AddOutcome::Inserted {
            inserted += 1;
        }
    }
    assert_eq!(inserted, 1);

    let stored = table.get("Race").await.unwrap().unwrap();
    assert_eq!(stored.len(), 16);
    assert!(stored.iter().all(|b| *b == stored[0]));
}

#[tokio::test]
async fn test_memory_table_is_write_once() {
    let table = MemoryBlobTable::new();
    table.open().await.unwrap();

    assert!(table.is_empty().await);
    assert_eq!(table.add("Key", b"one").await.unwrap(), AddOutcome::Inserted);
    assert_eq!(table.add("Key", b"two").await.unwrap(), AddOutcome::Duplicate);
    assert_eq!(table.get("Key").await.unwrap(), Some(b"one".to_vec()));
    assert_eq!(table.len().await, 1);

    assert!(table.delete("Key").await.unwrap());
    assert!(table.is_empty().await);
}

#[tokio::test]
async fn test_filesystem_lookup_errors_are_not_reported_as_absent() {
    let temp_dir = TempDir::new().unwrap();
    // Base path is a regular file, so every entry path lies under a non-directory
    let root = temp_dir.path().join("not-a-directory");
    std::fs::write(&root, b"plain file").unwrap();
    let table = FileSystemBlobTable::new(&root);

    let err = table.contains("Lighthouse").await.unwrap_err();
    match err.kind() {
        MagicBookErrorKind::Storage(e) => {
            assert!(matches!(e.kind, StorageErrorKind::FileRead(_)))
        }
        other => panic!("unexpected error: {}", other),
    }

    let err = table.add("Lighthouse", b"png bytes").await.unwrap_err();
    assert!(matches!(err.kind(), MagicBookErrorKind::Storage(_)));
}
