//! Tests for the flat book store.

use chrono::{Duration, TimeZone, Utc};
use magicbook_core::{Book, BookDraft, BookKey};
use magicbook_storage::Bookshelf;
use tempfile::TempDir;

fn book(prompt: &str, millis: i64) -> Book {
    let draft = BookDraft::builder()
        .title(format!("About {}", prompt))
        .page("A quiet harbor", &["Boats rest."])
        .build()
        .unwrap();
    Book::from_draft(prompt, draft, Utc.timestamp_millis_opt(millis).unwrap())
}

#[tokio::test]
async fn test_put_and_get() {
    let temp_dir = TempDir::new().unwrap();
    let shelf = Bookshelf::new(temp_dir.path()).unwrap();

    let stored = book("harbors", 1_000);
    let key = shelf.put(&stored).await.unwrap();

    assert_eq!(key, BookKey::from_prompt("harbors"));
    assert_eq!(shelf.get(&key).await.unwrap(), Some(stored));
}

#[tokio::test]
async fn test_get_missing_returns_none() {
    let temp_dir = TempDir::new().unwrap();
    let shelf = Bookshelf::new(temp_dir.path()).unwrap();

    let key = BookKey::from_prompt("never written");
    assert_eq!(shelf.get(&key).await.unwrap(), None);
}

#[tokio::test]
async fn test_put_same_prompt_replaces_book() {
    let temp_dir = TempDir::new().unwrap();
    let shelf = Bookshelf::new(temp_dir.path()).unwrap();

    shelf.put(&book("tides", 1_000)).await.unwrap();
    let newer = book("tides", 2_000);
    let key = shelf.put(&newer).await.unwrap();

    assert_eq!(shelf.get(&key).await.unwrap(), Some(newer));
    assert_eq!(shelf.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_is_newest_first_and_skips_junk() {
    let temp_dir = TempDir::new().unwrap();
    let shelf = Bookshelf::new(temp_dir.path()).unwrap();

    let base = Utc::now();
    let older = Book::from_draft(
        "older",
        BookDraft::builder().page("Dawn", &[]).build().unwrap(),
        base - Duration::hours(1),
    );
    let newer = Book::from_draft(
        "newer",
        BookDraft::builder().page("Dusk", &[]).build().unwrap(),
        base,
    );
    shelf.put(&older).await.unwrap();
    shelf.put(&newer).await.unwrap();

    std::fs::write(temp_dir.path().join("notes.txt"), "ignore me").unwrap();
    std::fs::write(temp_dir.path().join("deadbeef.json"), "{ broken").unwrap();

    let books = shelf.list().await.unwrap();
    let prompts: Vec<_> = books.iter().map(|b| b.prompt().as_str()).collect();
    assert_eq!(prompts, vec!["newer", "older"]);
}

#[tokio::test]
async fn test_remove() {
    let temp_dir = TempDir::new().unwrap();
    let shelf = Bookshelf::new(temp_dir.path()).unwrap();

    let key = shelf.put(&book("gone", 5)).await.unwrap();
    assert!(shelf.remove(&key).await.unwrap());
    assert!(!shelf.remove(&key).await.unwrap());
    assert!(shelf.list().await.unwrap().is_empty());
}
