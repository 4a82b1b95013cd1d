//! Flat document store for generated books.

use magicbook_core::{Book, BookKey};
use magicbook_error::{JsonError, MagicBookResult, StorageError, StorageErrorKind};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One JSON file per book under a directory, named after the key hash.
///
/// Storing a book under an existing key replaces it: re-running a prompt
/// yields a fresh book.
#[derive(Debug, Clone)]
pub struct Bookshelf {
    directory: PathBuf,
}

impl Bookshelf {
    /// Create a bookshelf rooted at `directory`.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(directory))]
    pub fn new(directory: impl Into<PathBuf>) -> MagicBookResult<Self> {
        let directory = directory.into();

        std::fs::create_dir_all(&directory).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                directory.display(),
                e
            )))
        })?;

        tracing::debug!(path = %directory.display(), "Opened bookshelf");
        Ok(Self { directory })
    }

    /// Root directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &BookKey) -> PathBuf {
        self.directory.join(format!("{}.json", key.hash()))
    }

    /// Store a book and return its key.
    #[tracing::instrument(skip(self, book), fields(prompt = %book.prompt()))]
    pub async fn put(&self, book: &Book) -> MagicBookResult<BookKey> {
        let key = book.key();
        let path = self.path_for(&key);
        let json = serde_json::to_vec_pretty(book)
            .map_err(|e| JsonError::new(format!("Failed to serialize book: {}", e)))?;

        tokio::fs::write(&path, json).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        tracing::info!(key = %key, path = %path.display(), "Stored book");
        Ok(key)
    }

    /// Load the book stored under `key`, if any.
    #[tracing::instrument(skip(self), fields(key = %key))]
    pub async fn get(&self, key: &BookKey) -> MagicBookResult<Option<Book>> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(Self::decode(&path, &bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    /// Remove the book stored under `key`. Returns whether one existed.
    pub async fn remove(&self, key: &BookKey) -> MagicBookResult<bool> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "delete {}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    /// Enumerate every stored book, newest first.
    ///
    /// Files that are not valid books are skipped with a warning so one bad
    /// document does not hide the rest of the library.
    #[tracing::instrument(skip(self), fields(path = %self.directory.display()))]
    pub async fn list(&self) -> MagicBookResult<Vec<Book>> {
        let mut entries = tokio::fs::read_dir(&self.directory).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                self.directory.display(),
                e
            )))
        })?;

        let mut books = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                self.directory.display(),
                e
            )))
        })? {
            let path = entry.path();
            let is_key_file = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(BookKey::parse)
                .is_some();
            if !is_key_file || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable book");
                    continue;
                }
            };
            match Self::decode(&path, &bytes) {
                Ok(book) => books.push(book),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping malformed book"),
            }
        }

        books.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        tracing::debug!(count = books.len(), "Listed books");
        Ok(books)
    }

    fn decode(path: &Path, bytes: &[u8]) -> MagicBookResult<Book> {
        serde_json::from_slice(bytes).map_err(|e| {
            JsonError::new(format!("Failed to parse {}: {}", path.display(), e)).into()
        })
    }
}
