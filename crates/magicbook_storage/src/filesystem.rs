//! Filesystem-based blob table.
//!
//! Entries are stored one file per key, addressed by the SHA-256 of the key
//! so that arbitrary key text (including the empty string) maps to a valid
//! file name.

use crate::{AddOutcome, BlobTable};
use magicbook_error::{MagicBookResult, StorageError, StorageErrorKind};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem blob table.
///
/// Layout: `{base_path}/{hash[0:2]}/{hash}` where `hash` is the hex SHA-256
/// of the entry key.
///
/// ```text
/// ~/.cache/magicbook/media/
/// ├── 3a/
/// │   └── 3a7bd3e2360a3d...   (PNG bytes)
/// └── c4/
///     └── c4ca4238a0b923...   (MP3 bytes)
/// ```
///
/// Writes go to a uniquely named temp file which is then hard-linked into
/// place. Linking fails if the target exists, so a concurrent second writer
/// for the same key loses without touching the first payload.
#[derive(Debug, Clone)]
pub struct FileSystemBlobTable {
    base_path: PathBuf,
}

impl FileSystemBlobTable {
    /// Create a table rooted at `base_path`.
    ///
    /// The directory is not touched until [`BlobTable::open`] is called.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Root directory of the table.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn hash_key(key: &str) -> String {
        format!("{:x}", Sha256::digest(key.as_bytes()))
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let hash = Self::hash_key(key);
        self.base_path.join(&hash[0..2]).join(hash)
    }

    async fn exists(path: &Path) -> MagicBookResult<bool> {
        tokio::fs::try_exists(path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()
        })
    }
}

#[async_trait::async_trait]
impl BlobTable for FileSystemBlobTable {
    #[tracing::instrument(skip(self), fields(path = %self.base_path.display()))]
    async fn open(&self) -> MagicBookResult<()> {
        if Self::exists(&self.base_path).await? {
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.base_path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                self.base_path.display(),
                e
            )))
        })?;

        tracing::info!("Created blob table");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, key: &str) -> MagicBookResult<Option<Vec<u8>>> {
        let path = self.entry_path(key);

        match tokio::fs::read(&path).await {
            Ok(data) => {
                tracing::debug!(path = %path.display(), size = data.len(), "Read blob");
                Ok(Some(data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    async fn add(&self, key: &str, data: &[u8]) -> MagicBookResult<AddOutcome> {
        let path = self.entry_path(key);

        if Self::exists(&path).await? {
            tracing::debug!(path = %path.display(), "Entry already exists, keeping first payload");
            return Ok(AddOutcome::Duplicate);
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4()));
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        let linked = tokio::fs::hard_link(&temp_path, &path).await;
        if let Err(e) = tokio::fs::remove_file(&temp_path).await {
            tracing::warn!(path = %temp_path.display(), error = %e, "Failed to remove temp file");
        }

        match linked {
            Ok(()) => {
                tracing::info!(path = %path.display(), size = data.len(), "Stored blob");
                Ok(AddOutcome::Inserted)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!(path = %path.display(), "Lost write race, keeping first payload");
                Ok(AddOutcome::Duplicate)
            }
            Err(e) => Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "link {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
            .into()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, key: &str) -> MagicBookResult<bool> {
        let path = self.entry_path(key);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Deleted blob");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "delete {}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    async fn contains(&self, key: &str) -> MagicBookResult<bool> {
        Self::exists(&self.entry_path(key)).await
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
