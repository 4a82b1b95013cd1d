//! The blob table abstraction.

use magicbook_error::MagicBookResult;
use std::sync::Arc;

/// Result of [`BlobTable::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum AddOutcome {
    /// The entry was written
    Inserted,
    /// An entry already existed under the key; nothing was written
    Duplicate,
}

/// Trait for pluggable write-once blob storage.
///
/// Implementations must never overwrite an existing entry: the first payload
/// stored under a key is the one every later `get` returns until the entry
/// is deleted.
#[async_trait::async_trait]
pub trait BlobTable: Send + Sync {
    /// Prepare the table for use, creating its schema when it is absent.
    ///
    /// Must be idempotent; called before every cache operation.
    async fn open(&self) -> MagicBookResult<()>;

    /// Look up the payload stored under `key`.
    async fn get(&self, key: &str) -> MagicBookResult<Option<Vec<u8>>>;

    /// Store `data` under `key` unless an entry already exists.
    async fn add(&self, key: &str, data: &[u8]) -> MagicBookResult<AddOutcome>;

    /// Remove the entry under `key`.
    ///
    /// Returns `true` if an entry was removed, `false` if none existed.
    async fn delete(&self, key: &str) -> MagicBookResult<bool>;

    /// Check whether an entry exists under `key`.
    async fn contains(&self, key: &str) -> MagicBookResult<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Backend name for logging (e.g., "filesystem", "memory").
    fn backend_name(&self) -> &'static str;
}

#[async_trait::async_trait]
impl<T: BlobTable + ?Sized> BlobTable for Arc<T> {
    async fn open(&self) -> MagicBookResult<()> {
        (**self).open().await
    }

    async fn get(&self, key: &str) -> MagicBookResult<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn add(&self, key: &str, data: &[u8]) -> MagicBookResult<AddOutcome> {
        (**self).add(key, data).await
    }

    async fn delete(&self, key: &str) -> MagicBookResult<bool> {
        (**self).delete(key).await
    }

    async fn contains(&self, key: &str) -> MagicBookResult<bool> {
        (**self).contains(key).await
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}
