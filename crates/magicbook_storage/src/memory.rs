//! In-memory blob table.

use crate::{AddOutcome, BlobTable};
use magicbook_error::MagicBookResult;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;

/// Blob table held in process memory. Nothing survives the process; useful
/// for tests and for running without a cache directory.
#[derive(Debug, Default)]
pub struct MemoryBlobTable {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the table is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl BlobTable for MemoryBlobTable {
    async fn open(&self) -> MagicBookResult<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> MagicBookResult<Option<Vec<u8>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    async fn add(&self, key: &str, data: &[u8]) -> MagicBookResult<AddOutcome> {
        match self.entries.write().await.entry(key.to_string()) {
            Entry::Occupied(_) => {
                tracing::debug!("Entry already exists, keeping first payload");
                Ok(AddOutcome::Duplicate)
            }
            Entry::Vacant(slot) => {
                slot.insert(data.to_vec());
                Ok(AddOutcome::Inserted)
            }
        }
    }

    async fn delete(&self, key: &str) -> MagicBookResult<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn contains(&self, key: &str) -> MagicBookResult<bool> {
        Ok(self.entries.read().await.contains_key(key))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
