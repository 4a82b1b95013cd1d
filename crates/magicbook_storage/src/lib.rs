//! Persistence for Magicbook.
//!
//! Two stores live here:
//!
//! - **Blob table** ([`BlobTable`]): opaque generated media keyed by text.
//!   Entries are write-once; adding an existing key leaves the first payload
//!   in place and reports [`AddOutcome::Duplicate`].
//! - **Bookshelf** ([`Bookshelf`]): one JSON document per generated book,
//!   keyed by [`magicbook_core::BookKey`].
//!
//! # Example
//!
//! ```rust
//! use magicbook_storage::{AddOutcome, BlobTable, MemoryBlobTable};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let table = MemoryBlobTable::new();
//! table.open().await?;
//!
//! assert_eq!(table.add("Cafe", b"first").await?, AddOutcome::Inserted);
//! assert_eq!(table.add("Cafe", b"second").await?, AddOutcome::Duplicate);
//! assert_eq!(table.get("Cafe").await?, Some(b"first".to_vec()));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod blob;
mod bookshelf;
mod filesystem;
mod memory;

pub use blob::{AddOutcome, BlobTable};
pub use bookshelf::Bookshelf;
pub use filesystem::FileSystemBlobTable;
pub use memory::MemoryBlobTable;
pub use magicbook_error::{StorageError, StorageErrorKind};
