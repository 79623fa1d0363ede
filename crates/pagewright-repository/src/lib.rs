//! Page loading and persistence for pagewright
//!
//! [`PageRepository`] fetches and saves pages through a [`ContentSource`].
//! Sources exchange loosely typed [`PageRecord`]s; the repository normalizes
//! them at this edge so the core only ever sees complete, keyed pages.
//!
//! ```rust,no_run
//! use pagewright::PageId;
//! use pagewright_repository::{MemoryContentSource, PageRepository};
//!
//! # async fn example() -> pagewright_repository::Result<()> {
//! let repository = PageRepository::from_source(MemoryContentSource::new());
//! let page = repository.get_by_id(&PageId::from("home")).await?;
//! println!("{} has {} sections", page.id, page.len());
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod error;
pub mod record;
pub mod repository;
pub mod storage;

pub use address::ContentAddress;
pub use error::{RepositoryError, Result, SourceError, TransportError};
pub use record::{PageRecord, adapt_record, page_to_record};
pub use repository::PageRepository;
pub use storage::{
    BlobContentSource, BlobStorage, ContentSource, MemoryContentSource, MemoryStorage,
    StorageError,
};

#[cfg(feature = "fs")]
pub use storage::FileStorage;
