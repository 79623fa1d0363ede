//! Content sources and the blob stores behind them

use async_trait::async_trait;
use pagewright::PageId;

pub mod blob_source;
pub mod blob_storage;
#[cfg(feature = "fs")]
pub mod file_storage;
pub mod memory_source;

pub use blob_source::BlobContentSource;
pub use blob_storage::{BlobStorage, MemoryStorage, StorageError, validate_key};
#[cfg(feature = "fs")]
pub use file_storage::FileStorage;
pub use memory_source::MemoryContentSource;

use crate::error::SourceError;
use crate::record::PageRecord;

/// Storage/content collaborator behind the page repository
///
/// Records are loosely typed; the repository normalizes them. A persist
/// either stores the whole record or leaves the prior one in place.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the stored record for a page
    async fn fetch_page_record(&self, id: &PageId) -> Result<PageRecord, SourceError>;

    /// Persist a full page record, returning the stored form
    ///
    /// The stored form carries server-assigned fields such as the bumped
    /// revision and update timestamp.
    async fn persist_page_record(&self, record: PageRecord) -> Result<PageRecord, SourceError>;
}

/// Stamp revision and timestamps on a record about to be stored
pub(crate) fn stamp_record(record: &mut PageRecord, previous: Option<&PageRecord>) {
    let now = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default();
    let revision = previous.map(PageRecord::revision).unwrap_or(0) + 1;
    let created = previous
        .and_then(|p| p.created_at().cloned())
        .unwrap_or_else(|| serde_json::Value::String(now.clone()));

    record.set("revision", serde_json::json!(revision));
    record.set("createdAt", created);
    record.set("updatedAt", serde_json::Value::String(now));
}

/// Identifier a record will be stored under
pub(crate) fn record_id(record: &PageRecord) -> Result<String, SourceError> {
    match record.id() {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(SourceError::Malformed("record has no id".to_string())),
    }
}
