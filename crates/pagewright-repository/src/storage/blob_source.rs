//! Content source over a content-addressed blob store
//!
//! Each persisted record is written as an immutable snapshot under its
//! sha256 address, then the page ref is pointed at it. The ref write is the
//! commit point: if anything fails before it, readers keep seeing the prior
//! snapshot.

use async_trait::async_trait;
use pagewright::PageId;
use tracing::{debug, warn};

use super::blob_storage::{BlobStorage, StorageError, validate_key};
use super::{ContentSource, record_id, stamp_record};
use crate::address::ContentAddress;
use crate::error::SourceError;
use crate::record::PageRecord;

/// [`ContentSource`] backed by any [`BlobStorage`]
#[derive(Debug)]
pub struct BlobContentSource<S: BlobStorage> {
    storage: S,
}

impl<S: BlobStorage> BlobContentSource<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Hash of the snapshot the page ref currently points at
    pub async fn current_hash(&self, id: &str) -> Result<String, SourceError> {
        let bytes = self
            .storage
            .get(&ContentAddress::ref_key(id))
            .await
            .map_err(storage_error)?;
        let hash = String::from_utf8(bytes)
            .map_err(|_| SourceError::Malformed(format!("ref for {} is not utf-8", id)))?;
        let hash = hash.trim().to_string();
        if !ContentAddress::is_valid_hash(&hash) {
            return Err(SourceError::Malformed(format!(
                "ref for {} holds an invalid hash",
                id
            )));
        }
        Ok(hash)
    }

    async fn load(&self, id: &str) -> Result<PageRecord, SourceError> {
        let hash = self.current_hash(id).await?;
        let bytes = self
            .storage
            .get(&ContentAddress::snapshot_key(&hash))
            .await
            .map_err(|e| match e {
                // A dangling ref is corruption, not a missing page
                StorageError::NotFound(key) => {
                    SourceError::Malformed(format!("snapshot {} is missing", key))
                }
                other => storage_error(other),
            })?;

        if !ContentAddress::verify(&bytes, &hash) {
            warn!(page = id, hash = %hash, "snapshot failed hash verification");
            return Err(SourceError::Malformed(format!(
                "snapshot {} does not match its address",
                hash
            )));
        }

        let value = serde_json::from_slice(&bytes)
            .map_err(|e| SourceError::Malformed(format!("snapshot {} is not JSON: {}", hash, e)))?;
        Ok(PageRecord(value))
    }
}

fn storage_error(error: StorageError) -> SourceError {
    match error {
        StorageError::NotFound(key) => SourceError::NotFound(key),
        StorageError::AccessDenied(key) => SourceError::Backend(format!("access denied: {}", key)),
        StorageError::InvalidKey(key) => SourceError::Malformed(format!("invalid key: {}", key)),
        StorageError::Backend(reason) => SourceError::Unreachable(reason),
    }
}

#[async_trait]
impl<S: BlobStorage> ContentSource for BlobContentSource<S> {
    async fn fetch_page_record(&self, id: &PageId) -> Result<PageRecord, SourceError> {
        // No page can be stored under an id that is not a valid key
        validate_key(&ContentAddress::ref_key(id.as_str()))
            .map_err(|_| SourceError::NotFound(id.to_string()))?;
        self.load(id.as_str()).await
    }

    async fn persist_page_record(&self, mut record: PageRecord) -> Result<PageRecord, SourceError> {
        let id = record_id(&record)?;

        let previous = match self.load(&id).await {
            Ok(previous) => Some(previous),
            Err(SourceError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };
        stamp_record(&mut record, previous.as_ref());

        let bytes = serde_json::to_vec(record.as_value())
            .map_err(|e| SourceError::Malformed(e.to_string()))?;
        let hash = ContentAddress::hash(&bytes);

        self.storage
            .put(&ContentAddress::snapshot_key(&hash), bytes)
            .await
            .map_err(storage_error)?;
        self.storage
            .put(&ContentAddress::ref_key(&id), hash.clone().into_bytes())
            .await
            .map_err(storage_error)?;

        debug!(page = %id, hash = %hash, revision = record.revision(), "persisted page snapshot");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    #[tokio::test]
    async fn test_persist_then_fetch() {
        let source = BlobContentSource::new(MemoryStorage::new());
        let stored = source
            .persist_page_record(PageRecord(json!({"id": "home", "title": "Home", "sections": []})))
            .await
            .unwrap();
        assert_eq!(stored.revision(), 1);

        let fetched = source.fetch_page_record(&PageId::from("home")).await.unwrap();
        assert_eq!(fetched, stored);

        let again = source.persist_page_record(fetched).await.unwrap();
        assert_eq!(again.revision(), 2);
        assert_eq!(again.created_at(), stored.created_at());
    }

    #[tokio::test]
    async fn test_missing_page_is_not_found() {
        let source = BlobContentSource::new(MemoryStorage::new());
        let err = source.fetch_page_record(&PageId::from("nope")).await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_tampered_snapshot_is_malformed() {
        let source = BlobContentSource::new(MemoryStorage::new());
        source
            .persist_page_record(PageRecord(json!({"id": "home", "sections": []})))
            .await
            .unwrap();

        let hash = source.current_hash("home").await.unwrap();
        source
            .storage()
            .put(&ContentAddress::snapshot_key(&hash), b"{\"id\":\"evil\"}".to_vec())
            .await
            .unwrap();

        let err = source.fetch_page_record(&PageId::from("home")).await.unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_record_without_id_is_rejected() {
        let source = BlobContentSource::new(MemoryStorage::new());
        let err = source
            .persist_page_record(PageRecord(json!({"title": "Orphan"})))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
        assert!(source.storage().is_empty());
    }
}
