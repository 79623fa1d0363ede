//! In-process content source

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use pagewright::PageId;
use tracing::debug;

use super::{ContentSource, record_id, stamp_record};
use crate::error::SourceError;
use crate::record::PageRecord;

/// Content source keeping records in memory
///
/// Records are stored exactly as given, so tests can seed CMS-shaped
/// records with [`MemoryContentSource::insert_raw`]. The offline and
/// failure switches simulate an unreachable collaborator.
#[derive(Debug, Default)]
pub struct MemoryContentSource {
    records: Mutex<HashMap<String, PageRecord>>,
    offline: AtomicBool,
    failing_persists: AtomicUsize,
}

impl MemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record as-is, bypassing revision stamping
    pub fn insert_raw(&self, id: impl Into<String>, record: serde_json::Value) {
        if let Ok(mut records) = self.records.lock() {
            records.insert(id.into(), PageRecord(record));
        }
    }

    /// The stored record for `id`, as-is
    pub fn raw(&self, id: &str) -> Option<PageRecord> {
        self.records.lock().ok()?.get(id).cloned()
    }

    /// Make every call fail as unreachable until switched back
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make the next `count` persists fail as unreachable
    pub fn fail_next_persists(&self, count: usize) {
        self.failing_persists.store(count, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_online(&self) -> Result<(), SourceError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SourceError::Unreachable("memory source is offline".into()));
        }
        Ok(())
    }

    fn take_injected_failure(&self) -> bool {
        self.failing_persists
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ContentSource for MemoryContentSource {
    async fn fetch_page_record(&self, id: &PageId) -> Result<PageRecord, SourceError> {
        self.check_online()?;
        let records = self
            .records
            .lock()
            .map_err(|_| SourceError::Backend("Lock poisoned".into()))?;

        records
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }

    async fn persist_page_record(&self, mut record: PageRecord) -> Result<PageRecord, SourceError> {
        self.check_online()?;
        if self.take_injected_failure() {
            return Err(SourceError::Unreachable("injected persist failure".into()));
        }

        let id = record_id(&record)?;
        let mut records = self
            .records
            .lock()
            .map_err(|_| SourceError::Backend("Lock poisoned".into()))?;

        stamp_record(&mut record, records.get(&id));
        debug!(page = %id, revision = record.revision(), "persisted page record");
        records.insert(id, record.clone());
        Ok(record)
    }
}
