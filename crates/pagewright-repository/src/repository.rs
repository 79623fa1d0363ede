//! Page repository over an abstract content source

use std::sync::Arc;

use pagewright::{Page, PageId};
use tracing::{debug, error, info};

use crate::error::{RepositoryError, Result};
use crate::record::{PageRecord, adapt_record, page_to_record};
use crate::storage::ContentSource;

/// Loads and persists pages by identifier
///
/// Knows nothing about rendering. Every record crossing the source boundary
/// is normalized into a complete `Page` or the call fails.
#[derive(Clone)]
pub struct PageRepository {
    source: Arc<dyn ContentSource>,
}

impl PageRepository {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self { source }
    }

    pub fn from_source(source: impl ContentSource + 'static) -> Self {
        Self::new(Arc::new(source))
    }

    pub fn source(&self) -> &Arc<dyn ContentSource> {
        &self.source
    }

    /// Fetch a page by identifier
    pub async fn get_by_id(&self, id: &PageId) -> Result<Page> {
        let record = self
            .source
            .fetch_page_record(id)
            .await
            .map_err(|e| RepositoryError::from_source(id, e))?;

        let page = adapt_record(&record, Some(id)).inspect_err(|e| {
            error!(page = %id, error = %e, "failed to adapt page record");
        })?;
        debug!(page = %id, sections = page.len(), revision = page.revision, "loaded page");
        Ok(page)
    }

    /// Persist the full page and return its canonical stored form
    ///
    /// Saving the same content twice stores the same sections; each call
    /// still bumps the revision.
    pub async fn save(&self, page: &Page) -> Result<Page> {
        page.validate()?;
        let record = page_to_record(page)?;

        let stored = self
            .source
            .persist_page_record(record)
            .await
            .map_err(|e| {
                error!(page = %page.id, error = %e, "failed to persist page");
                RepositoryError::from_source(&page.id, e)
            })?;

        let canonical = adapt_record(&stored, Some(&page.id))?;
        info!(page = %canonical.id, revision = canonical.revision, "saved page");
        Ok(canonical)
    }

    /// Normalize a loosely typed record, then save it
    pub async fn save_record(&self, record: &PageRecord, id: &PageId) -> Result<Page> {
        let page = adapt_record(record, Some(id))?;
        self.save(&page).await
    }

    /// Whether a page with this identifier exists
    pub async fn exists(&self, id: &PageId) -> Result<bool> {
        match self.get_by_id(id).await {
            Ok(_) => Ok(true),
            Err(RepositoryError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for PageRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRepository").finish_non_exhaustive()
    }
}
