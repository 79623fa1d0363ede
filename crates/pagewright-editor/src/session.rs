//! # Editing sessions
//!
//! An [`EditingSession`] owns a private copy of one page for the duration of
//! an edit interaction. Mutations touch only that copy; [`EditingSession::commit`]
//! sends it to the repository and adopts the canonical page that comes back.
//!
//! The session is an exclusively held value. It does not serialize
//! concurrent callers; `&mut self` on every mutation enforces one editor.

use std::sync::Arc;

use pagewright::{Page, PageId, Props, Section, SectionKey, SectionRegistry, ValidationError};
use pagewright_repository::{PageRepository, RepositoryError};
use tracing::{debug, error, info, warn};

use crate::error::{Result, SessionError};
use crate::operation::{EditOperation, EditOutcome};
use crate::state::SessionState;

/// Single-owner edit buffer for one page
pub struct EditingSession {
    repository: Arc<PageRepository>,
    registry: Arc<SectionRegistry>,
    page_id: PageId,
    state: SessionState,
    page: Option<Page>,
    load_error: Option<RepositoryError>,
    last_save_error: Option<RepositoryError>,
    edit_count: usize,
}

impl EditingSession {
    /// Create a session in `Loading` without fetching yet
    pub fn new(
        repository: Arc<PageRepository>,
        registry: Arc<SectionRegistry>,
        id: impl Into<PageId>,
    ) -> Self {
        Self {
            repository,
            registry,
            page_id: id.into(),
            state: SessionState::Loading,
            page: None,
            load_error: None,
            last_save_error: None,
            edit_count: 0,
        }
    }

    /// Open a session on a page
    ///
    /// Always returns a session: `Ready` on success, `LoadFailed` otherwise
    /// with the cause available from [`EditingSession::load_error`].
    pub async fn open(
        repository: Arc<PageRepository>,
        registry: Arc<SectionRegistry>,
        id: impl Into<PageId>,
    ) -> Self {
        let mut session = Self::new(repository, registry, id);
        // The outcome is recorded on the session itself
        let _ = session.load().await;
        session
    }

    /// Fetch the page; only valid while `Loading`
    ///
    /// Dropping the returned future leaves the session in `Loading`.
    pub async fn load(&mut self) -> Result<&Page> {
        if self.state != SessionState::Loading {
            return Err(SessionError::invalid_state("load", self.state));
        }

        match self.repository.get_by_id(&self.page_id).await {
            Ok(page) => {
                info!(page = %self.page_id, sections = page.len(), "opened editing session");
                self.state = SessionState::Ready;
                Ok(&*self.page.insert(page))
            }
            Err(e) => {
                error!(page = %self.page_id, error = %e, "failed to open editing session");
                self.state = SessionState::LoadFailed;
                self.load_error = Some(e.clone());
                Err(SessionError::Load(e))
            }
        }
    }

    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state.has_unsaved_edits()
    }

    /// The in-memory page, once loaded
    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    /// Why loading failed, in `LoadFailed`
    pub fn load_error(&self) -> Option<&RepositoryError> {
        self.load_error.as_ref()
    }

    /// The most recent save failure, in `Error`
    pub fn last_save_error(&self) -> Option<&RepositoryError> {
        self.last_save_error.as_ref()
    }

    /// Mutations applied since the last successful commit
    pub fn edit_count(&self) -> usize {
        self.edit_count
    }

    /// Add a section of a registered type at `at`, seeded with its default props
    ///
    /// Returns the freshly minted key.
    pub fn add_section(&mut self, section_type: &str, at: usize) -> Result<SectionKey> {
        self.add_section_with(section_type, at, None)
    }

    fn add_section_with(
        &mut self,
        section_type: &str,
        at: usize,
        props: Option<Props>,
    ) -> Result<SectionKey> {
        let page = self.editable("addSection")?;
        if at > page.len() {
            return Err(ValidationError::IndexOutOfBounds {
                index: at,
                len: page.len(),
            }
            .into());
        }

        let entry = self.registry.resolve(section_type).ok_or_else(|| {
            ValidationError::UnknownSectionType {
                section_type: section_type.to_string(),
            }
        })?;
        let props = match props {
            Some(props) => {
                entry.validate_props(&props)?;
                props
            }
            None => entry.default_props(),
        };

        let mut key = SectionKey::mint();
        while page.contains_key(&key) {
            key = SectionKey::mint();
        }

        let page = self.editable_mut("addSection")?;
        page.insert_section(at, Section::new(key.clone(), section_type, props))?;
        debug!(page = %self.page_id, key = %key, section_type, at, "added section");
        self.mark_dirty();
        Ok(key)
    }

    /// Remove the section with `key`
    pub fn remove_section(&mut self, key: &SectionKey) -> Result<Section> {
        let removed = self.editable_mut("removeSection")?.remove_section(key)?;
        debug!(page = %self.page_id, key = %key, "removed section");
        self.mark_dirty();
        Ok(removed)
    }

    /// Move the section with `key` to `to`, clamping out-of-range targets
    ///
    /// Returns the index the section ended up at.
    pub fn move_section(&mut self, key: &SectionKey, to: usize) -> Result<usize> {
        let index = self.editable_mut("moveSection")?.move_section(key, to)?;
        if index != to {
            debug!(page = %self.page_id, key = %key, requested = to, index, "clamped move target");
        }
        self.mark_dirty();
        Ok(index)
    }

    /// Replace a section's props
    ///
    /// Props of registered types are checked against the type's schema;
    /// sections of unregistered types accept any object.
    pub fn update_section_props(&mut self, key: &SectionKey, props: Props) -> Result<()> {
        let page = self.editable("updateSectionProps")?;
        let section = page
            .section(key)
            .ok_or_else(|| ValidationError::SectionNotFound {
                key: key.to_string(),
            })?;
        if let Some(entry) = self.registry.resolve(section.section_type.as_str()) {
            entry.validate_props(&props)?;
        }

        self.editable_mut("updateSectionProps")?
            .update_section_props(key, props)?;
        debug!(page = %self.page_id, key = %key, "updated section props");
        self.mark_dirty();
        Ok(())
    }

    /// Apply one serialized operation
    pub fn apply(&mut self, operation: EditOperation) -> Result<EditOutcome> {
        match operation {
            EditOperation::Add {
                section_type,
                at,
                props,
            } => {
                let at = match at {
                    Some(at) => at,
                    None => self.page.as_ref().map(Page::len).unwrap_or(0),
                };
                self.add_section_with(&section_type, at, props)
                    .map(EditOutcome::Added)
            }
            EditOperation::Remove { key } => self.remove_section(&key).map(EditOutcome::Removed),
            EditOperation::Move { key, to } => self.move_section(&key, to).map(EditOutcome::Moved),
            EditOperation::UpdateProps { key, props } => self
                .update_section_props(&key, props)
                .map(|()| EditOutcome::Updated),
        }
    }

    /// Apply operations in order, stopping at the first failure
    ///
    /// Each operation is all-or-nothing; operations before a failing one
    /// stay applied.
    pub fn apply_all(
        &mut self,
        operations: impl IntoIterator<Item = EditOperation>,
    ) -> Result<Vec<EditOutcome>> {
        let mut outcomes = Vec::new();
        for (index, operation) in operations.into_iter().enumerate() {
            let name = operation.name();
            match self.apply(operation) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    warn!(page = %self.page_id, index, op = name, error = %e, "edit operation rejected");
                    return Err(SessionError::Batch {
                        index,
                        source: Box::new(e),
                    });
                }
            }
        }
        Ok(outcomes)
    }

    /// Save the in-memory page and adopt the canonical result
    ///
    /// From `Ready` nothing is sent and the current page is returned. On
    /// failure the session moves to `Error` with every edit retained, and
    /// `commit` may be retried. Dropping the future mid-save leaves the
    /// session `Dirty`.
    pub async fn commit(&mut self) -> Result<&Page> {
        match self.state {
            SessionState::Ready => return self.loaded_page("commit"),
            SessionState::Dirty | SessionState::Error => {}
            state => return Err(SessionError::invalid_state("commit", state)),
        }

        let page = self.loaded_page("commit")?.clone();
        let repository = Arc::clone(&self.repository);
        let outcome = {
            let _saving = SavingGuard::enter(&mut self.state);
            repository.save(&page).await
        };

        match outcome {
            Ok(canonical) => {
                info!(
                    page = %self.page_id,
                    revision = canonical.revision,
                    edits = self.edit_count,
                    "committed editing session"
                );
                self.state = SessionState::Ready;
                self.edit_count = 0;
                self.last_save_error = None;
                Ok(&*self.page.insert(canonical))
            }
            Err(e) => {
                error!(page = %self.page_id, error = %e, edits = self.edit_count, "commit failed, edits retained");
                self.state = SessionState::Error;
                self.last_save_error = Some(e.clone());
                Err(SessionError::Save(e))
            }
        }
    }

    /// End the session, dropping any uncommitted edits
    pub fn discard(self) {
        if self.is_dirty() {
            warn!(page = %self.page_id, edits = self.edit_count, "discarded uncommitted edits");
        } else {
            debug!(page = %self.page_id, state = %self.state, "closed editing session");
        }
    }

    fn loaded_page(&self, operation: &'static str) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| SessionError::invalid_state(operation, self.state))
    }

    fn editable(&self, operation: &'static str) -> Result<&Page> {
        if !self.state.accepts_edits() {
            return Err(SessionError::invalid_state(operation, self.state));
        }
        self.loaded_page(operation)
    }

    fn editable_mut(&mut self, operation: &'static str) -> Result<&mut Page> {
        if !self.state.accepts_edits() {
            return Err(SessionError::invalid_state(operation, self.state));
        }
        let state = self.state;
        self.page
            .as_mut()
            .ok_or_else(|| SessionError::invalid_state(operation, state))
    }

    fn mark_dirty(&mut self) {
        self.edit_count += 1;
        if self.state != SessionState::Dirty {
            debug!(page = %self.page_id, from = %self.state, "session is dirty");
            self.state = SessionState::Dirty;
        }
    }
}

impl std::fmt::Debug for EditingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditingSession")
            .field("page_id", &self.page_id)
            .field("state", &self.state)
            .field("edit_count", &self.edit_count)
            .finish_non_exhaustive()
    }
}

/// Holds the session in `Saving` while a save is in flight
///
/// If the save future is dropped before it resolves, the state falls back
/// to `Dirty`; the buffer was never touched.
struct SavingGuard<'a> {
    state: &'a mut SessionState,
}

impl<'a> SavingGuard<'a> {
    fn enter(state: &'a mut SessionState) -> Self {
        *state = SessionState::Saving;
        SavingGuard { state }
    }
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        if *self.state == SessionState::Saving {
            *self.state = SessionState::Dirty;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewright::builtin_registry;
    use pagewright_repository::MemoryContentSource;
    use serde_json::json;

    async fn session_with(page: Page) -> EditingSession {
        let repository = Arc::new(PageRepository::from_source(MemoryContentSource::new()));
        repository.save(&page).await.unwrap();
        let registry = Arc::new(builtin_registry().unwrap());
        EditingSession::open(repository, registry, page.id.clone()).await
    }

    fn home() -> Page {
        Page::builder("home")
            .title("Home")
            .section(Section::from_value("s1", "hero", json!({"title": "Welcome"})).unwrap())
            .section(Section::from_value("s2", "unknown-widget", json!({})).unwrap())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_mutations_mark_dirty_once() {
        let mut session = session_with(home()).await;
        assert_eq!(session.state(), SessionState::Ready);

        session.move_section(&"s2".into(), 0).unwrap();
        assert_eq!(session.state(), SessionState::Dirty);
        session.move_section(&"s2".into(), 1).unwrap();
        assert_eq!(session.state(), SessionState::Dirty);
        assert_eq!(session.edit_count(), 2);
    }

    #[tokio::test]
    async fn test_rejected_edit_leaves_state_alone() {
        let mut session = session_with(home()).await;

        let err = session.add_section("hero", 5).unwrap_err();
        assert_eq!(
            err,
            SessionError::Validation(ValidationError::IndexOutOfBounds { index: 5, len: 2 })
        );
        assert!(session.add_section("Hero", 0).is_err());
        assert!(session.remove_section(&"nope".into()).is_err());
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.page().unwrap().sections, home().sections);
    }

    #[tokio::test]
    async fn test_add_seeds_default_props() {
        let mut session = session_with(home()).await;
        let key = session.add_section("hero", 1).unwrap();

        let page = session.page().unwrap();
        assert_eq!(page.position(&key), Some(1));
        let registry = builtin_registry().unwrap();
        let expected = registry.resolve("hero").unwrap().default_props();
        assert_eq!(page.section(&key).unwrap().props, expected);
    }

    #[tokio::test]
    async fn test_update_props_checks_schema_for_known_types() {
        let mut session = session_with(home()).await;

        let bad = json!({"title": 12}).as_object().cloned().unwrap();
        let err = session.update_section_props(&"s1".into(), bad).unwrap_err();
        assert!(matches!(err, SessionError::Validation(ValidationError::InvalidProps { .. })));
        assert_eq!(session.state(), SessionState::Ready);

        let anything = json!({"anything": [1, 2, 3]}).as_object().cloned().unwrap();
        session.update_section_props(&"s2".into(), anything.clone()).unwrap();
        assert_eq!(session.page().unwrap().sections[1].props, anything);
    }

    #[tokio::test]
    async fn test_commit_from_ready_is_a_no_op() {
        let mut session = session_with(home()).await;
        let revision = session.page().unwrap().revision;
        let page = session.commit().await.unwrap();
        assert_eq!(page.revision, revision);
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_saving_guard_falls_back_to_dirty() {
        let mut state = SessionState::Dirty;
        {
            let _guard = SavingGuard::enter(&mut state);
        }
        assert_eq!(state, SessionState::Dirty);
    }
}
