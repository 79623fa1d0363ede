//! Error types for the page repository

use pagewright::{PageId, ValidationError};
use thiserror::Error;

/// Repository-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    /// No page has this identifier; not worth retrying
    #[error("Page not found: {0}")]
    NotFound(PageId),

    /// The content source was unreachable or returned unusable data
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The page handed to `save` breaks a section invariant
    #[error("Invalid page: {0}")]
    Validation(#[from] ValidationError),
}

/// Failures crossing the content-source boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Content source unreachable: {reason}")]
    Unreachable { reason: String },

    #[error("Malformed page record: {reason}")]
    Malformed { reason: String },

    #[error("Content source failed: {reason}")]
    Backend { reason: String },
}

impl TransportError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        TransportError::Malformed {
            reason: reason.into(),
        }
    }
}

/// Errors reported by a content source implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Source unreachable: {0}")]
    Unreachable(String),

    #[error("Source backend error: {0}")]
    Backend(String),

    #[error("Malformed record: {0}")]
    Malformed(String),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }

    /// Whether retrying the same call may succeed
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            RepositoryError::Transport(TransportError::Unreachable { .. })
                | RepositoryError::Transport(TransportError::Backend { .. })
        )
    }

    /// Map a source error for the page `id`
    pub fn from_source(id: &PageId, error: SourceError) -> Self {
        match error {
            SourceError::NotFound(_) => RepositoryError::NotFound(id.clone()),
            SourceError::Unreachable(reason) => {
                RepositoryError::Transport(TransportError::Unreachable { reason })
            }
            SourceError::Backend(reason) => {
                RepositoryError::Transport(TransportError::Backend { reason })
            }
            SourceError::Malformed(reason) => {
                RepositoryError::Transport(TransportError::Malformed { reason })
            }
        }
    }
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, RepositoryError>;
