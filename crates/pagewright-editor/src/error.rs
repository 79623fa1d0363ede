//! Error types for editing sessions

use pagewright::ValidationError;
use pagewright_repository::RepositoryError;
use thiserror::Error;

use crate::state::SessionState;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The operation is not allowed in the session's current state
    #[error("Cannot {operation} while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// The edit was rejected; the page is unchanged
    #[error("Invalid edit: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to load page: {0}")]
    Load(RepositoryError),

    /// The save failed; uncommitted edits are retained
    #[error("Failed to save page: {0}")]
    Save(RepositoryError),

    /// One operation of a batch failed; earlier operations stay applied
    #[error("Edit operation {index} failed: {source}")]
    Batch {
        index: usize,
        #[source]
        source: Box<SessionError>,
    },
}

impl SessionError {
    pub(crate) fn invalid_state(operation: &'static str, state: SessionState) -> Self {
        SessionError::InvalidState { operation, state }
    }

    /// The innermost error, looking through batch wrapping
    pub fn root(&self) -> &SessionError {
        match self {
            SessionError::Batch { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
