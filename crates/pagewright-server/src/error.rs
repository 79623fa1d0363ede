//! Error handling for the API server

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pagewright_editor::SessionError;
use pagewright_repository::{RepositoryError, TransportError};
use serde_json::json;
use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Edit failed: {0}")]
    Session(#[from] SessionError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Registry error: {0}")]
    Registry(#[from] pagewright::RegistryError),
}

fn repository_status(error: &RepositoryError) -> StatusCode {
    match error {
        RepositoryError::NotFound(_) => StatusCode::NOT_FOUND,
        RepositoryError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RepositoryError::Transport(TransportError::Unreachable { .. })
        | RepositoryError::Transport(TransportError::Malformed { .. })
        | RepositoryError::Transport(TransportError::Backend { .. }) => StatusCode::BAD_GATEWAY,
    }
}

fn session_status(error: &SessionError) -> StatusCode {
    match error.root() {
        SessionError::InvalidState { .. } => StatusCode::CONFLICT,
        SessionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::Load(e) | SessionError::Save(e) => repository_status(e),
        SessionError::Batch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Repository(e) => repository_status(e),
            ApiError::Session(e) => session_status(e),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Config(_)
            | ApiError::Internal(_)
            | ApiError::Io(_)
            | ApiError::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
