//! Server configuration management

use std::path::PathBuf;

use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Root directory for page snapshots; in-memory when unset
    pub storage_dir: Option<PathBuf>,

    /// CORS allowed origins
    pub cors_origins: Vec<String>,

    /// Maximum accepted request body size
    pub max_body_bytes: usize,

    /// Seed a demo "home" page at startup when it is missing
    pub seed_demo: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid PORT value".to_string()))?,
            storage_dir: std::env::var("PAGEWRIGHT_STORAGE_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .unwrap_or_else(|_| "2097152".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid MAX_BODY_BYTES value".to_string()))?,
            seed_demo: std::env::var("PAGEWRIGHT_SEED_DEMO")
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(true),
        })
    }

    /// Whether any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            storage_dir: None,
            cors_origins: vec!["*".to_string()],
            max_body_bytes: 2 * 1024 * 1024,
            seed_demo: true,
        }
    }
}
