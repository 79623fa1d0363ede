//! Pagewright HTTP API
//!
//! A thin axum surface over the page repository, the renderer dispatcher
//! and editing sessions.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    response::Json,
    routing::get,
};
use pagewright::{SectionRegistry, builtin_registry};
use pagewright_repository::{BlobContentSource, FileStorage, MemoryStorage, PageRepository};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod seed;

use config::ServerConfig;
use error::{ApiError, Result};

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<PageRepository>,
    pub registry: Arc<SectionRegistry>,
    pub config: ServerConfig,
}

impl AppState {
    /// Wire up storage and the built-in registry from configuration
    pub async fn from_config(config: ServerConfig) -> Result<Self> {
        let repository = match &config.storage_dir {
            Some(dir) => {
                let storage = FileStorage::new(dir)
                    .await
                    .map_err(|e| ApiError::Config(format!("storage directory: {}", e)))?;
                info!("Storing pages under {}", dir.display());
                PageRepository::from_source(BlobContentSource::new(storage))
            }
            None => {
                info!("Storing pages in memory");
                PageRepository::from_source(BlobContentSource::new(MemoryStorage::new()))
            }
        };

        Ok(Self {
            repository: Arc::new(repository),
            registry: Arc::new(builtin_registry()?),
            config,
        })
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.config)?;
    let body_limit = state.config.max_body_bytes;

    Ok(Router::new()
        // Health check
        .route("/health", get(health_check))
        // API routes
        .nest("/api", api_routes())
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state))
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/sections", routes::sections::router())
        .nest("/pages", routes::pages::router())
}

fn cors_layer(config: &ServerConfig) -> Result<CorsLayer> {
    if config.allows_any_origin() {
        return Ok(CorsLayer::permissive());
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| ApiError::Config(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Health check endpoint
async fn health_check() -> Result<Json<Value>> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "pagewright-server",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": time::OffsetDateTime::now_utc()
    })))
}
