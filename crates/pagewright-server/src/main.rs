//! Pagewright HTTP API Server

use std::net::SocketAddr;

use pagewright_server::{AppState, config::ServerConfig, create_router, error::Result, seed};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "pagewright_server=debug,tower_http=debug".to_string()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    info!("Starting Pagewright Server on {}:{}", config.host, config.port);

    let state = AppState::from_config(config.clone()).await?;
    if config.seed_demo {
        seed::seed_demo(&state.repository).await?;
    }

    let app = create_router(state)?;

    let ip = config
        .host
        .parse()
        .map_err(|_| pagewright_server::error::ApiError::Config("Invalid HOST value".to_string()))?;
    let addr = SocketAddr::new(ip, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
