//! Page routes: load, save, render and batch edits

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use pagewright::{Page, PageId, RenderSummary, render_sections};
use pagewright_editor::{EditOperation, EditingSession, SessionError};
use pagewright_repository::{PageRecord, adapt_record};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    AppState,
    error::{ApiError, Result},
    models::RenderResponse,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_page).put(put_page))
        .route("/{id}/render", get(render_page))
        .route("/{id}/edits", post(apply_edits))
}

async fn get_page(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Page>> {
    debug!("Getting page: {}", id);
    let page = state.repository.get_by_id(&PageId::from(id)).await?;
    Ok(Json(page))
}

/// Save a loosely typed page record under `id`
///
/// The body goes through the same normalization as stored records, so
/// CMS-shaped payloads are accepted. A body that cannot be normalized is
/// the caller's fault, not the content source's.
async fn put_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Page>> {
    let id = PageId::from(id);
    let page = adapt_record(&PageRecord::new(body), Some(&id))
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let saved = state.repository.save(&page).await?;
    info!("Saved page {} at revision {}", saved.id, saved.revision);
    Ok(Json(saved))
}

async fn render_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RenderResponse>> {
    let page = state.repository.get_by_id(&PageId::from(id)).await?;
    let nodes = render_sections(&state.registry, &page.sections);
    let summary = RenderSummary::of(&nodes);

    if summary.unsupported + summary.invalid > 0 {
        warn!(
            "Page {} rendered with {} unsupported and {} invalid section(s)",
            page.id, summary.unsupported, summary.invalid
        );
    }
    Ok(Json(RenderResponse {
        page,
        nodes,
        summary,
    }))
}

/// Apply a batch of edits through an editing session and commit it
async fn apply_edits(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(operations): Json<Vec<EditOperation>>,
) -> Result<Json<Page>> {
    let mut session =
        EditingSession::open(state.repository.clone(), state.registry.clone(), id).await;
    if let Some(e) = session.load_error() {
        return Err(SessionError::Load(e.clone()).into());
    }

    let count = operations.len();
    if let Err(e) = session.apply_all(operations) {
        session.discard();
        return Err(e.into());
    }

    let page = session.commit().await?.clone();
    info!("Applied {} edit(s) to page {}", count, page.id);
    Ok(Json(page))
}
