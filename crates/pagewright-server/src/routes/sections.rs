//! Section type catalogue

use axum::{Json, Router, extract::State, routing::get};

use crate::{AppState, error::Result, models::SectionTypeInfo};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_section_types))
}

/// Registered section types with their default props, sorted by type
async fn list_section_types(State(state): State<AppState>) -> Result<Json<Vec<SectionTypeInfo>>> {
    Ok(Json(
        state
            .registry
            .entries()
            .into_iter()
            .map(SectionTypeInfo::from)
            .collect(),
    ))
}
