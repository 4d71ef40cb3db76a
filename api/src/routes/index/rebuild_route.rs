//! POST /index/rebuild: drops the persisted store and re-indexes the documents.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;
use tracing::info;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
};

#[derive(Debug, Serialize)]
pub struct RebuildResponse {
    pub message: String,
    pub indexed_chunks: usize,
}

/// Handler: POST /index/rebuild
///
/// The only way to re-index once a persisted store exists.
pub async fn rebuild_index(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let docs_dir = state.store.config().docs_dir.clone();
    let chunks = state.store.rebuild(&docs_dir).await?;
    info!(chunks = chunks, docs_dir = %docs_dir.display(), "index rebuilt");

    Ok(ApiResponse::success(RebuildResponse {
        message: format!("Indexed {} from {}", chunks, docs_dir.display()),
        indexed_chunks: chunks,
    })
    .into_response_with_status(StatusCode::OK))
}
