//! GET /health: liveness plus model and index status.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// `fixed` or `probe`.
    pub model_selection: &'static str,
    /// `None` until a probe has pinned a model.
    pub pinned_model: Option<String>,
    pub indexed_chunks: usize,
}

/// Handler: GET /health
///
/// Never triggers a model probe or a store load.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model_selection: state.gateway.config().selection.label(),
        pinned_model: state.gateway.pinned_model().map(str::to_string),
        indexed_chunks: state.store.len().await,
    })
}
