//! POST /explain: explains a prediction result.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use explainer::Explanation;
use tracing::debug;

use crate::{
    core::app_state::AppState, error_handler::AppResult,
    routes::explain::explain_request::ExplainRequest,
};

/// Handler: POST /explain
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8001/explain \
///   -H 'content-type: application/json' \
///   -d '{"user_query":"What does this mean?","prediction_result":{"risk_level":"High","probabilities":{"endometriosis":0.85}},"use_fallback":false}'
/// ```
pub async fn explain(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExplainRequest>, JsonRejection>,
) -> AppResult<Json<Explanation>> {
    let Json(body) = payload?;
    debug!(
        query_len = body.user_query.len(),
        use_fallback = body.use_fallback,
        "explain: start"
    );

    let out = state
        .explainer
        .explain(&body.user_query, &body.prediction_result, body.use_fallback)
        .await;
    Ok(Json(out))
}
