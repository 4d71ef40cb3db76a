//! POST /assess: prediction service call followed by an explanation.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::{error, info};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::assess::assess_request::{AssessRequest, AssessResponse},
};

/// Handler: POST /assess
///
/// A failing prediction service yields 502; the explanation step itself
/// cannot fail.
pub async fn assess(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AssessRequest>, JsonRejection>,
) -> AppResult<Json<AssessResponse>> {
    let Json(body) = payload?;
    if body.symptoms.is_empty() {
        return Err(AppError::BadRequest("symptoms must not be empty".into()));
    }

    let prediction = state.predictor.predict(&body.symptoms).await.map_err(|e| {
        error!(error = %e, "assess: prediction failed");
        AppError::from(e)
    })?;
    info!(risk = prediction.risk_level_or_unknown(), "assess: prediction received");

    let explanation = state
        .explainer
        .explain(&body.user_query, &prediction, body.use_fallback)
        .await;

    Ok(Json(AssessResponse {
        prediction,
        explanation,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{UNREACHABLE, state};
    use ai_llm_service::generation::GenerationResponse;
    use axum::{Router, http::StatusCode, response::IntoResponse, routing::post};
    use serde_json::json;

    fn request() -> AssessRequest {
        serde_json::from_value(json!({
            "symptoms": { "Cramping": 1, "Hip_pain": 1, "Diarrhea": 0 },
            "use_fallback": true
        }))
        .unwrap()
    }

    async fn prediction_service() -> String {
        let app = Router::new().route(
            "/predict",
            post(|| async {
                Json(json!({
                    "prediction": 0,
                    "prediction_label": "No Endometriosis",
                    "confidence": 0.7,
                    "probabilities": { "endometriosis": 0.3 },
                    "risk_level": "Low"
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn prediction_is_explained() {
        let dir = tempfile::tempdir().unwrap();
        let base = prediction_service().await;
        let st = state(GenerationResponse::Success("x".into()), dir.path(), &base);

        let Json(out) = assess(State(st), Ok(Json(request()))).await.unwrap();

        assert_eq!(out.prediction.prediction, Some(0));
        assert_eq!(out.explanation.risk_level, "Low");
        assert!(out.explanation.explanation.contains("lower likelihood"));

        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["risk_level"], "Low");
        assert!(v["recommendations"].as_array().is_some_and(|r| !r.is_empty()));
        assert_eq!(v["prediction"]["probabilities"]["endometriosis"], 0.3);
    }

    #[tokio::test]
    async fn unreachable_prediction_service_is_bad_gateway() {
        let dir = tempfile::tempdir().unwrap();
        let st = state(GenerationResponse::Success("x".into()), dir.path(), UNREACHABLE);

        let err = assess(State(st), Ok(Json(request()))).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
