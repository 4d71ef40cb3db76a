//! POST /ask: answers a question about the user's assessment.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use explainer::Answer;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::ask::ask_request::AskRequest,
};

/// Handler: POST /ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8001/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"What treatment options exist?","prediction_result":{"risk_level":"Moderate"}}'
/// ```
pub async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<Json<Answer>> {
    let Json(body) = payload?;
    if body.question.trim().is_empty() {
        return Err(AppError::BadRequest("question must not be empty".into()));
    }

    let out = state
        .explainer
        .ask(&body.question, &body.prediction_result)
        .await;
    Ok(Json(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{UNREACHABLE, state};
    use ai_llm_service::generation::{DegradedReason, GenerationResponse};
    use axum::{http::StatusCode, response::IntoResponse};

    fn request(question: &str) -> AskRequest {
        serde_json::from_value(serde_json::json!({
            "question": question,
            "prediction_result": { "risk_level": "Low", "probabilities": { "endometriosis": 0.2 } }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn answers_with_generated_text() {
        let dir = tempfile::tempdir().unwrap();
        let st = state(GenerationResponse::Success("It is common.".into()), dir.path(), UNREACHABLE);

        let Json(out) = ask(State(st), Ok(Json(request("Is this common?")))).await.unwrap();
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            serde_json::json!({ "answer": "It is common." })
        );
    }

    #[tokio::test]
    async fn degraded_answer_is_non_empty() {
        let dir = tempfile::tempdir().unwrap();
        let st = state(
            GenerationResponse::Degraded(DegradedReason::RateLimited),
            dir.path(),
            UNREACHABLE,
        );

        let Json(out) = ask(State(st), Ok(Json(request("Is this common?")))).await.unwrap();
        assert!(!out.answer.trim().is_empty());
    }

    #[tokio::test]
    async fn blank_question_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let st = state(GenerationResponse::Success("x".into()), dir.path(), UNREACHABLE);

        let err = ask(State(st), Ok(Json(request("   ")))).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
