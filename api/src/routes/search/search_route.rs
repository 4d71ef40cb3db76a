//! GET /search: similarity search over the reference documents.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use tracing::debug;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::search::{
        search_request::SearchQuery,
        search_response::{SearchResponse, SearchResult},
    },
};

/// Handler: GET /search?query=..&limit=..
///
/// An empty or uninitialized store yields an empty result, not an error.
pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchQuery>, QueryRejection>,
) -> AppResult<Json<SearchResponse>> {
    let Query(p) = params?;
    let limit = p.limit.unwrap_or(state.store.config().top_k);
    if limit == 0 {
        return Err(AppError::BadRequest("limit must be positive".into()));
    }

    let hits = state.store.search(&p.query, limit).await?;
    debug!(hits = hits.len(), limit = limit, "search: done");

    let results: Vec<SearchResult> = hits
        .into_iter()
        .map(|h| SearchResult {
            source: h.chunk.metadata.source,
            content: h.chunk.text,
        })
        .collect();

    Ok(Json(SearchResponse {
        total_found: results.len(),
        results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{UNREACHABLE, state, write_doc};
    use ai_llm_service::generation::GenerationResponse;
    use axum::{http::StatusCode, response::IntoResponse};

    fn query(q: &str, limit: Option<usize>) -> Result<Query<SearchQuery>, QueryRejection> {
        Ok(Query(SearchQuery {
            query: q.to_string(),
            limit,
        }))
    }

    #[tokio::test]
    async fn empty_store_returns_no_results() {
        let dir = tempfile::tempdir().unwrap();
        let st = state(GenerationResponse::Success("x".into()), dir.path(), UNREACHABLE);

        let Json(out) = search(State(st), query("pelvic pain", None)).await.unwrap();
        assert!(out.results.is_empty());
        assert_eq!(out.total_found, 0);
    }

    #[tokio::test]
    async fn indexed_documents_are_found() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "symptoms.txt", "Chronic pelvic pain and painful periods.");
        write_doc(dir.path(), "treatment.txt", "Hormonal therapy and laparoscopic surgery.");
        let st = state(GenerationResponse::Success("x".into()), dir.path(), UNREACHABLE);
        st.store.index(dir.path().join("docs")).await.unwrap();

        let Json(out) = search(State(st), query("laparoscopic surgery", Some(1)))
            .await
            .unwrap();

        assert_eq!(out.total_found, 1);
        assert_eq!(out.results[0].source, "treatment.txt");
        assert!(out.results[0].content.contains("laparoscopic"));
    }

    #[tokio::test]
    async fn zero_limit_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let st = state(GenerationResponse::Success("x".into()), dir.path(), UNREACHABLE);

        let err = search(State(st), query("pain", Some(0))).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
