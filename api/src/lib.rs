use std::{env, sync::Arc};

mod core;
mod error_handler;
mod routes;

#[cfg(test)]
mod test_support;

use ai_llm_service::error_handler::env_opt_bool;
use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info, warn};

pub use crate::core::app_state::AppState;
pub use crate::error_handler::{AppError, AppResult};

use crate::routes::{
    ask::ask_route::ask, assess::assess_route::assess, explain::explain_route::explain,
    health_route::health, index::rebuild_route::rebuild_index, search::search_route::search,
};

/// All routes over the shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/explain", post(explain))
        .route("/ask", post(ask))
        .route("/search", get(search))
        .route("/assess", post(assess))
        .route("/index/rebuild", post(rebuild_index))
        .with_state(state)
}

/// Builds state from the environment, optionally indexes the documents and
/// serves until Ctrl+C.
///
/// # Errors
/// - [`AppError::MissingEnv`] if `API_ADDRESS` is unset
/// - [`AppError::Config`] for invalid configuration
/// - [`AppError::Bind`] / [`AppError::Server`] for listener failures
pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").map_err(|_| AppError::MissingEnv("API_ADDRESS"))?;

    let state = Arc::new(AppState::from_env()?);

    if env_opt_bool("RAG_INDEX_ON_START")?.unwrap_or(true) {
        let docs_dir = state.store.config().docs_dir.clone();
        match state.store.index(&docs_dir).await {
            Ok(chunks) => info!(chunks = chunks, docs_dir = %docs_dir.display(), "store ready"),
            // Search stays available and returns empty results.
            Err(e) => error!(error = %e, docs_dir = %docs_dir.display(), "startup indexing failed"),
        }
    }

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{UNREACHABLE, state};
    use ai_llm_service::generation::GenerationResponse;

    #[tokio::test]
    async fn router_serves_explain_and_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let st = state(GenerationResponse::Success("served".into()), dir.path(), UNREACHABLE);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(st)).await.unwrap();
        });

        let (status, body) = raw_post(addr, "/explain", r#"{"user_query":"q","prediction_result":{}}"#).await;
        assert_eq!(status, 200);
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["explanation"], "served");
        assert_eq!(v["risk_level"], "Unknown");

        let (status, body) = raw_post(addr, "/explain", r#"{"prediction_result":{}}"#).await;
        assert_eq!(status, 400);
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["error"], "BAD_REQUEST");
    }

    /// Minimal HTTP/1.1 client: one request per connection.
    async fn raw_post(addr: std::net::SocketAddr, path: &str, json: &str) -> (u16, String) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let req = format!(
            "POST {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{json}",
            json.len()
        );
        stream.write_all(req.as_bytes()).await.unwrap();

        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();
        let status = raw[9..12].parse().unwrap();
        let body = raw
            .split_once("\r\n\r\n")
            .map(|(_, b)| b.to_string())
            .unwrap_or_default();
        (status, body)
    }
}
