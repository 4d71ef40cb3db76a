use ai_llm_service::error_handler::AiLlmError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use explainer::ExplainerError;
use rag_store::RagError;
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingEnv(_) => StatusCode::INTERNAL_SERVER_ERROR, // startup-only
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Http { status, .. } => *status,
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Http { code, .. } => code,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(err: axum::extract::rejection::QueryRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

/// Gateway/embedding setup failures only happen at startup.
impl From<AiLlmError> for AppError {
    fn from(err: AiLlmError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<RagError> for AppError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::Config(msg) => AppError::Config(msg),
            RagError::MissingDirectory(dir) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "DOCS_DIR_MISSING",
                message: format!("Documents directory not found: {}", dir.display()),
            },
            RagError::NoDocuments(dir) => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "DOCS_DIR_EMPTY",
                message: format!("No documents found in: {}", dir.display()),
            },
            RagError::Embedding(msg) => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "EMBEDDING_FAILED",
                message: format!("Embedding service failed: {msg}"),
            },
            other => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "RAG_STORE_ERROR",
                message: format!("Vector store error: {other}"),
            },
        }
    }
}

/// Prediction collaborator failures surface as 502.
impl From<ExplainerError> for AppError {
    fn from(err: ExplainerError) -> Self {
        match err {
            ExplainerError::Config(msg) => AppError::Config(msg),
            other => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "PREDICTION_FAILED",
                message: format!("Prediction service failed: {other}"),
            },
        }
    }
}
