//! Typed error for the explainer crate.

use ai_llm_service::error_handler::{AiLlmError, HttpError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplainerError {
    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP/transport errors when calling the prediction service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Prediction service answered with a non-success status.
    #[error("prediction service: {0}")]
    PredictionStatus(HttpError),

    /// Prediction payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<AiLlmError> for ExplainerError {
    fn from(e: AiLlmError) -> Self {
        Self::Config(e.to_string())
    }
}
