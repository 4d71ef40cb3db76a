//! Unified error types for the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing / serialization errors of the persisted store.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The documents directory does not exist or is not a directory.
    #[error("documents directory not found: {0}")]
    MissingDirectory(PathBuf),

    /// The documents directory holds no readable `.txt` file.
    #[error("no documents found in: {0}")]
    NoDocuments(PathBuf),

    /// Mismatch in vector dimensionality across records.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// The embedding backend failed.
    #[error("embedding error: {0}")]
    Embedding(String),
}

impl From<serde_json::Error> for RagError {
    fn from(e: serde_json::Error) -> Self {
        RagError::Parse(e.to_string())
    }
}

impl From<ai_llm_service::error_handler::AiLlmError> for RagError {
    fn from(e: ai_llm_service::error_handler::AiLlmError) -> Self {
        RagError::Embedding(e.to_string())
    }
}
