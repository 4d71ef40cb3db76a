//! Default gateway configs loaded strictly from environment variables.
//!
//! The access token is never defaulted: when `HF_API_TOKEN` is missing the
//! gateway still starts and upstream `401` answers degrade to fallback text.
//!
//! # Environment variables
//!
//! Inference:
//! - `HF_API_TOKEN`           = bearer token (optional)
//! - `HF_INFERENCE_URL`       = base URL (default: hosted inference API)
//! - `LLM_MODEL`              = fixed model; disables probing when set
//! - `LLM_CANDIDATE_MODELS`   = comma-separated candidates probed in order
//! - `LLM_FALLBACK_MODEL`     = model pinned when no candidate answers
//! - `LLM_TEMPERATURE`        = sampling temperature (default 0.7)
//! - `LLM_TOP_P`              = nucleus sampling; omitted when unset
//! - `LLM_DO_SAMPLE`          = sampling flag (default true)
//! - `LLM_TIMEOUT_SECS`       = generation timeout (default 30)
//! - `LLM_PROBE_TIMEOUT_SECS` = probe timeout (default 10, capped at 10)
//!
//! Embeddings:
//! - `EMBEDDING_MODEL`        = feature-extraction model
//! - `EMBEDDING_DIM`          = expected dimension (default 384)
//! - `EMBEDDING_TIMEOUT_SECS` = request timeout (default 30)

use tracing::{info, warn};

use crate::{
    config::{
        embedding_model_config::EmbeddingModelConfig,
        llm_model_config::{DEFAULT_INFERENCE_URL, LlmModelConfig, MAX_PROBE_TIMEOUT_SECS},
        model_selection::ModelSelection,
    },
    error_handler::{
        AiLlmError, env_list, env_opt, env_opt_bool, env_opt_f32, env_opt_u32, env_opt_u64,
        mask_secret,
    },
};

/// Candidates probed when `LLM_CANDIDATE_MODELS` is unset.
pub const DEFAULT_CANDIDATE_MODELS: [&str; 4] = [
    "gpt2",
    "distilgpt2",
    "microsoft/DialoGPT-small",
    "facebook/blenderbot-400M-distill",
];

/// Model pinned when no candidate answers.
pub const DEFAULT_LAST_RESORT_MODEL: &str = "gpt2";

/// Default feature-extraction model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Default embedding dimension of [`DEFAULT_EMBEDDING_MODEL`].
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

fn inference_endpoint() -> String {
    env_opt("HF_INFERENCE_URL").unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string())
}

fn api_token() -> Option<String> {
    let token = env_opt("HF_API_TOKEN");
    match &token {
        Some(t) => info!(token = %mask_secret(t), "inference token loaded from environment"),
        None => warn!("HF_API_TOKEN is not set; upstream calls will likely be rejected"),
    }
    token
}

/// Resolves the model selection strategy from the environment.
///
/// Precedence:
/// 1. `LLM_MODEL` → [`ModelSelection::Fixed`]
/// 2. `LLM_CANDIDATE_MODELS` (or the built-in list) → [`ModelSelection::Probe`]
pub fn model_selection_from_env() -> ModelSelection {
    if let Some(model) = env_opt("LLM_MODEL") {
        return ModelSelection::Fixed(model);
    }
    let candidates = env_list("LLM_CANDIDATE_MODELS")
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| {
            DEFAULT_CANDIDATE_MODELS
                .iter()
                .map(|s| s.to_string())
                .collect()
        });
    let last_resort =
        env_opt("LLM_FALLBACK_MODEL").unwrap_or_else(|| DEFAULT_LAST_RESORT_MODEL.to_string());
    ModelSelection::Probe {
        candidates,
        last_resort,
    }
}

/// Constructs the gateway config from the environment.
///
/// # Errors
/// - [`crate::error_handler::ConfigError::InvalidNumber`] for malformed numbers
/// - any validation error from [`LlmModelConfig::validate`]
pub fn config_inference_from_env() -> Result<LlmModelConfig, AiLlmError> {
    let mut cfg = LlmModelConfig::new(inference_endpoint(), model_selection_from_env());
    cfg.api_token = api_token();
    if let Some(t) = env_opt_f32("LLM_TEMPERATURE")? {
        cfg.temperature = t;
    }
    cfg.top_p = env_opt_f32("LLM_TOP_P")?;
    if let Some(s) = env_opt_bool("LLM_DO_SAMPLE")? {
        cfg.do_sample = s;
    }
    if let Some(t) = env_opt_u64("LLM_TIMEOUT_SECS")? {
        cfg.timeout_secs = t;
    }
    if let Some(t) = env_opt_u64("LLM_PROBE_TIMEOUT_SECS")? {
        cfg.probe_timeout_secs = t.min(MAX_PROBE_TIMEOUT_SECS);
    }
    cfg.validate()?;

    info!(
        endpoint = %cfg.endpoint,
        selection = cfg.selection.label(),
        candidates = ?cfg.selection.candidates(),
        timeout_secs = cfg.timeout_secs,
        "inference config loaded"
    );
    Ok(cfg)
}

/// Constructs the embedding model config from the environment.
///
/// # Errors
/// Returns [`crate::error_handler::ConfigError::InvalidNumber`] for malformed numbers.
pub fn config_embedding_from_env() -> Result<EmbeddingModelConfig, AiLlmError> {
    let dim = env_opt_u32("EMBEDDING_DIM")?
        .map(|d| d as usize)
        .unwrap_or(DEFAULT_EMBEDDING_DIM);
    let timeout_secs = env_opt_u64("EMBEDDING_TIMEOUT_SECS")?.unwrap_or(30);

    Ok(EmbeddingModelConfig {
        endpoint: inference_endpoint(),
        api_token: env_opt("HF_API_TOKEN"),
        model: env_opt("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        dim,
        timeout_secs,
    })
}
