//! Runtime configuration loaded from environment variables.

use ai_llm_service::error_handler::env_opt;
use tracing::warn;

use crate::{fallback::FallbackMode, prompt::PromptStyle};

/// Config bag for the explanation pipeline. All fields have defaults via `from_env`.
#[derive(Clone, Debug)]
pub struct ExplainerConfig {
    pub prompt_style: PromptStyle,
    /// Responder used for degraded generations.
    pub fallback_mode: FallbackMode,
    pub explain_max_tokens: u32,
    pub ask_max_tokens: u32,
    /// Probability key interpolated into prompts.
    pub positive_class: String,
    pub timeout_secs: u64,
    /// Base URL of the symptom-prediction service.
    pub prediction_api_url: String,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            prompt_style: PromptStyle::Detailed,
            fallback_mode: FallbackMode::RiskTier,
            explain_max_tokens: 250,
            ask_max_tokens: 150,
            positive_class: "endometriosis".to_string(),
            timeout_secs: 30,
            prediction_api_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

impl ExplainerConfig {
    /// Build from environment variables. Unparsable values are logged and
    /// replaced with their defaults.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            prompt_style: parse("PROMPT_STYLE", d.prompt_style),
            fallback_mode: parse("FALLBACK_MODE", d.fallback_mode),
            explain_max_tokens: parse("EXPLAIN_MAX_TOKENS", d.explain_max_tokens).max(1),
            ask_max_tokens: parse("ASK_MAX_TOKENS", d.ask_max_tokens).max(1),
            positive_class: env_opt("POSITIVE_CLASS").unwrap_or(d.positive_class),
            timeout_secs: parse("LLM_TIMEOUT_SECS", d.timeout_secs).max(1),
            prediction_api_url: env_opt("PREDICTION_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(d.prediction_api_url),
        }
    }
}

fn parse<T>(k: &str, dflt: T) -> T
where
    T: std::str::FromStr + std::fmt::Debug,
    T::Err: std::fmt::Display,
{
    match env_opt(k) {
        None => dflt,
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!(var = k, value = %raw, error = %e, default = ?dflt, "ignoring invalid value");
            dflt
        }),
    }
}
