use crate::config::model_selection::ModelSelection;
use crate::error_handler::{ConfigError, Result, validate_http_endpoint, validate_range_f32};

/// Default base URL of the hosted inference API.
pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";

/// Upper bound for a single model probe.
pub const MAX_PROBE_TIMEOUT_SECS: u64 = 10;

/// Configuration of the inference gateway.
///
/// # Fields
///
/// - `endpoint`: base URL; a model is addressed as `{endpoint}/{model}`.
/// - `api_token`: optional bearer token, injected from the environment.
/// - `selection`: fixed model or ordered candidates to probe.
/// - `temperature`, `top_p`, `do_sample`: sampling parameters sent with every prompt.
/// - `timeout_secs`: default timeout of a generation call.
/// - `probe_timeout_secs`: timeout of a single model probe (at most 10s).
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_model_config::LlmModelConfig;
/// use ai_llm_service::config::model_selection::ModelSelection;
///
/// let cfg = LlmModelConfig::new(
///     "https://api-inference.huggingface.co/models",
///     ModelSelection::Fixed("microsoft/DialoGPT-medium".into()),
/// );
/// assert!(cfg.validate().is_ok());
/// assert_eq!(
///     cfg.model_url("gpt2"),
///     "https://api-inference.huggingface.co/models/gpt2"
/// );
/// ```
#[derive(Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Inference API base URL.
    pub endpoint: String,

    /// Optional bearer token for the inference API.
    pub api_token: Option<String>,

    /// Model selection strategy.
    pub selection: ModelSelection,

    /// Sampling temperature (controls creativity).
    pub temperature: f32,

    /// Nucleus sampling parameter; omitted from the request when `None`.
    pub top_p: Option<f32>,

    /// Whether the model samples (`do_sample`).
    pub do_sample: bool,

    /// Default generation timeout (in seconds).
    pub timeout_secs: u64,

    /// Timeout of a single model probe (in seconds).
    pub probe_timeout_secs: u64,
}

impl LlmModelConfig {
    /// Creates a config with the sampling defaults used by the explanation service.
    pub fn new(endpoint: impl Into<String>, selection: ModelSelection) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token: None,
            selection,
            temperature: 0.7,
            top_p: Some(0.9),
            do_sample: true,
            timeout_secs: 30,
            probe_timeout_secs: MAX_PROBE_TIMEOUT_SECS,
        }
    }

    /// Full URL of a model on this endpoint.
    pub fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.endpoint.trim().trim_end_matches('/'), model)
    }

    /// Validates endpoint, sampling ranges, timeouts and model names.
    ///
    /// # Errors
    /// Returns [`crate::error_handler::AiLlmError::Config`] describing the first
    /// invalid field.
    pub fn validate(&self) -> Result<()> {
        validate_http_endpoint("HF_INFERENCE_URL", self.endpoint.trim())?;
        validate_range_f32("temperature", self.temperature, 0.0, 2.0)?;
        if let Some(top_p) = self.top_p {
            validate_range_f32("top_p", top_p, 0.0, 1.0)?;
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange {
                field: "timeout_secs",
                detail: "expected > 0",
            }
            .into());
        }
        if self.probe_timeout_secs == 0 || self.probe_timeout_secs > MAX_PROBE_TIMEOUT_SECS {
            return Err(ConfigError::OutOfRange {
                field: "probe_timeout_secs",
                detail: "expected 1..=10",
            }
            .into());
        }
        match &self.selection {
            ModelSelection::Fixed(model) if model.trim().is_empty() => {
                Err(ConfigError::EmptyModel.into())
            }
            ModelSelection::Probe {
                candidates,
                last_resort,
            } if last_resort.trim().is_empty()
                || candidates.iter().any(|c| c.trim().is_empty()) =>
            {
                Err(ConfigError::EmptyModel.into())
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for LlmModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmModelConfig")
            .field("endpoint", &self.endpoint)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("selection", &self.selection)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("do_sample", &self.do_sample)
            .field("timeout_secs", &self.timeout_secs)
            .field("probe_timeout_secs", &self.probe_timeout_secs)
            .finish()
    }
}
