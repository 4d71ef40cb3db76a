//! Inference gateway for hosted text-generation models.
//!
//! - `POST {endpoint}/{model}` with a bearer token and the JSON body
//!   `{inputs, parameters: {max_new_tokens, temperature, do_sample, top_p?, return_full_text: false}}`
//! - exactly one network call per [`InferenceGateway::generate`] call, no retries
//! - every failure is returned as a [`GenerationResponse::Degraded`] value
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::config::llm_model_config::LlmModelConfig;
//! use ai_llm_service::config::model_selection::ModelSelection;
//! use ai_llm_service::services::inference_service::InferenceGateway;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut cfg = LlmModelConfig::new(
//!     "https://api-inference.huggingface.co/models",
//!     ModelSelection::probe(["gpt2", "distilgpt2"], "gpt2"),
//! );
//! cfg.api_token = std::env::var("HF_API_TOKEN").ok();
//!
//! let gateway = InferenceGateway::new(cfg)?;
//! let out = gateway.generate("What is endometriosis?", 150, 30).await;
//! println!("{out:?}");
//! # Ok(()) }
//! ```

use std::{
    future::Future,
    pin::Pin,
    time::{Duration, Instant},
};

use reqwest::header;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    config::{llm_model_config::LlmModelConfig, model_selection::ModelSelection},
    error_handler::{AiLlmError, ConfigError, make_snippet, mask_secret},
    generation::{
        DegradedReason, GenerationRequest, GenerationResponse, TextGenerator, classify_response,
    },
    model_selector::{ModelProbe, ModelSelector, ProbeOutcome},
};

/// Test prompt sent to each candidate during model probing.
pub const PROBE_PROMPT: &str = "Hello";

/// Token budget of a probe.
pub const PROBE_MAX_TOKENS: u32 = 20;

/// Single gateway instance owning the HTTP client and the pinned model choice.
///
/// Construct once at startup, wrap in `Arc`, share with handlers. Each instance
/// has its own [`ModelSelector`]; nothing is stored in globals.
#[derive(Debug)]
pub struct InferenceGateway {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    selector: Option<ModelSelector>,
}

impl InferenceGateway {
    /// Creates a gateway from a validated config.
    ///
    /// # Errors
    /// - [`AiLlmError::Config`] if the config is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        cfg.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = cfg.api_token.as_deref() {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| {
                    AiLlmError::from(ConfigError::InvalidFormat {
                        var: "HF_API_TOKEN",
                        reason: "not a valid header value",
                    })
                })?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        // Timeouts are applied per request.
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let selector = match &cfg.selection {
            ModelSelection::Fixed(_) => None,
            ModelSelection::Probe {
                candidates,
                last_resort,
            } => Some(ModelSelector::new(candidates.clone(), last_resort.clone())),
        };

        info!(
            endpoint = %cfg.endpoint,
            selection = cfg.selection.label(),
            token = %cfg.api_token.as_deref().map(mask_secret).unwrap_or_else(|| "none".into()),
            timeout_secs = cfg.timeout_secs,
            "InferenceGateway initialized"
        );

        Ok(Self {
            client,
            cfg,
            selector,
        })
    }

    /// Gateway configuration.
    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }

    /// Model that will receive prompts, if already known without probing.
    pub fn pinned_model(&self) -> Option<&str> {
        match &self.cfg.selection {
            ModelSelection::Fixed(model) => Some(model),
            ModelSelection::Probe { .. } => self.selector.as_ref().and_then(|s| s.pinned()),
        }
    }

    /// Resolves the target model: the fixed one, or the pinned probe result.
    pub async fn resolve_model(&self) -> String {
        match (&self.cfg.selection, &self.selector) {
            (ModelSelection::Fixed(model), _) => model.clone(),
            (ModelSelection::Probe { .. }, Some(selector)) => selector.resolve(self).await,
            (ModelSelection::Probe { last_resort, .. }, None) => last_resort.clone(),
        }
    }

    /// Builds a request with the configured sampling parameters.
    pub fn request(&self, prompt: &str, max_tokens: u32) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.to_string(),
            max_tokens,
            temperature: self.cfg.temperature,
            top_p: self.cfg.top_p,
            do_sample: self.cfg.do_sample,
        }
    }

    /// Generates text for `prompt` on the resolved model.
    ///
    /// Issues exactly one generation request with `timeout_secs`. The first
    /// call in probe mode may additionally run the one-time probe sequence.
    #[instrument(skip_all, fields(prompt_len = prompt.len(), max_tokens = max_tokens))]
    pub async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> GenerationResponse {
        let model = self.resolve_model().await;
        let request = self.request(prompt, max_tokens);
        self.send(&model, &request, Duration::from_secs(timeout_secs.max(1)))
            .await
    }

    /// Sends one request to `model` and classifies the outcome.
    pub async fn send(
        &self,
        model: &str,
        request: &GenerationRequest,
        timeout: Duration,
    ) -> GenerationResponse {
        let started = Instant::now();
        let url = self.cfg.model_url(model);

        let (status, body) = match self.post(&url, request, timeout).await {
            Ok(pair) => pair,
            Err(reason) => {
                error!(
                    %model,
                    reason = %reason,
                    latency_ms = started.elapsed().as_millis(),
                    "generation request failed"
                );
                return GenerationResponse::Degraded(reason);
            }
        };

        let out = classify_response(status, &body);
        match &out {
            GenerationResponse::Success(text) => info!(
                %model,
                status,
                text_len = text.len(),
                latency_ms = started.elapsed().as_millis(),
                "generation completed"
            ),
            GenerationResponse::Degraded(reason) => warn!(
                %model,
                status,
                reason = %reason,
                snippet = %make_snippet(&body),
                latency_ms = started.elapsed().as_millis(),
                "generation degraded"
            ),
        }
        out
    }

    /// Raw POST returning `(status, body)`; transport failures become reasons.
    async fn post(
        &self,
        url: &str,
        request: &GenerationRequest,
        timeout: Duration,
    ) -> Result<(u16, String), DegradedReason> {
        debug!("POST {}", url);
        let resp = self
            .client
            .post(url)
            .timeout(timeout)
            .json(&request.body())
            .send()
            .await
            .map_err(transport_reason)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(transport_reason)?;
        Ok((status, body))
    }
}

/// Maps a transport error to its degraded reason.
fn transport_reason(err: reqwest::Error) -> DegradedReason {
    if err.is_timeout() {
        DegradedReason::Timeout
    } else if err.is_connect() {
        DegradedReason::ConnectionFailure
    } else {
        DegradedReason::Unexpected(err.to_string())
    }
}

impl ModelProbe for InferenceGateway {
    fn probe<'a>(
        &'a self,
        model: &'a str,
    ) -> Pin<Box<dyn Future<Output = ProbeOutcome> + Send + 'a>> {
        Box::pin(async move {
            let url = self.cfg.model_url(model);
            let request = self.request(PROBE_PROMPT, PROBE_MAX_TOKENS);
            let timeout = Duration::from_secs(self.cfg.probe_timeout_secs);

            match self.post(&url, &request, timeout).await {
                Ok((200, _)) => ProbeOutcome::Ready,
                Ok((503, _)) => ProbeOutcome::Loading,
                Ok((status, body)) => {
                    ProbeOutcome::Unavailable(format!("HTTP {status}: {}", make_snippet(&body)))
                }
                Err(reason) => ProbeOutcome::Unavailable(reason.to_string()),
            }
        })
    }
}

impl TextGenerator for InferenceGateway {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Pin<Box<dyn Future<Output = GenerationResponse> + Send + 'a>> {
        Box::pin(InferenceGateway::generate(
            self,
            prompt,
            max_tokens,
            timeout_secs,
        ))
    }
}
