//! Client for hosted feature-extraction (embedding) models.
//!
//! - `POST {endpoint}/{model}` with `{inputs, options: {wait_for_model: true}}`
//! - the answer is either a flat vector (sentence models) or a per-token
//!   matrix, which is mean-pooled into a single vector
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::config::default_config::config_embedding_from_env;
//! use ai_llm_service::services::embedding_service::EmbeddingService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = EmbeddingService::new(config_embedding_from_env()?)?;
//! let v = svc.embed("Pelvic pain during menstruation").await?;
//! println!("dimension = {}", v.len());
//! # Ok(()) }
//! ```

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    config::embedding_model_config::EmbeddingModelConfig,
    error_handler::{
        AiLlmError, ConfigError, HttpError, Result, make_snippet, validate_http_endpoint,
    },
};

/// Thin async client for one embedding model.
#[derive(Debug)]
pub struct EmbeddingService {
    client: reqwest::Client,
    cfg: EmbeddingModelConfig,
    url: String,
}

impl EmbeddingService {
    /// Creates a client for the configured model.
    ///
    /// # Errors
    /// - [`AiLlmError::Config`] if the endpoint, model or token is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: EmbeddingModelConfig) -> Result<Self> {
        validate_http_endpoint("HF_INFERENCE_URL", cfg.endpoint.trim())?;
        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        let mut headers = header::HeaderMap::new();
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

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()?;

        let url = format!(
            "{}/{}",
            cfg.endpoint.trim().trim_end_matches('/'),
            cfg.model.trim()
        );

        Ok(Self { client, cfg, url })
    }

    /// Expected dimensionality of returned vectors.
    pub fn dim(&self) -> usize {
        self.cfg.dim
    }

    /// Embeds a single text.
    ///
    /// # Errors
    /// - [`AiLlmError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client errors
    /// - [`AiLlmError::Decode`] if the payload is neither a vector nor a matrix
    #[instrument(skip_all, fields(model = %self.cfg.model, input_len = input.len()))]
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        let started = Instant::now();
        let body = FeatureExtractionRequest {
            inputs: input,
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        debug!("POST {}", self.url);
        let resp = self.client.post(&self.url).json(&body).send().await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(AiLlmError::HttpStatus(HttpError {
                status,
                url: self.url.clone(),
                snippet: make_snippet(&text),
            }));
        }

        let out: FeatureExtractionResponse = serde_json::from_str(&text).map_err(|e| {
            AiLlmError::Decode(format!(
                "serde error: {e}; expected `number[]` or `number[][]`"
            ))
        })?;
        let vector = out.into_vector()?;

        debug!(
            dim = vector.len(),
            latency_ms = started.elapsed().as_millis(),
            "embedding received"
        );
        Ok(vector)
    }
}

/* ==========================
HTTP payloads
========================== */

#[derive(Debug, Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a str,
    options: RequestOptions,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureExtractionResponse {
    Pooled(Vec<f32>),
    PerToken(Vec<Vec<f32>>),
}

impl FeatureExtractionResponse {
    fn into_vector(self) -> Result<Vec<f32>> {
        match self {
            Self::Pooled(v) if !v.is_empty() => Ok(v),
            Self::PerToken(rows) => mean_pool(&rows),
            Self::Pooled(_) => Err(AiLlmError::Decode("empty embedding".into())),
        }
    }
}

/// Averages per-token vectors column-wise.
fn mean_pool(rows: &[Vec<f32>]) -> Result<Vec<f32>> {
    let Some(width) = rows.first().map(Vec::len).filter(|w| *w > 0) else {
        return Err(AiLlmError::Decode("empty embedding matrix".into()));
    };
    if rows.iter().any(|r| r.len() != width) {
        return Err(AiLlmError::Decode("ragged embedding matrix".into()));
    }

    let mut acc = vec![0f32; width];
    for row in rows {
        for (a, x) in acc.iter_mut().zip(row) {
            *a += x;
        }
    }
    let n = rows.len() as f32;
    acc.iter_mut().for_each(|a| *a /= n);
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_vector_is_kept() {
        let r: FeatureExtractionResponse = serde_json::from_str("[0.5, -1.0, 2.0]").unwrap();
        assert_eq!(r.into_vector().unwrap(), vec![0.5, -1.0, 2.0]);
    }

    #[test]
    fn token_matrix_is_mean_pooled() {
        let r: FeatureExtractionResponse =
            serde_json::from_str("[[1.0, 2.0], [3.0, 4.0]]").unwrap();
        assert_eq!(r.into_vector().unwrap(), vec![2.0, 3.0]);
    }

    #[test]
    fn ragged_or_empty_matrix_is_rejected() {
        assert!(mean_pool(&[vec![1.0], vec![1.0, 2.0]]).is_err());
        assert!(mean_pool(&[]).is_err());
        let r: FeatureExtractionResponse = serde_json::from_str("[]").unwrap();
        assert!(r.into_vector().is_err());
    }

    #[test]
    fn new_rejects_bad_endpoint() {
        let cfg = EmbeddingModelConfig {
            endpoint: "localhost:8080".into(),
            api_token: None,
            model: "m".into(),
            dim: 3,
            timeout_secs: 5,
        };
        assert!(EmbeddingService::new(cfg).is_err());
    }
}
