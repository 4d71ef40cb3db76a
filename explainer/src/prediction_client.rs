//! Client for the symptom-prediction service (`POST {base}/predict`).

use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

use ai_llm_service::error_handler::{HttpError, make_snippet, validate_http_endpoint};
use tracing::{debug, instrument};

use crate::{error::ExplainerError, prediction::PredictionResult};

/// Symptom name to presence flag (`0` or `1`).
pub type Symptoms = BTreeMap<String, u8>;

#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: reqwest::Client,
    url: String,
}

impl PredictionClient {
    /// # Errors
    /// [`ExplainerError::Config`] if `base_url` is not an http(s) URL.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ExplainerError> {
        let base = base_url.trim().trim_end_matches('/');
        validate_http_endpoint("PREDICTION_API_URL", base)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            url: format!("{base}/predict"),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends the flat symptom map and decodes the prediction.
    ///
    /// # Errors
    /// - [`ExplainerError::Http`] on transport failures
    /// - [`ExplainerError::PredictionStatus`] for non-2xx answers
    /// - [`ExplainerError::Decode`] if the body is not a prediction record
    #[instrument(skip_all, fields(symptoms = symptoms.len()))]
    pub async fn predict(&self, symptoms: &Symptoms) -> Result<PredictionResult, ExplainerError> {
        let started = Instant::now();
        let resp = self.client.post(&self.url).json(symptoms).send().await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ExplainerError::PredictionStatus(HttpError {
                status,
                url: self.url.clone(),
                snippet: make_snippet(&text),
            }));
        }

        let out: PredictionResult = serde_json::from_str(&text)
            .map_err(|e| ExplainerError::Decode(format!("prediction payload: {e}")))?;

        debug!(
            risk = out.risk_level_or_unknown(),
            latency_ms = started.elapsed().as_millis() as u64,
            "prediction received"
        );
        Ok(out)
    }
}
