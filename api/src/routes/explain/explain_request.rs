use explainer::PredictionResult;
use serde::Deserialize;

/// Request payload for /explain.
#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    /// The user's own question about the result.
    pub user_query: String,
    pub prediction_result: PredictionResult,
    /// Skip generation and answer with the pre-written risk-tier text.
    #[serde(default)]
    pub use_fallback: bool,
}
