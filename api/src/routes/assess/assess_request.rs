use explainer::{Explanation, PredictionResult, Symptoms};
use serde::{Deserialize, Serialize};

/// Request payload for /assess.
#[derive(Debug, Deserialize)]
pub struct AssessRequest {
    /// Symptom name to `0`/`1`, forwarded as-is to the prediction service.
    pub symptoms: Symptoms,
    #[serde(default = "default_query")]
    pub user_query: String,
    #[serde(default)]
    pub use_fallback: bool,
}

fn default_query() -> String {
    "What do my results mean?".to_string()
}

/// Response payload for /assess: the prediction plus its explanation.
#[derive(Debug, Serialize)]
pub struct AssessResponse {
    pub prediction: PredictionResult,
    #[serde(flatten)]
    pub explanation: Explanation,
}
