use explainer::PredictionResult;
use serde::Deserialize;

/// Request payload for /ask.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question.
    pub question: String,
    /// Assessment the question refers to.
    #[serde(default)]
    pub prediction_result: PredictionResult,
}
