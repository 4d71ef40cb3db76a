//! Public API types re-used by external crates (e.g., the HTTP API layer).

use serde::Serialize;

use crate::recommendations::Recommendation;

/// Where a response text came from. Only visible in logs, never in the body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerSource {
    /// Text produced by the inference endpoint.
    Generated,
    /// Forced fallback (`use_fallback`).
    ForcedFallback,
    /// Generation degraded; pre-written text substituted.
    Fallback,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::ForcedFallback => "forced_fallback",
            Self::Fallback => "fallback",
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Generated)
    }
}

/// Result of the "explain" operation.
///
/// # Example
/// ```
/// use explainer::{AnswerSource, Explanation};
/// let e = Explanation {
///     explanation: "text".into(),
///     risk_level: "High".into(),
///     recommendations: vec![],
///     source: AnswerSource::Generated,
/// };
/// let v = serde_json::to_value(&e).unwrap();
/// assert!(v.get("source").is_none());
/// ```
#[derive(Clone, Debug, Serialize)]
pub struct Explanation {
    pub explanation: String,
    pub risk_level: String,
    pub recommendations: Vec<Recommendation>,
    #[serde(skip)]
    pub source: AnswerSource,
}

/// Result of the "ask" operation.
#[derive(Clone, Debug, Serialize)]
pub struct Answer {
    pub answer: String,
    #[serde(skip)]
    pub source: AnswerSource,
}
