//! Prediction record produced by the symptom model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Literal used in prompts when the risk level is missing.
pub const UNKNOWN_RISK: &str = "Unknown";

/// Output of the symptom-prediction model. Read-only here.
///
/// Every field is optional on the wire; prompts substitute defaults for
/// anything missing instead of rejecting the record.
///
/// # Example
/// ```
/// use explainer::PredictionResult;
///
/// let p: PredictionResult = serde_json::from_str(
///     r#"{"risk_level":"High","probabilities":{"endometriosis":0.85}}"#,
/// ).unwrap();
/// assert_eq!(p.risk_level_or_unknown(), "High");
/// assert_eq!(p.probability_of("endometriosis"), 0.85);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Class name to probability in `[0, 1]`.
    #[serde(default)]
    pub probabilities: BTreeMap<String, f64>,
    /// `Low`, `Moderate` or `High`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
}

impl PredictionResult {
    /// Risk level as given, or [`UNKNOWN_RISK`] when absent or blank.
    pub fn risk_level_or_unknown(&self) -> &str {
        self.risk_level
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(UNKNOWN_RISK)
    }

    /// Probability of `class`, `0.0` when absent.
    pub fn probability_of(&self, class: &str) -> f64 {
        self.probabilities.get(class).copied().unwrap_or(0.0)
    }
}

/// Formats a probability as a whole percentage, e.g. `0.85` → `85%`.
///
/// Exact ties round half to even (`0.125` → `12%`), like Python's `{:.0%}`.
pub fn format_percent(p: f64) -> String {
    format!("{:.0}%", p * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_get_defaults() {
        let p: PredictionResult = serde_json::from_str("{}").unwrap();
        assert_eq!(p.risk_level_or_unknown(), "Unknown");
        assert_eq!(p.probability_of("endometriosis"), 0.0);

        let blank = PredictionResult {
            risk_level: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(blank.risk_level_or_unknown(), "Unknown");
    }

    #[test]
    fn percent_has_no_decimals() {
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(0.2), "20%");
        assert_eq!(format_percent(0.45), "45%");
        assert_eq!(format_percent(0.853), "85%");
        assert_eq!(format_percent(1.0), "100%");
    }

    #[test]
    fn exact_ties_round_to_even() {
        assert_eq!(format_percent(0.125), "12%");
        assert_eq!(format_percent(0.375), "38%");
    }
}
