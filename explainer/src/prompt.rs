//! Prompt builder: fixed instructional templates around the assessment.
//!
//! Both templates state the assistant role, repeat the user's text verbatim,
//! state the assessment results and close with output constraints (length
//! ceiling, always recommend professional consultation). Rendering is pure.

use std::str::FromStr;

use crate::prediction::{PredictionResult, format_percent};

/// Template family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PromptStyle {
    /// Multi-section prompt with numbered instructions.
    #[default]
    Detailed,
    /// Single-paragraph prompt for small models.
    Compact,
}

impl FromStr for PromptStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detailed" => Ok(Self::Detailed),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown prompt style `{other}`")),
        }
    }
}

/// Values interpolated into every template.
struct Assessment<'a> {
    risk_level: &'a str,
    percent: String,
}

impl<'a> Assessment<'a> {
    fn of(prediction: &'a PredictionResult, positive_class: &str) -> Self {
        Self {
            risk_level: prediction.risk_level_or_unknown(),
            percent: format_percent(prediction.probability_of(positive_class)),
        }
    }
}

/// Renders the explanation prompt for `query`.
///
/// # Example
/// ```
/// use explainer::{PredictionResult, PromptStyle, render_explanation_prompt};
///
/// let p: PredictionResult =
///     serde_json::from_str(r#"{"risk_level":"High","probabilities":{"endometriosis":0.85}}"#).unwrap();
/// let prompt = render_explanation_prompt(PromptStyle::Detailed, "What does this mean?", &p, "endometriosis");
/// assert!(prompt.contains("Risk Level: High"));
/// assert!(prompt.contains("85%"));
/// ```
pub fn render_explanation_prompt(
    style: PromptStyle,
    query: &str,
    prediction: &PredictionResult,
    positive_class: &str,
) -> String {
    let a = Assessment::of(prediction, positive_class);
    match style {
        PromptStyle::Detailed => format!(
            "You are a helpful medical assistant. A user has received an endometriosis risk assessment.

User's Question: {query}

Assessment Results:
- Risk Level: {risk}
- Probability: {pct}

Please provide a clear, supportive explanation that:
1. Explains what the results mean in simple terms
2. Gives practical next steps
3. Emphasizes consulting healthcare professionals
4. Is reassuring but informative

Keep your response under 200 words and be empathetic.",
            risk = a.risk_level,
            pct = a.percent,
        ),
        PromptStyle::Compact => format!(
            "You are a supportive medical assistant. A person has received an endometriosis risk assessment with {pct} probability and {risk} risk level. They ask: \"{query}\"

Please provide a clear, supportive explanation in under 150 words that explains what the results mean and gives practical next steps. Be empathetic and always recommend consulting healthcare professionals.",
            risk = a.risk_level,
            pct = a.percent,
        ),
    }
}

/// Renders the question-answering prompt for `question`.
pub fn render_question_prompt(
    style: PromptStyle,
    question: &str,
    prediction: &PredictionResult,
    positive_class: &str,
) -> String {
    let a = Assessment::of(prediction, positive_class);
    match style {
        PromptStyle::Detailed => format!(
            "You are a medical information assistant. Answer this question about endometriosis:

Question: {question}

Context: The user has a {risk} risk assessment with {pct} probability.

Provide a helpful, accurate answer in 2-3 sentences. Always recommend consulting healthcare professionals for medical advice.",
            risk = a.risk_level,
            pct = a.percent,
        ),
        PromptStyle::Compact => format!(
            "You are a medical information assistant. Question about endometriosis: \"{question}\"

Context: The person has a {risk} risk assessment with {pct} probability.

Answer in at most 3 sentences. Always recommend consulting healthcare professionals for medical advice.",
            risk = a.risk_level,
            pct = a.percent,
        ),
    }
}
