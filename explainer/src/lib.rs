//! Explanation pipeline for symptom-model predictions.
//!
//! Turns a [`PredictionResult`] plus the user's text into a supportive,
//! non-empty explanation or answer. Generation goes through any
//! [`TextGenerator`](ai_llm_service::generation::TextGenerator); degraded
//! generations fall back to pre-written texts.
//!
//! Public API: [`Explainer::explain`], [`Explainer::ask`] and the pure
//! building blocks they use (prompt rendering, fallback responders,
//! recommendations). [`PredictionClient`] talks to the prediction service.

mod api_types;
mod cfg;
mod error;
mod pipeline;
mod prediction_client;

pub mod fallback;
pub mod prediction;
pub mod prompt;
pub mod recommendations;

pub use api_types::{Answer, AnswerSource, Explanation};
pub use cfg::ExplainerConfig;
pub use error::ExplainerError;
pub use fallback::{FallbackMode, KeywordFallback, RiskTierFallback};
pub use pipeline::Explainer;
pub use prediction::PredictionResult;
pub use prediction_client::{PredictionClient, Symptoms};
pub use prompt::{PromptStyle, render_explanation_prompt, render_question_prompt};
pub use recommendations::{Priority, Recommendation, recommendations};
