//! Explanation pipeline: prompt → generation → fallback.
//!
//! Every call produces a non-empty text. A `Degraded` generation is routed to
//! the configured [`FallbackResponder`]; the forced `use_fallback` path always
//! uses the risk-tier text. Which path was taken is logged, not returned in
//! the response body.

use std::sync::Arc;
use std::time::Instant;

use ai_llm_service::generation::{GenerationResponse, TextGenerator};
use tracing::{info, instrument, warn};

use crate::{
    api_types::{Answer, AnswerSource, Explanation},
    cfg::ExplainerConfig,
    fallback::{FallbackContext, FallbackResponder, RiskTierFallback},
    prediction::PredictionResult,
    prompt::{render_explanation_prompt, render_question_prompt},
    recommendations::recommendations,
};

pub struct Explainer {
    generator: Arc<dyn TextGenerator>,
    fallback: Box<dyn FallbackResponder>,
    cfg: ExplainerConfig,
}

impl Explainer {
    /// Builds a pipeline; the degraded-path responder follows `cfg.fallback_mode`.
    pub fn new(generator: Arc<dyn TextGenerator>, cfg: ExplainerConfig) -> Self {
        let fallback = cfg.fallback_mode.responder();
        Self {
            generator,
            fallback,
            cfg,
        }
    }

    pub fn config(&self) -> &ExplainerConfig {
        &self.cfg
    }

    /// Explains a prediction in response to `query`.
    #[instrument(skip_all, fields(forced = use_fallback, risk = prediction.risk_level_or_unknown()))]
    pub async fn explain(
        &self,
        query: &str,
        prediction: &PredictionResult,
        use_fallback: bool,
    ) -> Explanation {
        let risk_level = prediction.risk_level.as_deref();
        let (explanation, source) = if use_fallback {
            (
                RiskTierFallback::for_risk_level(risk_level).to_string(),
                AnswerSource::ForcedFallback,
            )
        } else {
            let prompt = render_explanation_prompt(
                self.cfg.prompt_style,
                query,
                prediction,
                &self.cfg.positive_class,
            );
            self.complete(&prompt, self.cfg.explain_max_tokens, query, risk_level)
                .await
        };

        info!(source = source.as_str(), chars = explanation.len(), "explanation ready");
        Explanation {
            explanation,
            risk_level: prediction.risk_level_or_unknown().to_string(),
            recommendations: recommendations(risk_level),
            source,
        }
    }

    /// Answers a free-form question in the context of a prediction.
    #[instrument(skip_all, fields(risk = prediction.risk_level_or_unknown()))]
    pub async fn ask(&self, question: &str, prediction: &PredictionResult) -> Answer {
        let prompt = render_question_prompt(
            self.cfg.prompt_style,
            question,
            prediction,
            &self.cfg.positive_class,
        );
        let (answer, source) = self
            .complete(
                &prompt,
                self.cfg.ask_max_tokens,
                question,
                prediction.risk_level.as_deref(),
            )
            .await;

        info!(source = source.as_str(), chars = answer.len(), "answer ready");
        Answer { answer, source }
    }

    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        user_text: &str,
        risk_level: Option<&str>,
    ) -> (String, AnswerSource) {
        let t0 = Instant::now();
        let res = self
            .generator
            .generate(prompt, max_tokens, self.cfg.timeout_secs)
            .await;
        let latency_ms = t0.elapsed().as_millis() as u64;

        match res {
            GenerationResponse::Success(text) => (text, AnswerSource::Generated),
            GenerationResponse::Degraded(reason) => {
                warn!(
                    reason = %reason,
                    responder = self.fallback.name(),
                    latency_ms = latency_ms,
                    "generation degraded; using fallback text"
                );
                let ctx = FallbackContext {
                    risk_level,
                    text: user_text,
                };
                (self.fallback.respond(&ctx), AnswerSource::Fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{
        FallbackMode, HIGH_RISK_TEXT, LOW_RISK_TEXT, MODERATE_RISK_TEXT, WHAT_IS_TEXT,
    };
    use ai_llm_service::generation::DegradedReason;
    use std::{
        future::Future,
        pin::Pin,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    /// Returns a fixed response and records every prompt it sees.
    struct Scripted {
        reply: GenerationResponse,
        calls: AtomicUsize,
        prompts: Mutex<Vec<(String, u32)>>,
    }

    impl Scripted {
        fn new(reply: GenerationResponse) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    impl TextGenerator for Scripted {
        fn generate<'a>(
            &'a self,
            prompt: &'a str,
            max_tokens: u32,
            _timeout_secs: u64,
        ) -> Pin<Box<dyn Future<Output = GenerationResponse> + Send + 'a>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                self.prompts
                    .lock()
                    .unwrap()
                    .push((prompt.to_string(), max_tokens));
                self.reply.clone()
            })
        }
    }

    fn high_085() -> PredictionResult {
        serde_json::from_str(r#"{"risk_level":"High","probabilities":{"endometriosis":0.85}}"#)
            .unwrap()
    }

    #[tokio::test]
    async fn forced_fallback_uses_high_risk_text() {
        let generator = Scripted::new(GenerationResponse::Success("unused".into()));
        let ex = Explainer::new(generator.clone(), ExplainerConfig::default());

        let out = ex.explain("What does this mean?", &high_085(), true).await;

        assert!(
            out.explanation
                .contains("Schedule an appointment with a gynecologist as soon as possible")
        );
        assert_eq!(out.explanation, HIGH_RISK_TEXT);
        assert_eq!(out.risk_level, "High");
        assert!(!out.recommendations.is_empty());
        assert_eq!(out.source, AnswerSource::ForcedFallback);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn forced_fallback_ignores_keyword_mode() {
        let cfg = ExplainerConfig {
            fallback_mode: FallbackMode::Keyword,
            ..Default::default()
        };
        let ex = Explainer::new(
            Scripted::new(GenerationResponse::Success("unused".into())),
            cfg,
        );
        let p = PredictionResult {
            risk_level: Some("Low".into()),
            ..Default::default()
        };
        let out = ex.explain("What is endometriosis?", &p, true).await;
        assert_eq!(out.explanation, LOW_RISK_TEXT);
    }

    #[tokio::test]
    async fn generated_text_is_returned() {
        let generator = Scripted::new(GenerationResponse::Success("Generated answer".into()));
        let ex = Explainer::new(generator.clone(), ExplainerConfig::default());

        let out = ex.explain("What does this mean?", &high_085(), false).await;

        assert_eq!(out.explanation, "Generated answer");
        assert_eq!(out.source, AnswerSource::Generated);

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].0.contains("What does this mean?"));
        assert!(prompts[0].0.contains("85%"));
        assert_eq!(prompts[0].1, 250);
    }

    #[tokio::test]
    async fn degraded_explanation_uses_risk_tier_text() {
        let ex = Explainer::new(
            Scripted::new(GenerationResponse::Degraded(DegradedReason::ModelLoading)),
            ExplainerConfig::default(),
        );
        let out = ex.explain("anything", &PredictionResult::default(), false).await;

        assert_eq!(out.explanation, MODERATE_RISK_TEXT);
        assert_eq!(out.risk_level, "Unknown");
        assert_eq!(out.source, AnswerSource::Fallback);
        assert!(!out.recommendations.is_empty());
    }

    #[tokio::test]
    async fn degraded_answer_uses_keyword_rules_on_question() {
        let cfg = ExplainerConfig {
            fallback_mode: FallbackMode::Keyword,
            ..Default::default()
        };
        let generator = Scripted::new(GenerationResponse::Degraded(DegradedReason::Timeout));
        let ex = Explainer::new(generator.clone(), cfg);

        let out = ex.ask("What is endometriosis?", &high_085()).await;

        assert_eq!(out.answer, WHAT_IS_TEXT);
        assert_eq!(out.source, AnswerSource::Fallback);
        assert_eq!(generator.prompts.lock().unwrap()[0].1, 150);
    }

    #[tokio::test]
    async fn response_body_hides_source() {
        let ex = Explainer::new(
            Scripted::new(GenerationResponse::Degraded(DegradedReason::NotFound)),
            ExplainerConfig::default(),
        );
        let out = ex.ask("q", &high_085()).await;
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v, serde_json::json!({ "answer": HIGH_RISK_TEXT }));
    }
}
