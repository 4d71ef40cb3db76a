//! Shared fixtures for handler tests.

use std::{future::Future, path::Path, pin::Pin, sync::Arc};

use ai_llm_service::{
    config::{llm_model_config::LlmModelConfig, model_selection::ModelSelection},
    generation::{GenerationResponse, TextGenerator},
    services::inference_service::InferenceGateway,
};
use explainer::{Explainer, ExplainerConfig, PredictionClient};
use rag_store::{HashingEmbedder, RagConfig, RagStore};

use crate::core::app_state::AppState;

/// Nothing listens on the discard port; calls fail fast with a refused connection.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Generator that always returns the same response.
pub struct Fixed(pub GenerationResponse);

impl TextGenerator for Fixed {
    fn generate<'a>(
        &'a self,
        _prompt: &'a str,
        _max_tokens: u32,
        _timeout_secs: u64,
    ) -> Pin<Box<dyn Future<Output = GenerationResponse> + Send + 'a>> {
        let reply = self.0.clone();
        Box::pin(async move { reply })
    }
}

/// State with a scripted generator, a hashing-embedder store under `root`
/// and a prediction client pointed at `prediction_url`.
pub fn state(reply: GenerationResponse, root: &Path, prediction_url: &str) -> Arc<AppState> {
    let gateway = InferenceGateway::new(LlmModelConfig::new(
        UNREACHABLE,
        ModelSelection::Fixed("test-model".into()),
    ))
    .unwrap();

    let cfg = RagConfig::new_default(root.join("docs"), root.join("store"));
    let store = RagStore::new(cfg, Arc::new(HashingEmbedder::new(256))).unwrap();

    Arc::new(AppState {
        explainer: Explainer::new(Arc::new(Fixed(reply)), ExplainerConfig::default()),
        gateway: Arc::new(gateway),
        store: Arc::new(store),
        predictor: PredictionClient::new(prediction_url, 5).unwrap(),
    })
}

/// Writes `name` into the documents directory of a [`state`] rooted at `root`.
pub fn write_doc(root: &Path, name: &str, content: &str) {
    let docs = root.join("docs");
    std::fs::create_dir_all(&docs).unwrap();
    std::fs::write(docs.join(name), content).unwrap();
}
