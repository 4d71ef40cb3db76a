use std::{str::FromStr, sync::Arc};

use ai_llm_service::{
    config::default_config::{config_embedding_from_env, config_inference_from_env},
    error_handler::env_opt,
    services::{embedding_service::EmbeddingService, inference_service::InferenceGateway},
};
use explainer::{Explainer, ExplainerConfig, PredictionClient};
use rag_store::{EmbeddingsProvider, HashingEmbedder, RagConfig, RagStore, RemoteEmbedder};
use tracing::info;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Prompt → generation → fallback pipeline.
    pub explainer: Explainer,
    /// Inference gateway, kept for model status reporting.
    pub gateway: Arc<InferenceGateway>,
    /// Reference-document store backing `/search`.
    pub store: Arc<RagStore>,
    /// Client of the symptom-prediction service.
    pub predictor: PredictionClient,
}

/// Backend used to embed reference documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// Hosted feature-extraction model.
    Remote,
    /// Local feature hashing; no network.
    Hashing,
}

impl FromStr for EmbeddingProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "hashing" => Ok(Self::Hashing),
            other => Err(AppError::Config(format!(
                "EMBEDDING_PROVIDER: expected `remote` or `hashing`, got `{other}`"
            ))),
        }
    }
}

impl AppState {
    /// Load shared state from environment variables.
    ///
    /// Nothing here touches the network; the model probe and the store load
    /// happen on first use.
    pub fn from_env() -> Result<Self, AppError> {
        let gateway = Arc::new(InferenceGateway::new(config_inference_from_env()?)?);

        let provider = env_opt("EMBEDDING_PROVIDER")
            .map(|v| v.parse::<EmbeddingProvider>())
            .transpose()?
            .unwrap_or(EmbeddingProvider::Remote);
        let embedding_cfg = config_embedding_from_env()?;
        let embedder: Arc<dyn EmbeddingsProvider> = match provider {
            EmbeddingProvider::Hashing => Arc::new(HashingEmbedder::new(embedding_cfg.dim)),
            EmbeddingProvider::Remote => {
                let model = embedding_cfg.model.clone();
                let svc = Arc::new(EmbeddingService::new(embedding_cfg)?);
                Arc::new(RemoteEmbedder::new(svc, model))
            }
        };
        let store = Arc::new(RagStore::new(RagConfig::from_env()?, embedder)?);

        let explainer_cfg = ExplainerConfig::from_env();
        let predictor =
            PredictionClient::new(&explainer_cfg.prediction_api_url, explainer_cfg.timeout_secs)?;

        info!(
            provider = ?provider,
            prompt_style = ?explainer_cfg.prompt_style,
            fallback_mode = ?explainer_cfg.fallback_mode,
            prediction_api = %predictor.url(),
            "application state ready"
        );

        Ok(Self {
            explainer: Explainer::new(gateway.clone(), explainer_cfg),
            gateway,
            store,
            predictor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_provider_parses() {
        assert_eq!(
            "Hashing".parse::<EmbeddingProvider>().unwrap(),
            EmbeddingProvider::Hashing
        );
        assert_eq!(
            " remote ".parse::<EmbeddingProvider>().unwrap(),
            EmbeddingProvider::Remote
        );
        assert!(matches!(
            "ollama".parse::<EmbeddingProvider>(),
            Err(AppError::Config(_))
        ));
    }
}
