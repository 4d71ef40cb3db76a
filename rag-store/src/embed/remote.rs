//! Remote feature-extraction embedder.
//!
//! Wraps [`EmbeddingService`] and checks every vector against the expected
//! dimension.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::services::embedding_service::EmbeddingService;
use tracing::warn;

use crate::{EmbeddingsProvider, RagError};

#[derive(Clone, Debug)]
pub struct RemoteEmbedder {
    svc: Arc<EmbeddingService>,
    model: String,
}

impl RemoteEmbedder {
    pub fn new(svc: Arc<EmbeddingService>, model: impl Into<String>) -> Self {
        Self {
            svc,
            model: model.into(),
        }
    }
}

impl EmbeddingsProvider for RemoteEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
        Box::pin(async move {
            let v = self.svc.embed(text).await?;
            if v.len() != self.svc.dim() {
                warn!(got = v.len(), want = self.svc.dim(), "embedding dimension mismatch");
                return Err(RagError::VectorSizeMismatch {
                    got: v.len(),
                    want: self.svc.dim(),
                });
            }
            Ok(v)
        })
    }

    fn dim(&self) -> usize {
        self.svc.dim()
    }

    fn name(&self) -> String {
        self.model.clone()
    }
}
