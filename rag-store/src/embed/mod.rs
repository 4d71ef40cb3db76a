use crate::errors::RagError;
use std::{future::Future, pin::Pin};

/// Provider interface for embedding generation.
///
/// Async because the remote provider performs HTTP requests. Implement this
/// trait to plug in another backend.
pub trait EmbeddingsProvider: Send + Sync {
    /// Async embedding function.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>>;

    /// Dimensionality of every returned vector.
    fn dim(&self) -> usize;

    /// Short name recorded in the store manifest.
    fn name(&self) -> String;
}

pub mod hashing;
pub mod remote;
