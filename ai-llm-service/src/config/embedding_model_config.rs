/// Configuration of the hosted feature-extraction (embedding) model.
#[derive(Clone)]
pub struct EmbeddingModelConfig {
    /// Base URL; the model URL is `{endpoint}/{model}`.
    pub endpoint: String,
    /// Optional bearer token.
    pub api_token: Option<String>,
    /// Model identifier (e.g. `sentence-transformers/all-MiniLM-L6-v2`).
    pub model: String,
    /// Expected embedding dimensionality.
    pub dim: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for EmbeddingModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingModelConfig")
            .field("endpoint", &self.endpoint)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("dim", &self.dim)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
