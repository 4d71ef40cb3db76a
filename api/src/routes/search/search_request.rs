use serde::Deserialize;

/// Query string of `GET /search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    /// Number of hits; defaults to the configured top-k.
    pub limit: Option<usize>,
}
