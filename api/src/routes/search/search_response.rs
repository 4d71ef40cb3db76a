use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SearchResult {
    /// File name of the reference document.
    pub source: String,
    /// Chunk text.
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Most similar first.
    pub results: Vec<SearchResult>,
    pub total_found: usize,
}
