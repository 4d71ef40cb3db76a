//! Core data models used by the library.

use serde::{Deserialize, Serialize};

/// Document type attached to every file loaded from the documents directory.
pub const MEDICAL_KNOWLEDGE: &str = "medical_knowledge";

/// Metadata shared by a document and all of its chunks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Origin of the document (file name for loaded documents).
    pub source: String,
    /// Document category.
    #[serde(rename = "type")]
    pub doc_type: String,
}

/// Unchunked source document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Document of type [`MEDICAL_KNOWLEDGE`] tagged with `source`.
    pub fn medical(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: DocumentMetadata {
                source: source.into(),
                doc_type: MEDICAL_KNOWLEDGE.to_string(),
            },
        }
    }
}

/// Contiguous, bounded substring of a document; the unit of embedding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable identifier (source, position and text hash).
    pub id: String,
    pub text: String,
    /// Position of the chunk within its document.
    pub order: u32,
    pub metadata: DocumentMetadata,
}

/// Persisted row: a chunk plus its embedding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredChunk {
    #[serde(flatten)]
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// A single retrieval hit; higher `score` means more similar.
#[derive(Clone, Debug, PartialEq)]
pub struct RagHit {
    pub chunk: Chunk,
    pub score: f32,
}
