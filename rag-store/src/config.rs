//! Retrieval configuration.
//!
//! # Environment variables
//! - `RAG_DOCS_DIR`          = directory of `.txt` reference documents (default `./medical_knowledge`)
//! - `RAG_PERSIST_DIR`       = directory of the persisted store (default `./vector_store`)
//! - `RAG_CHUNK_SIZE`        = chunk length in characters (default 500)
//! - `RAG_CHUNK_OVERLAP`     = overlap with the previous chunk (default 50)
//! - `RAG_TOP_K`             = default number of search hits (default 3)
//! - `RAG_DISTANCE`          = `cosine` | `dot` | `euclid` (default cosine)
//! - `EMBEDDING_CONCURRENCY` = in-flight embedding requests while indexing (default 4)

use std::{path::PathBuf, str::FromStr};

use ai_llm_service::error_handler::env_opt;

use crate::errors::RagError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine similarity (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2), reported as a negated distance.
    Euclid,
}

impl FromStr for DistanceKind {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "dot" => Ok(Self::Dot),
            "euclid" | "euclidean" | "l2" => Ok(Self::Euclid),
            other => Err(RagError::Config(format!("unknown distance `{other}`"))),
        }
    }
}

/// Configuration for indexing and retrieval.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Directory scanned (non-recursively) for `.txt` documents.
    pub docs_dir: PathBuf,
    /// Directory holding the persisted chunks and manifest.
    pub persist_dir: PathBuf,
    /// Chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared with the previous chunk.
    pub chunk_overlap: usize,
    /// Default number of hits returned by search.
    pub top_k: usize,
    /// Similarity function.
    pub distance: DistanceKind,
    /// Maximum embedding requests in flight during indexing.
    pub embedding_concurrency: usize,
}

impl RagConfig {
    /// Creates a default config for the given directories.
    pub fn new_default(docs_dir: impl Into<PathBuf>, persist_dir: impl Into<PathBuf>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            persist_dir: persist_dir.into(),
            chunk_size: 500,
            chunk_overlap: 50,
            top_k: 3,
            distance: DistanceKind::Cosine,
            embedding_concurrency: 4,
        }
    }

    /// Builds the config from the environment, falling back to defaults.
    ///
    /// # Errors
    /// Returns [`RagError::Config`] for malformed values or failed validation.
    pub fn from_env() -> Result<Self, RagError> {
        let mut cfg = Self::new_default(
            env_opt("RAG_DOCS_DIR").unwrap_or_else(|| "./medical_knowledge".into()),
            env_opt("RAG_PERSIST_DIR").unwrap_or_else(|| "./vector_store".into()),
        );
        if let Some(v) = parse_env("RAG_CHUNK_SIZE")? {
            cfg.chunk_size = v;
        }
        if let Some(v) = parse_env("RAG_CHUNK_OVERLAP")? {
            cfg.chunk_overlap = v;
        }
        if let Some(v) = parse_env("RAG_TOP_K")? {
            cfg.top_k = v;
        }
        if let Some(v) = env_opt("RAG_DISTANCE") {
            cfg.distance = v.parse()?;
        }
        if let Some(v) = parse_env("EMBEDDING_CONCURRENCY")? {
            cfg.embedding_concurrency = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be > 0".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(RagError::Config(
                "chunk_overlap must be smaller than chunk_size".into(),
            ));
        }
        if self.top_k == 0 {
            return Err(RagError::Config("top_k must be > 0".into()));
        }
        if self.embedding_concurrency == 0 {
            return Err(RagError::Config("embedding_concurrency must be > 0".into()));
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(var: &str) -> Result<Option<T>, RagError> {
    env_opt(var)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| RagError::Config(format!("{var}: expected a positive integer")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = RagConfig::new_default("docs", "store");
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.chunk_size, 500);
        assert_eq!(cfg.chunk_overlap, 50);
        assert_eq!(cfg.top_k, 3);
    }

    #[test]
    fn overlap_must_be_smaller_than_size() {
        let mut cfg = RagConfig::new_default("docs", "store");
        cfg.chunk_overlap = 500;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn distance_parses_case_insensitively() {
        assert_eq!("Cosine".parse::<DistanceKind>().unwrap(), DistanceKind::Cosine);
        assert_eq!("EUCLID".parse::<DistanceKind>().unwrap(), DistanceKind::Euclid);
        assert!("manhattan".parse::<DistanceKind>().is_err());
    }
}
