//! Retrieval store over local reference documents.
//!
//! This crate provides a small API to:
//! - Index a directory of `.txt` documents into overlapping chunks with embeddings
//! - Persist the chunks under a directory and reload them on the next start
//! - Retrieve the top‑K chunks for a textual query
//!
//! Re-index policy: a persisted store is loaded if present and reused as is;
//! only [`RagStore::rebuild`] re-reads the documents directory.

mod chunking;
mod config;
mod embed;
mod errors;
mod loader;
mod record;
mod store_io;
mod vector_index;

pub use chunking::split_document;
pub use config::{DistanceKind, RagConfig};
pub use embed::{EmbeddingsProvider, hashing::HashingEmbedder, remote::RemoteEmbedder};
pub use errors::RagError;
pub use loader::load_text_documents;
pub use record::{Chunk, Document, DocumentMetadata, MEDICAL_KNOWLEDGE, RagHit, StoredChunk};
pub use store_io::Manifest;

use std::{path::Path, sync::Arc, time::Instant};

use futures::{StreamExt, TryStreamExt, stream};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use vector_index::VectorIndex;

/// High-level facade that wires configuration, embedder and index.
///
/// Writers are serialized and embed before taking the index lock, so searches
/// on an initialized store never wait for embedding work.
pub struct RagStore {
    cfg: RagConfig,
    embedder: Arc<dyn EmbeddingsProvider>,
    index: RwLock<Option<VectorIndex>>,
    write_gate: Mutex<()>,
}

impl RagStore {
    /// Constructs a store; nothing is read from disk until first use.
    ///
    /// # Errors
    /// Returns `RagError::Config` if the configuration is invalid.
    pub fn new(cfg: RagConfig, embedder: Arc<dyn EmbeddingsProvider>) -> Result<Self, RagError> {
        cfg.validate()?;
        debug!(
            persist_dir = %cfg.persist_dir.display(),
            embedder = %embedder.name(),
            dim = embedder.dim(),
            "RagStore::new"
        );
        Ok(Self {
            cfg,
            embedder,
            index: RwLock::new(None),
            write_gate: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &RagConfig {
        &self.cfg
    }

    /// Number of chunks currently searchable (0 before initialization).
    pub async fn len(&self) -> usize {
        self.index.read().await.as_ref().map_or(0, VectorIndex::len)
    }

    pub async fn is_initialized(&self) -> bool {
        self.index.read().await.is_some()
    }

    /// Initializes the store from `dir`, returning the number of indexed chunks.
    ///
    /// If the store is already initialized, or a compatible persisted store
    /// exists, it is reused unchanged and `dir` is not read.
    ///
    /// # Errors
    /// - [`RagError::MissingDirectory`] if documents must be read and `dir` is absent
    /// - [`RagError::NoDocuments`] if `dir` holds no documents; nothing is persisted
    /// - embedding and I/O errors
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub async fn index(&self, dir: impl AsRef<Path>) -> Result<usize, RagError> {
        let _gate = self.write_gate.lock().await;

        if let Some(idx) = self.index.read().await.as_ref() {
            debug!(chunks = idx.len(), "store already initialized");
            return Ok(idx.len());
        }
        if let Some(idx) = self.load_persisted()? {
            let n = idx.len();
            *self.index.write().await = Some(idx);
            info!(chunks = n, "reusing persisted store");
            return Ok(n);
        }

        self.build_from(dir.as_ref()).await
    }

    /// Drops the persisted store and re-indexes `dir`.
    ///
    /// The previous index stays searchable until the new one is ready.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub async fn rebuild(&self, dir: impl AsRef<Path>) -> Result<usize, RagError> {
        let _gate = self.write_gate.lock().await;
        // Fail before touching the persisted store.
        let docs = load_documents(dir.as_ref())?;
        store_io::remove(&self.cfg.persist_dir)?;
        self.publish_documents(docs).await
    }

    /// Chunks, embeds and persists additional documents.
    ///
    /// An uninitialized store is initialized first: the persisted store is
    /// loaded if present, otherwise an empty one is created. Returns the
    /// number of chunks added.
    #[instrument(skip_all, fields(documents = docs.len()))]
    pub async fn add(&self, docs: Vec<Document>) -> Result<usize, RagError> {
        let _gate = self.write_gate.lock().await;

        let current = self.index.read().await.as_ref().map(VectorIndex::len);
        let base_len = match current {
            Some(n) => n,
            None => {
                let idx = match self.load_persisted()? {
                    Some(idx) => idx,
                    None => {
                        // Start from a clean file set, never appending to foreign rows.
                        store_io::write_all(&self.cfg.persist_dir, &self.manifest(0), &[])?;
                        VectorIndex::new(self.embedder.dim(), self.cfg.distance)
                    }
                };
                let n = idx.len();
                *self.index.write().await = Some(idx);
                n
            }
        };

        let chunks = self.chunk_all(&docs);
        let rows = self.embed_chunks(chunks).await?;
        let added = rows.len();

        store_io::append(
            &self.cfg.persist_dir,
            &self.manifest(base_len + added),
            &rows,
        )?;
        if let Some(idx) = self.index.write().await.as_mut() {
            idx.extend(rows)?;
        }

        info!(added, total = base_len + added, "documents added");
        Ok(added)
    }

    /// Up to `k` chunks most similar to `query`, best first.
    ///
    /// An uninitialized store loads the persisted store if there is one and
    /// otherwise returns no hits; documents are never indexed implicitly.
    ///
    /// # Errors
    /// Embedding failures of the query.
    #[instrument(skip_all, fields(query_len = query.len(), k = k))]
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<RagHit>, RagError> {
        if query.trim().is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if !self.ensure_loaded().await? {
            debug!("search on uninitialized store");
            return Ok(Vec::new());
        }

        if self.len().await == 0 {
            debug!("search on empty store");
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let qv = self.embedder.embed(query).await?;
        let hits = match self.index.read().await.as_ref() {
            Some(idx) => idx.search(&qv, k)?,
            None => Vec::new(),
        };

        debug!(
            hits = hits.len(),
            latency_ms = started.elapsed().as_millis(),
            "search completed"
        );
        Ok(hits)
    }

    /* ---------------- internals ---------------- */

    async fn ensure_loaded(&self) -> Result<bool, RagError> {
        if self.index.read().await.is_some() {
            return Ok(true);
        }
        let _gate = self.write_gate.lock().await;
        if self.index.read().await.is_some() {
            return Ok(true);
        }
        match self.load_persisted()? {
            Some(idx) => {
                *self.index.write().await = Some(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Persisted index if present and produced by the current embedder.
    fn load_persisted(&self) -> Result<Option<VectorIndex>, RagError> {
        let Some((manifest, rows)) = store_io::load(&self.cfg.persist_dir)? else {
            return Ok(None);
        };
        if manifest.dim != self.embedder.dim() || manifest.embedder != self.embedder.name() {
            warn!(
                persisted = %manifest.embedder,
                persisted_dim = manifest.dim,
                current = %self.embedder.name(),
                current_dim = self.embedder.dim(),
                "persisted store was built by another embedder; ignoring it"
            );
            return Ok(None);
        }
        Ok(Some(VectorIndex::from_rows(
            manifest.dim,
            self.cfg.distance,
            rows,
        )?))
    }

    async fn build_from(&self, dir: &Path) -> Result<usize, RagError> {
        let docs = load_documents(dir)?;
        self.publish_documents(docs).await
    }

    async fn publish_documents(&self, docs: Vec<Document>) -> Result<usize, RagError> {
        let started = Instant::now();
        let chunks = self.chunk_all(&docs);
        let rows = self.embed_chunks(chunks).await?;

        let idx = VectorIndex::from_rows(self.embedder.dim(), self.cfg.distance, rows)?;
        store_io::write_all(&self.cfg.persist_dir, &self.manifest(idx.len()), idx.rows())?;

        let n = idx.len();
        *self.index.write().await = Some(idx);
        info!(
            documents = docs.len(),
            chunks = n,
            latency_ms = started.elapsed().as_millis(),
            "documents indexed"
        );
        Ok(n)
    }

    fn chunk_all(&self, docs: &[Document]) -> Vec<Chunk> {
        docs.iter()
            .flat_map(|d| split_document(d, self.cfg.chunk_size, self.cfg.chunk_overlap))
            .collect()
    }

    /// Embeds chunks with bounded concurrency, preserving order.
    async fn embed_chunks(&self, chunks: Vec<Chunk>) -> Result<Vec<StoredChunk>, RagError> {
        let embedder = self.embedder.as_ref();
        stream::iter(chunks)
            .map(|chunk| async move {
                let embedding = embedder.embed(&chunk.text).await?;
                Ok::<_, RagError>(StoredChunk { chunk, embedding })
            })
            .buffered(self.cfg.embedding_concurrency)
            .try_collect()
            .await
    }

    fn manifest(&self, chunks: usize) -> Manifest {
        Manifest::new(self.embedder.name(), self.embedder.dim(), chunks)
    }
}

/// Like [`load_text_documents`], but an empty directory is an error so an
/// empty store is never persisted.
fn load_documents(dir: &Path) -> Result<Vec<Document>, RagError> {
    let docs = load_text_documents(dir)?;
    if docs.is_empty() {
        warn!(dir = %dir.display(), "documents directory is empty");
        return Err(RagError::NoDocuments(dir.to_path_buf()));
    }
    Ok(docs)
}
