//! Persisted store layout.
//!
//! ```text
//! <persist_dir>/
//!   manifest.json   # embedder name, dimension, chunk count, timestamp
//!   chunks.jsonl    # one StoredChunk per line
//! ```
//!
//! The manifest is written last, so a directory without one is treated as
//! "no persisted store".

use std::{
    fs::{self, File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{errors::RagError, record::StoredChunk};

const MANIFEST_FILE: &str = "manifest.json";
const CHUNKS_FILE: &str = "chunks.jsonl";

/// Summary of the persisted store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Name of the embedder that produced the vectors.
    pub embedder: String,
    pub dim: usize,
    pub chunks: usize,
    /// RFC3339 UTC time of the last write.
    pub updated_at: String,
}

impl Manifest {
    pub fn new(embedder: impl Into<String>, dim: usize, chunks: usize) -> Self {
        Self {
            embedder: embedder.into(),
            dim,
            chunks,
            updated_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        }
    }
}

fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILE)
}

fn chunks_path(dir: &Path) -> PathBuf {
    dir.join(CHUNKS_FILE)
}

/// Whether `dir` holds a persisted store.
pub fn exists(dir: impl AsRef<Path>) -> bool {
    manifest_path(dir.as_ref()).is_file()
}

/// Loads the persisted store, or `None` if there is none.
///
/// Malformed chunk lines are logged and skipped.
///
/// # Errors
/// - [`RagError::Io`] if present files cannot be read
/// - [`RagError::Parse`] if the manifest is malformed
pub fn load(dir: impl AsRef<Path>) -> Result<Option<(Manifest, Vec<StoredChunk>)>, RagError> {
    let dir = dir.as_ref();
    if !exists(dir) {
        return Ok(None);
    }

    let manifest: Manifest = serde_json::from_str(&fs::read_to_string(manifest_path(dir))?)?;
    let mut rows = Vec::with_capacity(manifest.chunks);
    let path = chunks_path(dir);
    if path.is_file() {
        let reader = BufReader::new(File::open(&path)?);
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredChunk>(&line) {
                Ok(row) => rows.push(row),
                Err(e) => warn!(line = i + 1, error = %e, "skipping malformed stored chunk"),
            }
        }
    }

    info!(dir = %dir.display(), chunks = rows.len(), embedder = %manifest.embedder, "persisted store loaded");
    Ok(Some((manifest, rows)))
}

/// Replaces the persisted store with `rows`.
pub fn write_all(
    dir: impl AsRef<Path>,
    manifest: &Manifest,
    rows: &[StoredChunk],
) -> Result<(), RagError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let _ = fs::remove_file(manifest_path(dir));

    let tmp = dir.join(format!("{CHUNKS_FILE}.tmp"));
    write_rows(File::create(&tmp)?, rows)?;
    fs::rename(&tmp, chunks_path(dir))?;
    write_manifest(dir, manifest)?;

    debug!(dir = %dir.display(), chunks = rows.len(), "persisted store written");
    Ok(())
}

/// Appends `rows` to the persisted store and refreshes the manifest.
pub fn append(
    dir: impl AsRef<Path>,
    manifest: &Manifest,
    rows: &[StoredChunk],
) -> Result<(), RagError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(chunks_path(dir))?;
    write_rows(file, rows)?;
    write_manifest(dir, manifest)?;

    debug!(dir = %dir.display(), appended = rows.len(), total = manifest.chunks, "persisted store appended");
    Ok(())
}

/// Removes the persisted store files; a missing store is not an error.
pub fn remove(dir: impl AsRef<Path>) -> Result<(), RagError> {
    let dir = dir.as_ref();
    for path in [manifest_path(dir), chunks_path(dir)] {
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn write_rows(file: File, rows: &[StoredChunk]) -> Result<(), RagError> {
    let mut w = BufWriter::new(file);
    for row in rows {
        serde_json::to_writer(&mut w, row)?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

fn write_manifest(dir: &Path, manifest: &Manifest) -> Result<(), RagError> {
    let tmp = dir.join(format!("{MANIFEST_FILE}.tmp"));
    fs::write(&tmp, serde_json::to_vec_pretty(manifest)?)?;
    fs::rename(&tmp, manifest_path(dir))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Chunk, Document};

    fn row(source: &str, text: &str) -> StoredChunk {
        let doc = Document::medical(source, text);
        StoredChunk {
            chunk: Chunk {
                id: format!("{source}-0"),
                text: text.into(),
                order: 0,
                metadata: doc.metadata,
            },
            embedding: vec![1.0, 0.0],
        }
    }

    #[test]
    fn missing_store_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path()).unwrap().is_none());
        assert!(!exists(dir.path()));
    }

    #[test]
    fn write_then_append_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("store");

        write_all(&store, &Manifest::new("hashing-2", 2, 1), &[row("a.txt", "alpha")]).unwrap();
        append(&store, &Manifest::new("hashing-2", 2, 2), &[row("b.txt", "beta")]).unwrap();

        let (manifest, rows) = load(&store).unwrap().unwrap();
        assert_eq!(manifest.chunks, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].chunk.metadata.source, "b.txt");
    }

    #[test]
    fn persisted_rows_use_type_key() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path(), &Manifest::new("h", 2, 1), &[row("a.txt", "alpha")]).unwrap();
        let raw = fs::read_to_string(dir.path().join(CHUNKS_FILE)).unwrap();
        assert!(raw.contains(r#""type":"medical_knowledge""#));
    }

    #[test]
    fn remove_clears_store() {
        let dir = tempfile::tempdir().unwrap();
        write_all(dir.path(), &Manifest::new("h", 2, 1), &[row("a.txt", "alpha")]).unwrap();
        remove(dir.path()).unwrap();
        assert!(!exists(dir.path()));
        remove(dir.path()).unwrap();
    }
}
