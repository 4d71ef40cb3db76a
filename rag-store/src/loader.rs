//! Discovery of plain-text reference documents.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, error, info};

use crate::{errors::RagError, record::Document};

/// Loads every `.txt` file directly inside `dir` as one [`Document`].
///
/// Non-recursive. Files are visited in name order so indexing is
/// reproducible. A file that cannot be read (or is not UTF-8) is logged and
/// skipped; it never aborts the rest of the directory.
///
/// # Errors
/// - [`RagError::MissingDirectory`] if `dir` does not exist or is not a directory
/// - [`RagError::Io`] if the directory itself cannot be listed
pub fn load_text_documents(dir: impl AsRef<Path>) -> Result<Vec<Document>, RagError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(RagError::MissingDirectory(dir.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        match entry {
            Ok(e) => {
                let path = e.path();
                if path.is_file() && is_text_file(&path) {
                    paths.push(path);
                }
            }
            Err(e) => error!(dir = %dir.display(), error = %e, "unreadable directory entry"),
        }
    }
    paths.sort();

    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!(%source, chars = content.chars().count(), "document loaded");
                docs.push(Document::medical(source, content));
            }
            Err(e) => error!(file = %path.display(), error = %e, "skipping unreadable document"),
        }
    }

    info!(dir = %dir.display(), documents = docs.len(), "documents loaded");
    Ok(docs)
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
}
