//! Fixed-size overlapping character windows.
//!
//! A document of `L` characters is cut into windows of `size` characters
//! advancing by `size - overlap`, so each window starts with the trailing
//! `overlap` characters of the previous one. The last window may be shorter.
//! Windows are measured in characters, never splitting a UTF-8 sequence.

use sha2::{Digest, Sha256};
use tracing::trace;

use crate::record::{Chunk, Document};

/// Splits a document into overlapping chunks that inherit its metadata.
///
/// Empty content and `size == 0` produce no chunks. An `overlap >= size` is
/// clamped so that the window always advances by at least one character.
pub fn split_document(doc: &Document, size: usize, overlap: usize) -> Vec<Chunk> {
    if doc.content.is_empty() || size == 0 {
        return Vec::new();
    }

    // Byte offset of every char boundary, plus the end of the string.
    let bounds: Vec<usize> = doc
        .content
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(doc.content.len()))
        .collect();
    let char_len = bounds.len() - 1;
    let step = size.saturating_sub(overlap).max(1);

    let mut out = Vec::new();
    let mut start = 0usize;
    let mut order = 0u32;
    loop {
        let end = (start + size).min(char_len);
        let text = &doc.content[bounds[start]..bounds[end]];
        out.push(Chunk {
            id: chunk_id(&doc.metadata.source, order, text),
            text: text.to_string(),
            order,
            metadata: doc.metadata.clone(),
        });

        if end == char_len {
            break;
        }
        start += step;
        order = order.saturating_add(1);
    }

    trace!(
        source = %doc.metadata.source,
        chars = char_len,
        chunks = out.len(),
        "document split"
    );
    out
}

/// Stable chunk id from the document source, position and text.
fn chunk_id(source: &str, order: u32, text: &str) -> String {
    let mut h = Sha256::new();
    h.update(source.as_bytes());
    h.update(order.to_le_bytes());
    h.update(text.as_bytes());
    format!("{:x}", h.finalize())
}
