//! In-memory exact k-nearest-neighbor index over stored chunks.

use std::cmp::Ordering;

use crate::{
    config::DistanceKind,
    errors::RagError,
    record::{RagHit, StoredChunk},
};

/// Flat index; search is a full scan, which is plenty for a reference corpus.
#[derive(Clone, Debug)]
pub struct VectorIndex {
    dim: usize,
    distance: DistanceKind,
    rows: Vec<StoredChunk>,
}

impl VectorIndex {
    pub fn new(dim: usize, distance: DistanceKind) -> Self {
        Self {
            dim,
            distance,
            rows: Vec::new(),
        }
    }

    /// Builds an index, rejecting rows of the wrong dimension.
    pub fn from_rows(
        dim: usize,
        distance: DistanceKind,
        rows: Vec<StoredChunk>,
    ) -> Result<Self, RagError> {
        let mut idx = Self::new(dim, distance);
        idx.extend(rows)?;
        Ok(idx)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[StoredChunk] {
        &self.rows
    }

    /// Appends rows; nothing is added if any row has the wrong dimension.
    pub fn extend(&mut self, rows: Vec<StoredChunk>) -> Result<(), RagError> {
        if let Some(bad) = rows.iter().find(|r| r.embedding.len() != self.dim) {
            return Err(RagError::VectorSizeMismatch {
                got: bad.embedding.len(),
                want: self.dim,
            });
        }
        self.rows.extend(rows);
        Ok(())
    }

    /// Up to `k` hits ordered by decreasing score.
    ///
    /// Ties keep insertion order. An empty index or `k == 0` yields no hits.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<RagHit>, RagError> {
        if self.rows.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dim {
            return Err(RagError::VectorSizeMismatch {
                got: query.len(),
                want: self.dim,
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| (i, score(self.distance, query, &r.embedding)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, score)| RagHit {
                chunk: self.rows[i].chunk.clone(),
                score,
            })
            .collect())
    }
}

/// Similarity where higher is closer. Euclid is reported as `-distance`.
pub fn score(kind: DistanceKind, a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    match kind {
        DistanceKind::Dot => dot,
        DistanceKind::Cosine => {
            let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
            if na == 0.0 || nb == 0.0 {
                0.0
            } else {
                dot / (na * nb)
            }
        }
        DistanceKind::Euclid => {
            -a.iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt()
        }
    }
}
