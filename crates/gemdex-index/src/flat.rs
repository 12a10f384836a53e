//! Append-only flat vector index.
//!
//! Exact k-nearest-neighbor search by inner product over unit-normalized
//! vectors (cosine similarity). Positions are 0-based, assigned at insertion,
//! and never reused; the coordinator uses them as the join key into the
//! metadata store.
//!
//! The full index serializes to a single JSON file. No delete or
//! update-in-place exists; a replaced gem leaves its old slot orphaned.

use gemdex_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Append-only exact inner-product index over fixed-dimension vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    /// Create a new, empty index with the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }

    /// Restore a previously persisted index.
    ///
    /// Fails with `CorruptIndex` if the file is unreadable, unparseable, or
    /// its dimension does not match `expected_dimension`.
    pub fn load(path: &Path, expected_dimension: usize) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::corrupt_index(format!("cannot read index file {}: {e}", path.display()))
        })?;

        let index: Self = serde_json::from_str(&json).map_err(|e| {
            Error::corrupt_index(format!("cannot parse index file {}: {e}", path.display()))
        })?;

        if index.dimension != expected_dimension {
            return Err(Error::corrupt_index(format!(
                "dimension mismatch in {}: expected {expected_dimension}, found {}",
                path.display(),
                index.dimension
            )));
        }

        if let Some(bad) = index.vectors.iter().find(|v| v.len() != index.dimension) {
            return Err(Error::corrupt_index(format!(
                "vector of length {} in index of dimension {}",
                bad.len(),
                index.dimension
            )));
        }

        Ok(index)
    }

    /// Append a vector, returning its position (the count before insertion).
    pub fn add(&mut self, vector: Vec<f32>) -> Result<usize> {
        if vector.len() != self.dimension {
            return Err(Error::invalid_record(format!(
                "vector has dimension {}, index expects {}",
                vector.len(),
                self.dimension
            )));
        }

        let position = self.vectors.len();
        self.vectors.push(vector);
        Ok(position)
    }

    /// Return up to `k` `(position, score)` pairs by descending inner
    /// product. Ties break by insertion order (earlier position wins).
    /// An empty index yields an empty list.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        if self.vectors.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, v)| (position, dot(query, v)))
            .collect();

        // Stable sort keeps earlier positions first on score ties.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }

    /// Serialize the full index, overwriting any existing file at `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json).map_err(|e| Error::io_with_path(e, path))?;
        Ok(())
    }

    /// Number of vectors, orphaned slots included.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the index holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// The fixed vector dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Inner product of two equal-length vectors.
fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Scale a vector to unit L2 norm in place. Zero vectors are left as-is.
pub fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
