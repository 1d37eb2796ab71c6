//! Exhaustive nearest-neighbor search over passage embeddings.
//!
//! [`FlatIndex`] stores the full embedding matrix of one document and
//! answers queries by exact squared-L2 scan. There is no approximation
//! and no mutation after construction; a changed document gets a whole
//! new index.

use crate::error::{RagError, Result};

/// One search hit: a stored vector and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Squared Euclidean distance between the query and the stored
    /// vector. Squared, not rooted — the retrieval threshold was
    /// calibrated against squared distances.
    pub distance: f32,
    /// Position of the stored vector, equal to the passage index.
    pub index: usize,
}

/// A flat (exact) L2 index over a fixed set of embedding vectors.
///
/// Built once from the passage embedding matrix; immutable thereafter.
/// Vectors are stored row-major in a single contiguous buffer.
#[derive(Debug)]
pub struct FlatIndex {
    data: Vec<f32>,
    dimensions: usize,
    rows: usize,
}

impl FlatIndex {
    /// Build an index from an embedding matrix (one row per passage).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Index`] if the matrix is empty, a row is
    /// zero-length, or rows disagree on dimension. Callers reject
    /// empty documents before reaching this point, so an empty matrix
    /// here indicates a bug upstream.
    pub fn build(matrix: &[Vec<f32>]) -> Result<Self> {
        let Some(first) = matrix.first() else {
            return Err(RagError::Index("cannot build an index from zero vectors".to_string()));
        };
        let dimensions = first.len();
        if dimensions == 0 {
            return Err(RagError::Index("embedding dimension must be non-zero".to_string()));
        }

        let mut data = Vec::with_capacity(matrix.len() * dimensions);
        for (row, vector) in matrix.iter().enumerate() {
            if vector.len() != dimensions {
                return Err(RagError::Index(format!(
                    "vector {row} has dimension {} but the index expects {dimensions}",
                    vector.len()
                )));
            }
            data.extend_from_slice(vector);
        }

        Ok(Self { data, dimensions, rows: matrix.len() })
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Whether the index stores no vectors. Always false for a built
    /// index.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Dimensionality of the stored vectors.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Find the `k` nearest stored vectors to `query`.
    ///
    /// Results are ordered by ascending squared-L2 distance; equal
    /// distances keep original passage order. Returns fewer than `k`
    /// neighbors when the index holds fewer vectors.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Index`] if the query dimension does not
    /// match the stored vectors.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimensions {
            return Err(RagError::Index(format!(
                "query has dimension {} but the index expects {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut neighbors: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dimensions)
            .enumerate()
            .map(|(index, row)| Neighbor { distance: squared_l2(query, row), index })
            .collect();

        // Stable tie-break: equal distances preserve passage order.
        neighbors.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        neighbors.truncate(k);
        Ok(neighbors)
    }
}

/// Squared Euclidean distance between two equal-length vectors.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_rejects_empty_matrix() {
        assert!(matches!(FlatIndex::build(&[]), Err(RagError::Index(_))));
    }

    #[test]
    fn build_rejects_ragged_rows() {
        let matrix = vec![vec![0.0, 1.0], vec![1.0]];
        assert!(matches!(FlatIndex::build(&matrix), Err(RagError::Index(_))));
    }

    #[test]
    fn search_orders_by_distance_with_stable_ties() {
        let matrix = vec![
            vec![1.0, 0.0], // distance 2.0 from query
            vec![0.0, 1.0], // distance 0.0
            vec![1.0, 0.0], // distance 2.0, ties with row 0 — row 0 wins
        ];
        let index = FlatIndex::build(&matrix).unwrap();
        let hits = index.search(&[0.0, 1.0], 3).unwrap();
        let order: Vec<usize> = hits.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![1, 0, 2]);
        assert_eq!(hits[0].distance, 0.0);
        assert_eq!(hits[1].distance, 2.0);
    }

    #[test]
    fn search_rejects_dimension_mismatch() {
        let index = FlatIndex::build(&[vec![0.0, 0.0]]).unwrap();
        assert!(matches!(index.search(&[0.0], 1), Err(RagError::Index(_))));
    }
}
