//! Exact nearest-neighbour search over a row-major matrix.

use std::cmp::Ordering;

use super::error::SemanticError;
use super::{Neighbor, VectorIndex};

/// Euclidean distance. Slices must have equal length.
#[inline]
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

/// Brute-force L2 index. Every query scans every row.
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dim: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            data: Vec::new(),
        }
    }

    pub fn with_capacity(dim: usize, rows: usize) -> Self {
        Self {
            dim,
            data: Vec::with_capacity(dim * rows),
        }
    }

    /// Row `index`, if present.
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.dim)?;
        self.data.get(start..start + self.dim)
    }
}

impl VectorIndex for FlatL2Index {
    fn dim(&self) -> usize {
        self.dim
    }

    fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    fn add(&mut self, vector: &[f32]) -> Result<usize, SemanticError> {
        if vector.len() != self.dim {
            return Err(SemanticError::DimensionMismatch {
                expected: self.dim,
                actual: vector.len(),
            });
        }
        let id = self.len();
        self.data.extend_from_slice(vector);
        Ok(id)
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, SemanticError> {
        if query.len() != self.dim {
            return Err(SemanticError::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }
        if k == 0 || self.dim == 0 {
            return Ok(Vec::new());
        }

        let mut neighbors: Vec<Neighbor> = (0..self.len())
            .filter_map(|index| {
                self.row(index).map(|row| Neighbor {
                    index,
                    distance: l2_distance(query, row),
                })
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        neighbors.truncate(k);
        Ok(neighbors)
    }
}
