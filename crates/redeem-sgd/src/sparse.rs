//! Sparse labelled feature vectors.
//!
//! A `SparseVector` stores only the non-zero coordinates of an example as
//! parallel `indices`/`values` arrays. Indices are strictly increasing, which
//! keeps dot products a single linear pass and makes duplicate features a
//! construction error rather than a silent double count.

use crate::error::{Result, SgdError};

/// Feature index reserved for the implicit bias term.
pub const BIAS_INDEX: usize = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
    label: f64,
    squared_norm: f64,
}

impl SparseVector {
    /// Build a vector, checking it against `dimensionality`.
    ///
    /// Fails with `InvalidVector` when the index/value lengths differ, indices
    /// are not strictly ascending, an index is out of range, or a value or the
    /// label is not finite.
    pub fn new(
        indices: Vec<usize>,
        values: Vec<f64>,
        label: f64,
        dimensionality: usize,
    ) -> Result<Self> {
        Self::checked(indices, values, label, dimensionality)
            .map_err(|reason| SgdError::invalid_vector(0, reason))
    }

    /// Build a vector from a dense row, keeping only the non-zero entries.
    pub fn from_dense(row: &[f64], label: f64) -> Result<Self> {
        let (indices, values): (Vec<usize>, Vec<f64>) = row
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (i, *v))
            .unzip();
        Self::new(indices, values, label, row.len().max(1))
    }

    pub(crate) fn checked(
        indices: Vec<usize>,
        values: Vec<f64>,
        label: f64,
        dimensionality: usize,
    ) -> std::result::Result<Self, String> {
        if indices.len() != values.len() {
            return Err(format!(
                "{} indices but {} values",
                indices.len(),
                values.len()
            ));
        }
        if !label.is_finite() {
            return Err(format!("label {} is not finite", label));
        }
        for (k, window) in indices.windows(2).enumerate() {
            if window[0] >= window[1] {
                return Err(format!(
                    "indices not strictly increasing at offset {} ({} then {})",
                    k + 1,
                    window[0],
                    window[1]
                ));
            }
        }
        if let Some(&last) = indices.last() {
            if last >= dimensionality {
                return Err(format!(
                    "index {} out of range for dimensionality {}",
                    last, dimensionality
                ));
            }
        }
        if let Some(bad) = values.iter().position(|v| !v.is_finite()) {
            return Err(format!(
                "value at feature {} is not finite",
                indices[bad]
            ));
        }

        let squared_norm = values.iter().map(|v| v * v).sum();
        Ok(Self {
            indices,
            values,
            label,
            squared_norm,
        })
    }

    /// Prepend the implicit bias feature `(0, 1.0)`.
    ///
    /// Callers must have checked that index 0 is unused.
    pub(crate) fn with_bias_term(mut self) -> Self {
        debug_assert!(self.indices.first() != Some(&BIAS_INDEX));
        self.indices.insert(0, BIAS_INDEX);
        self.values.insert(0, 1.0);
        self.squared_norm += 1.0;
        self
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn label(&self) -> f64 {
        self.label
    }

    /// Number of stored (non-zero) features.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Squared L2 norm of the feature values, computed once at construction.
    pub fn squared_norm(&self) -> f64 {
        self.squared_norm
    }

    /// Largest stored index, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Iterate `(index, value)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product against a dense slice. Indices past the end of `dense`
    /// contribute nothing.
    pub fn dot_dense(&self, dense: &[f64]) -> f64 {
        self.iter()
            .filter_map(|(i, v)| dense.get(i).map(|w| w * v))
            .sum()
    }
}
