//! Dense weight storage with lazy multiplicative shrinkage.
//!
//! The true coefficient vector is `scale * values`. Shrinking the whole
//! vector only touches `scale`, so an L2 decay step costs O(1) and an
//! update costs O(nnz) of the example, independent of the dimensionality.
//! The squared norm is kept up to date incrementally for the projection step.
//!
//! Repeated shrinking drives `scale` towards zero, where `values / scale`
//! would overflow. Once `scale` drops below [`MIN_SCALE`] the multiplier is
//! folded into `values` and the squared norm is recomputed exactly.
use std::fmt;

use ndarray::Array1;

use crate::sparse::SparseVector;

/// Fold threshold for the lazy scale multiplier.
pub const MIN_SCALE: f64 = 1e-9;

#[derive(Clone)]
pub struct WeightVector {
    values: Array1<f64>,
    scale: f64,
    squared_norm: f64,
}

impl WeightVector {
    pub fn zeros(dimensionality: usize) -> Self {
        Self {
            values: Array1::zeros(dimensionality),
            scale: 1.0,
            squared_norm: 0.0,
        }
    }

    /// Wrap externally supplied coefficients, e.g. a model trained elsewhere.
    pub fn from_vec(coefficients: Vec<f64>) -> Self {
        let values = Array1::from_vec(coefficients);
        let squared_norm = values.dot(&values);
        Self {
            values,
            scale: 1.0,
            squared_norm,
        }
    }

    pub fn dimensionality(&self) -> usize {
        self.values.len()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Coefficient at `index`; zero past the end.
    pub fn get(&self, index: usize) -> f64 {
        self.values.get(index).map_or(0.0, |w| w * self.scale)
    }

    pub fn squared_norm(&self) -> f64 {
        self.squared_norm
    }

    pub fn norm(&self) -> f64 {
        self.squared_norm.sqrt()
    }

    /// Current lazy multiplier. Exposed for diagnostics and tests.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// `w·x` over the non-zeros of `x`.
    pub fn dot(&self, x: &SparseVector) -> f64 {
        let raw: f64 = x
            .iter()
            .filter_map(|(i, v)| self.values.get(i).map(|w| w * v))
            .sum();
        raw * self.scale
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.iter().map(|w| w * self.scale).collect()
    }

    pub fn to_array(&self) -> Array1<f64> {
        self.values.mapv(|w| w * self.scale)
    }

    pub fn into_array(mut self) -> Array1<f64> {
        self.fold();
        self.values
    }

    /// Multiply every coefficient by `factor` in O(1).
    pub(crate) fn scale_by(&mut self, factor: f64) {
        if factor == 0.0 {
            self.values.fill(0.0);
            self.scale = 1.0;
            self.squared_norm = 0.0;
            return;
        }
        self.scale *= factor;
        self.squared_norm *= factor * factor;
        if self.scale.abs() < MIN_SCALE {
            self.fold();
        }
    }

    /// `w += coefficient * x`, touching only the indices stored in `x`.
    pub(crate) fn add_sparse(&mut self, x: &SparseVector, coefficient: f64) {
        if coefficient == 0.0 {
            return;
        }
        let inner = self.dot(x);
        let step = coefficient / self.scale;
        for (i, v) in x.iter() {
            if let Some(w) = self.values.get_mut(i) {
                *w += step * v;
            }
        }
        self.squared_norm += coefficient * coefficient * x.squared_norm() + 2.0 * coefficient * inner;
        if self.squared_norm < 0.0 {
            self.squared_norm = 0.0;
        }
    }

    /// Rescale so that `‖w‖ <= radius`. Returns whether a rescale happened.
    pub(crate) fn project_onto_ball(&mut self, radius: f64) -> bool {
        let norm = self.norm();
        if norm > radius && norm > 0.0 {
            self.scale_by(radius / norm);
            true
        } else {
            false
        }
    }

    /// Fold the lazy multiplier into the stored coefficients.
    pub(crate) fn fold(&mut self) {
        if self.scale != 1.0 {
            let scale = self.scale;
            self.values.mapv_inplace(|w| w * scale);
            self.scale = 1.0;
        }
        self.squared_norm = self.values.dot(&self.values);
    }
}

impl PartialEq for WeightVector {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|(a, b)| a * self.scale == b * other.scale)
    }
}

impl fmt::Debug for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nnz = self.values.iter().filter(|w| **w != 0.0).count();
        f.debug_struct("WeightVector")
            .field("dimensionality", &self.len())
            .field("nnz", &nnz)
            .field("scale", &self.scale)
            .field("norm", &self.norm())
            .finish()
    }
}

impl From<WeightVector> for Vec<f64> {
    fn from(value: WeightVector) -> Self {
        value.into_array().to_vec()
    }
}
