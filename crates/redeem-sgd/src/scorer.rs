//! Scoring trained weight vectors.
//!
//! Margins, 0/1 decisions, logistic outputs, and the regularized objective
//! used to compare hyper-parameter settings. None of this feeds back into
//! training.
use crate::config::{LearnerFamily, PredictionType, TrainConfig};
use crate::data_handling::Dataset;
use crate::gradient::{sigmoid, MAX_EXPONENT};
use crate::sparse::SparseVector;
use crate::weights::WeightVector;

/// Raw margin `w·x`. Includes the bias weight when `x` carries the bias
/// feature.
pub fn score(weights: &WeightVector, vector: &SparseVector) -> f64 {
    weights.dot(vector)
}

/// `1` when the margin is strictly positive, else `0`.
pub fn predict(weights: &WeightVector, vector: &SparseVector) -> u8 {
    u8::from(score(weights, vector) > 0.0)
}

/// One 0/1 decision per vector, in dataset order.
pub fn predict_dataset(weights: &WeightVector, dataset: &Dataset) -> Vec<u8> {
    dataset.iter().map(|v| predict(weights, v)).collect()
}

/// Raw margins for every vector, in dataset order.
pub fn margins(weights: &WeightVector, dataset: &Dataset) -> Vec<f64> {
    dataset.iter().map(|v| score(weights, v)).collect()
}

/// Logistic transform of a margin, in `(0, 1)`.
pub fn logistic(margin: f64) -> f64 {
    sigmoid(margin)
}

/// Margins or probabilities depending on `prediction_type`.
pub fn predictions(
    weights: &WeightVector,
    dataset: &Dataset,
    prediction_type: PredictionType,
) -> Vec<f64> {
    let raw = margins(weights, dataset);
    match prediction_type {
        PredictionType::Linear => raw,
        PredictionType::Logistic => raw.into_iter().map(logistic).collect(),
    }
}

/// Per-example loss of `family` at `margin` for `label`.
///
/// Hinge `max(0, 1 - y·p)`, logistic `ln(1 + exp(-y·p))`, squared error
/// `½(y - p)²`.
pub fn loss(family: LearnerFamily, margin: f64, label: f64) -> f64 {
    match family {
        LearnerFamily::SvmPegasos | LearnerFamily::SvmSgd => (1.0 - label * margin).max(0.0),
        LearnerFamily::Logreg | LearnerFamily::LogregPegasos => {
            let z = label * margin;
            // ln(1 + e^-z) without overflow for very negative z
            if z > MAX_EXPONENT {
                (-z).exp()
            } else if z < -MAX_EXPONENT {
                -z
            } else {
                (-z).exp().ln_1p()
            }
        }
        LearnerFamily::LmsRegression => {
            let residual = label - margin;
            0.5 * residual * residual
        }
    }
}

/// Mean loss over `dataset` plus `(lambda / 2)·‖w‖²`.
///
/// An empty dataset contributes no loss term.
pub fn objective(weights: &WeightVector, dataset: &Dataset, config: &TrainConfig) -> f64 {
    let family = config.learner_family();
    let regularization = 0.5 * config.lambda() * weights.squared_norm();
    if dataset.is_empty() {
        return regularization;
    }
    let total: f64 = dataset
        .iter()
        .map(|v| loss(family, score(weights, v), v.label()))
        .sum();
    total / dataset.len() as f64 + regularization
}

/// Fraction of 0/1 `predictions` matching the dataset labels (label > 0 is
/// class 1). Returns 0 for an empty dataset.
pub fn accuracy(predictions: &[u8], dataset: &Dataset) -> f64 {
    if dataset.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(dataset.iter())
        .filter(|(p, v)| (**p == 1) == (v.label() > 0.0))
        .count();
    correct as f64 / dataset.len() as f64
}
