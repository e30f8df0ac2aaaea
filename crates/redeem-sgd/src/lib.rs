//! redeem-sgd: stochastic gradient descent for sparse linear models.
//!
//! This crate trains linear classifiers and regressors (Pegasos SVM, SGD SVM,
//! logistic regression with and without projection, least-mean-squares
//! regression) on sparse, high-dimensional feature vectors, and scores the
//! resulting weight vectors.
//!
//! The per-step cost is proportional to the number of non-zero features of the
//! sampled example: L2 shrinkage is kept as a lazy scalar multiplier on the
//! weight vector and the squared norm is maintained incrementally.
//!
//! ```no_run
//! use redeem_sgd::{build_dataset, objective, predict, train, TrainConfig};
//!
//! let rows = vec![
//!     (vec![0, 3], vec![1.0, 0.5], 1.0),
//!     (vec![1, 2], vec![0.7, 1.0], -1.0),
//! ];
//! let dataset = build_dataset(rows, 4)?;
//! let config = TrainConfig::builder()
//!     .iterations(1_000)
//!     .dimensionality(4)
//!     .lambda(0.01)
//!     .build()?;
//! let weights = train(&dataset, &config)?;
//! let labels = predict(&weights, &dataset);
//! let value = objective(&weights, &dataset, &config);
//! # Ok::<(), redeem_sgd::SgdError>(())
//! ```
pub mod config;
pub mod data_handling;
pub mod error;
pub mod gradient;
pub mod sampler;
pub mod scorer;
pub mod sparse;
pub mod trainer;
pub mod weights;

pub use config::{EtaSchedule, LearnerFamily, LoopPolicy, PredictionType, TrainConfig};
pub use data_handling::{build_dataset, Dataset, DatasetBuilder, Row};
pub use error::{Result, SgdError};
pub use scorer::objective;
pub use sparse::SparseVector;
pub use trainer::{train, train_many, Trainer};
pub use weights::WeightVector;

/// One 0/1 decision per vector of `dataset`, order preserved.
pub fn predict(weights: &WeightVector, dataset: &Dataset) -> Vec<u8> {
    scorer::predict_dataset(weights, dataset)
}
