//! The SGD training loop.
//!
//! A `Trainer` moves through `Initialized -> Running -> Completed`. All input
//! checks happen before `Running`; once the loop starts it runs exactly
//! `iterations` steps and cannot fail. `train` consumes the trainer and hands
//! the weight vector to the caller, so a completed trainer cannot be reused.
use rayon::prelude::*;

use crate::config::{EtaSchedule, TrainConfig};
use crate::data_handling::Dataset;
use crate::error::{Result, SgdError};
use crate::gradient::{apply_step, StepOutcome};
use crate::sampler::Sampler;
use crate::weights::WeightVector;

/// Number of progress lines logged at debug level over one run.
const PROGRESS_REPORTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerState {
    Initialized,
    Running,
    Completed,
}

#[derive(Debug)]
pub struct Trainer {
    config: TrainConfig,
    state: TrainerState,
    weights: WeightVector,
}

impl Trainer {
    /// Allocate a zero weight vector sized to `config.dimensionality()`.
    pub fn new(config: &TrainConfig) -> Self {
        Self {
            config: config.clone(),
            state: TrainerState::Initialized,
            weights: WeightVector::zeros(config.dimensionality()),
        }
    }

    pub fn state(&self) -> TrainerState {
        self.state
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Run the configured number of iterations over `dataset`.
    pub fn train(self, dataset: &Dataset) -> Result<WeightVector> {
        self.train_with_observer(dataset, |_, _, _| {})
    }

    /// Like [`Trainer::train`], calling `observer(t, weights, outcome)` after
    /// every step.
    pub fn train_with_observer<F>(mut self, dataset: &Dataset, mut observer: F) -> Result<WeightVector>
    where
        F: FnMut(usize, &WeightVector, &StepOutcome),
    {
        let mut sampler = self.prepare(dataset)?;

        let family = self.config.learner_family();
        let lambda = self.config.lambda();
        let iterations = self.config.iterations();
        let report_every = (iterations / PROGRESS_REPORTS).max(1);
        let mut projections = 0usize;

        self.state = TrainerState::Running;
        log::debug!(
            "Training {} ({} eta, {} loop) for {} iterations, lambda={}",
            family,
            self.config.eta_schedule(),
            self.config.loop_policy(),
            iterations,
            lambda
        );

        for t in 1..=iterations {
            let position = sampler.next_position(t);
            let x = &dataset.vectors()[position];
            let eta = self.config.eta(t);
            let outcome = apply_step(family, &mut self.weights, x, eta, lambda);
            if outcome.projected {
                projections += 1;
            }
            observer(t, &self.weights, &outcome);

            if t % report_every == 0 {
                log::debug!(
                    "iteration {}/{}: eta={:.6}, |w|={:.6}",
                    t,
                    iterations,
                    eta,
                    self.weights.norm()
                );
            }
        }

        self.state = TrainerState::Completed;
        let mut weights = self.weights;
        weights.fold();
        log::info!(
            "Finished {} iterations of {}: |w|={:.6}, projections={}",
            iterations,
            family,
            weights.norm(),
            projections
        );
        Ok(weights)
    }

    /// Entry checks; everything that can fail happens here.
    fn prepare<'d>(&self, dataset: &'d Dataset) -> Result<Sampler<'d>> {
        if dataset.is_empty() {
            return Err(SgdError::EmptyDataset);
        }
        if dataset.dimensionality() > self.config.dimensionality() {
            return Err(SgdError::InvalidConfig(format!(
                "dataset dimensionality {} exceeds configured dimensionality {}",
                dataset.dimensionality(),
                self.config.dimensionality()
            )));
        }
        if self.config.learner_family().projects()
            && self.config.eta_schedule() == EtaSchedule::Constant
        {
            log::warn!(
                "{} projects onto the 1/sqrt(lambda) ball but is paired with a constant learning rate; \
                 the convergence guarantee assumes the pegasos schedule",
                self.config.learner_family()
            );
        }
        Sampler::new(dataset, self.config.loop_policy(), self.config.seed())
    }
}

/// Train one model on `dataset` with `config`.
pub fn train(dataset: &Dataset, config: &TrainConfig) -> Result<WeightVector> {
    Trainer::new(config).train(dataset)
}

/// Train one independent model per config, in parallel.
///
/// Results are returned in the order of `configs`. The dataset is shared
/// read-only between the runs.
pub fn train_many(dataset: &Dataset, configs: &[TrainConfig]) -> Vec<Result<WeightVector>> {
    configs
        .par_iter()
        .map(|config| train(dataset, config))
        .collect()
}
