use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SgdError};

/// Learning-rate schedule applied at iteration `t` (1-indexed).
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EtaSchedule {
    /// Fixed rate (`TrainConfig::constant_eta`) at every step.
    Constant,
    /// `1 / (lambda * t)`.
    Basic,
    /// `1 / (lambda * t)`, conventionally paired with the projection step.
    #[default]
    Pegasos,
}

/// Loss function and update rule used by the trainer.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LearnerFamily {
    /// Hinge loss with norm projection after every step.
    #[default]
    SvmPegasos,
    /// Hinge loss, no projection.
    SvmSgd,
    /// Logistic loss, no projection.
    Logreg,
    /// Logistic loss with norm projection after every step.
    LogregPegasos,
    /// Squared error regression.
    LmsRegression,
}

impl LearnerFamily {
    /// Families whose update ends with the Pegasos ball projection.
    pub fn projects(&self) -> bool {
        matches!(self, LearnerFamily::SvmPegasos | LearnerFamily::LogregPegasos)
    }

    pub fn is_regression(&self) -> bool {
        matches!(self, LearnerFamily::LmsRegression)
    }
}

/// How the trainer picks the example for each iteration.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoopPolicy {
    /// Uniform draws with replacement from the whole dataset.
    Stochastic,
    /// Alternate positive / negative class every step, uniform within a class.
    #[default]
    BalancedStochastic,
}

/// Output transform applied when producing dataset-level predictions.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PredictionType {
    /// Raw margin `w·x`.
    #[default]
    Linear,
    /// `1 / (1 + exp(-w·x))`.
    Logistic,
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', ' '], "_")
}

impl FromStr for EtaSchedule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "constant" => Ok(EtaSchedule::Constant),
            "basic" | "basic_eta" => Ok(EtaSchedule::Basic),
            "pegasos" | "pegasos_eta" => Ok(EtaSchedule::Pegasos),
            _ => Err(format!(
                "Unknown eta schedule: {}. Valid options are: constant, basic, pegasos",
                s
            )),
        }
    }
}

impl FromStr for LearnerFamily {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "pegasos" | "svm_pegasos" => Ok(LearnerFamily::SvmPegasos),
            "sgd_svm" | "svm_sgd" => Ok(LearnerFamily::SvmSgd),
            "logreg" => Ok(LearnerFamily::Logreg),
            "logreg_pegasos" => Ok(LearnerFamily::LogregPegasos),
            "lms" | "lms_regression" => Ok(LearnerFamily::LmsRegression),
            _ => Err(format!(
                "Unknown learner family: {}. Valid options are: pegasos, sgd-svm, logreg, logreg-pegasos, lms",
                s
            )),
        }
    }
}

impl FromStr for LoopPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "stochastic" => Ok(LoopPolicy::Stochastic),
            "balanced_stochastic" => Ok(LoopPolicy::BalancedStochastic),
            _ => Err(format!(
                "Unknown loop policy: {}. Valid options are: stochastic, balanced-stochastic",
                s
            )),
        }
    }
}

impl FromStr for PredictionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "linear" => Ok(PredictionType::Linear),
            "logistic" => Ok(PredictionType::Logistic),
            _ => Err(format!(
                "Unknown prediction type: {}. Valid options are: linear, logistic",
                s
            )),
        }
    }
}

impl fmt::Display for EtaSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EtaSchedule::Constant => "constant",
            EtaSchedule::Basic => "basic",
            EtaSchedule::Pegasos => "pegasos",
        };
        f.write_str(name)
    }
}

impl fmt::Display for LearnerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LearnerFamily::SvmPegasos => "pegasos",
            LearnerFamily::SvmSgd => "sgd-svm",
            LearnerFamily::Logreg => "logreg",
            LearnerFamily::LogregPegasos => "logreg-pegasos",
            LearnerFamily::LmsRegression => "lms",
        };
        f.write_str(name)
    }
}

impl fmt::Display for LoopPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoopPolicy::Stochastic => "stochastic",
            LoopPolicy::BalancedStochastic => "balanced-stochastic",
        };
        f.write_str(name)
    }
}

impl fmt::Display for PredictionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PredictionType::Linear => "linear",
            PredictionType::Logistic => "logistic",
        };
        f.write_str(name)
    }
}

pub const DEFAULT_ITERATIONS: usize = 100_000;
pub const DEFAULT_DIMENSIONALITY: usize = 2 << 16;
pub const DEFAULT_LAMBDA: f64 = 0.1;
pub const DEFAULT_CONSTANT_ETA: f64 = 0.02;
pub const DEFAULT_SEED: u64 = 42;

/// Validated, immutable training configuration.
///
/// Construct through [`TrainConfig::builder`] or [`TrainConfig::new`]; both
/// validate every numeric field. Deserialization also goes through the
/// builder, so a `TrainConfig` value is always valid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "TrainConfigBuilder")]
pub struct TrainConfig {
    iterations: usize,
    dimensionality: usize,
    lambda: f64,
    eta_schedule: EtaSchedule,
    learner_family: LearnerFamily,
    loop_policy: LoopPolicy,
    constant_eta: f64,
    prediction_type: PredictionType,
    seed: u64,
}

impl TrainConfig {
    pub fn new(
        iterations: usize,
        dimensionality: usize,
        lambda: f64,
        eta_schedule: EtaSchedule,
        learner_family: LearnerFamily,
        loop_policy: LoopPolicy,
    ) -> Result<Self> {
        TrainConfigBuilder::default()
            .iterations(iterations)
            .dimensionality(dimensionality)
            .lambda(lambda)
            .eta_schedule(eta_schedule)
            .learner_family(learner_family)
            .loop_policy(loop_policy)
            .build()
    }

    pub fn builder() -> TrainConfigBuilder {
        TrainConfigBuilder::default()
    }

    /// Start a builder pre-filled with this configuration, e.g. to vary one
    /// hyper-parameter across a sweep.
    pub fn to_builder(&self) -> TrainConfigBuilder {
        TrainConfigBuilder {
            iterations: self.iterations,
            dimensionality: self.dimensionality,
            lambda: self.lambda,
            eta_schedule: self.eta_schedule,
            learner_family: self.learner_family,
            loop_policy: self.loop_policy,
            constant_eta: self.constant_eta,
            prediction_type: self.prediction_type,
            seed: self.seed,
        }
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn eta_schedule(&self) -> EtaSchedule {
        self.eta_schedule
    }

    pub fn learner_family(&self) -> LearnerFamily {
        self.learner_family
    }

    pub fn loop_policy(&self) -> LoopPolicy {
        self.loop_policy
    }

    pub fn constant_eta(&self) -> f64 {
        self.constant_eta
    }

    pub fn prediction_type(&self) -> PredictionType {
        self.prediction_type
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Learning rate for iteration `t` (1-indexed).
    pub fn eta(&self, t: usize) -> f64 {
        match self.eta_schedule {
            EtaSchedule::Constant => self.constant_eta,
            EtaSchedule::Basic | EtaSchedule::Pegasos => 1.0 / (self.lambda * t as f64),
        }
    }

    /// Radius of the Pegasos feasible ball, `1 / sqrt(lambda)`.
    pub fn projection_radius(&self) -> f64 {
        1.0 / self.lambda.sqrt()
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            dimensionality: DEFAULT_DIMENSIONALITY,
            lambda: DEFAULT_LAMBDA,
            eta_schedule: EtaSchedule::default(),
            learner_family: LearnerFamily::default(),
            loop_policy: LoopPolicy::default(),
            constant_eta: DEFAULT_CONSTANT_ETA,
            prediction_type: PredictionType::default(),
            seed: DEFAULT_SEED,
        }
    }
}

/// Chainable builder for [`TrainConfig`]. Unset fields take the defaults.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct TrainConfigBuilder {
    pub iterations: usize,
    pub dimensionality: usize,
    pub lambda: f64,
    pub eta_schedule: EtaSchedule,
    pub learner_family: LearnerFamily,
    pub loop_policy: LoopPolicy,
    pub constant_eta: f64,
    pub prediction_type: PredictionType,
    pub seed: u64,
}

impl Default for TrainConfigBuilder {
    fn default() -> Self {
        TrainConfig::default().to_builder()
    }
}

impl TrainConfigBuilder {
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn dimensionality(mut self, dimensionality: usize) -> Self {
        self.dimensionality = dimensionality;
        self
    }

    pub fn lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn eta_schedule(mut self, eta_schedule: EtaSchedule) -> Self {
        self.eta_schedule = eta_schedule;
        self
    }

    pub fn learner_family(mut self, learner_family: LearnerFamily) -> Self {
        self.learner_family = learner_family;
        self
    }

    pub fn loop_policy(mut self, loop_policy: LoopPolicy) -> Self {
        self.loop_policy = loop_policy;
        self
    }

    pub fn constant_eta(mut self, constant_eta: f64) -> Self {
        self.constant_eta = constant_eta;
        self
    }

    pub fn prediction_type(mut self, prediction_type: PredictionType) -> Self {
        self.prediction_type = prediction_type;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<TrainConfig> {
        if self.iterations == 0 {
            return Err(SgdError::InvalidConfig(
                "iterations must be at least 1".to_string(),
            ));
        }
        if self.dimensionality == 0 {
            return Err(SgdError::InvalidConfig(
                "dimensionality must be at least 1".to_string(),
            ));
        }
        if !(self.lambda.is_finite() && self.lambda > 0.0) {
            return Err(SgdError::InvalidConfig(format!(
                "lambda must be a positive finite number, got {}",
                self.lambda
            )));
        }
        // 1/lambda drives the step size and the projection radius
        if !(1.0 / self.lambda).is_finite() {
            return Err(SgdError::InvalidConfig(format!(
                "lambda {:e} is too small: 1/lambda overflows",
                self.lambda
            )));
        }
        if !(self.constant_eta.is_finite() && self.constant_eta > 0.0) {
            return Err(SgdError::InvalidConfig(format!(
                "constant_eta must be a positive finite number, got {}",
                self.constant_eta
            )));
        }

        Ok(TrainConfig {
            iterations: self.iterations,
            dimensionality: self.dimensionality,
            lambda: self.lambda,
            eta_schedule: self.eta_schedule,
            learner_family: self.learner_family,
            loop_policy: self.loop_policy,
            constant_eta: self.constant_eta,
            prediction_type: self.prediction_type,
            seed: self.seed,
        })
    }
}

impl TryFrom<TrainConfigBuilder> for TrainConfig {
    type Error = SgdError;

    fn try_from(builder: TrainConfigBuilder) -> Result<Self> {
        builder.build()
    }
}
