//! Per-family update rules.
//!
//! One step, given the margin `p = w·x` measured before the step:
//!
//! 1. L2 shrinkage `w <- (1 - eta * lambda) * w`, applied lazily.
//! 2. The loss subgradient term for the sampled example:
//!    - hinge (`SvmPegasos`, `SvmSgd`): `w += eta * y * x` when `y * p < 1`
//!    - logistic (`Logreg`, `LogregPegasos`): `w += eta * y * x * sigmoid(-y * p)`
//!    - squared error (`LmsRegression`): `w += eta' * (y - p) * x`, with
//!      `eta' = min(eta, 1 / ‖x‖²)` so one step never overshoots the example
//! 3. For `SvmPegasos` and `LogregPegasos`, projection onto the ball of
//!    radius `1 / sqrt(lambda)`.
//!
//! Everything after the shrinkage only touches the non-zeros of `x`.
use crate::config::LearnerFamily;
use crate::sparse::SparseVector;
use crate::weights::WeightVector;

/// Smallest shrink factor applied in one step.
///
/// With the Pegasos rate `eta * lambda == 1` at `t = 1`, and a large constant
/// rate can push `1 - eta * lambda` negative; both are clamped here.
pub const MIN_SHRINK_FACTOR: f64 = 1e-7;

/// Bound on the argument of `exp` in the logistic functions.
pub const MAX_EXPONENT: f64 = 35.0;

/// Upper bound on `eta * ‖x‖²` for the squared-error step.
///
/// At 1 the step moves the margin on `x` exactly onto the label; above 2 the
/// update diverges geometrically.
pub const MAX_LMS_STEP: f64 = 1.0;

/// Logistic function with its argument clamped to `[-35, 35]`.
pub fn sigmoid(z: f64) -> f64 {
    let z = if z.is_nan() { 0.0 } else { z.clamp(-MAX_EXPONENT, MAX_EXPONENT) };
    1.0 / (1.0 + (-z).exp())
}

/// Shrink factor `1 - eta * lambda`, clamped to `[MIN_SHRINK_FACTOR, 1]`.
pub fn shrink_factor(eta: f64, lambda: f64) -> f64 {
    (1.0 - eta * lambda).clamp(MIN_SHRINK_FACTOR, 1.0)
}

/// Learning rate for the squared-error step on an example with squared
/// norm `squared_norm`, capped at `MAX_LMS_STEP / ‖x‖²`.
pub fn bounded_lms_eta(eta: f64, squared_norm: f64) -> f64 {
    if squared_norm > 0.0 {
        eta.min(MAX_LMS_STEP / squared_norm)
    } else {
        eta
    }
}

/// Scalar multiplier of `x` in the additive update for one example.
///
/// `margin` is `w·x` before the step, `label` is `y`.
pub fn update_coefficient(family: LearnerFamily, margin: f64, label: f64, eta: f64) -> f64 {
    match family {
        LearnerFamily::SvmPegasos | LearnerFamily::SvmSgd => {
            if label * margin < 1.0 {
                eta * label
            } else {
                0.0
            }
        }
        LearnerFamily::Logreg | LearnerFamily::LogregPegasos => {
            eta * label * sigmoid(-label * margin)
        }
        LearnerFamily::LmsRegression => {
            let residual = label - margin;
            if residual.is_finite() {
                eta * residual
            } else {
                0.0
            }
        }
    }
}

/// What a single step did; used for tracing and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub margin: f64,
    pub coefficient: f64,
    pub projected: bool,
}

/// Apply one update of `family` to `weights` for example `x`.
pub fn apply_step(
    family: LearnerFamily,
    weights: &mut WeightVector,
    x: &SparseVector,
    eta: f64,
    lambda: f64,
) -> StepOutcome {
    let margin = weights.dot(x);
    weights.scale_by(shrink_factor(eta, lambda));

    let step_eta = if family.is_regression() {
        bounded_lms_eta(eta, x.squared_norm())
    } else {
        eta
    };
    let coefficient = update_coefficient(family, margin, x.label(), step_eta);
    weights.add_sparse(x, coefficient);

    let projected = if family.projects() {
        weights.project_onto_ball(1.0 / lambda.sqrt())
    } else {
        false
    };

    StepOutcome {
        margin,
        coefficient,
        projected,
    }
}
