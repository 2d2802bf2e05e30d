//! Logistic regression for next-step direction.
//!
//! Every call to [`LogisticPredictor::fit_and_score`] fits a brand-new model on a
//! single ticker's history, so nothing learned for one ticker leaks into another.

use crate::count_as_f64;
use argus_core::signal::entity::{FeatureVector, TrainingPair};
use argus_core::signal::error::SignalError;
use argus_core::signal::port::Predictor;
use ndarray::{Array1, Array2, Axis};
use tracing::debug;

/// Hyper-parameters for the gradient-descent fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticParams {
    /// Step size on standardized features
    pub learning_rate: f64,
    /// Maximum gradient steps
    pub max_iter: usize,
    /// Stop once the loss improves by less than this
    pub tolerance: f64,
    /// Inverse L2 strength, same meaning as scikit-learn's `C`
    pub c: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            max_iter: 500,
            tolerance: 1e-7,
            c: 1.0,
        }
    }
}

/// A fitted binary logistic model with its feature scaling
#[derive(Debug, Clone)]
pub struct LogisticModel {
    mean: Array1<f64>,
    scale: Array1<f64>,
    weights: Array1<f64>,
    bias: f64,
    /// Gradient steps actually taken
    pub iterations: usize,
    /// Whether the tolerance was reached before `max_iter`
    pub converged: bool,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let exp_z = z.exp();
        exp_z / (1.0 + exp_z)
    }
}

/// Binary cross-entropy with clipping
fn log_loss(y: &Array1<f64>, p: &Array1<f64>) -> f64 {
    let eps = 1e-15;
    let total: f64 = y
        .iter()
        .zip(p.iter())
        .map(|(&y, &p)| {
            let p = p.clamp(eps, 1.0 - eps);
            y * p.ln() + (1.0 - y) * (1.0 - p).ln()
        })
        .sum();
    -total / count_as_f64(y.len())
}

impl LogisticModel {
    /// # Summary
    /// Fits a model on `x` (rows = samples) and binary targets `y`.
    ///
    /// # Logic
    /// 1. Validates shapes and finiteness.
    /// 2. Standardizes each column with the training mean/std; constant columns
    ///    are only centered.
    /// 3. Runs batch gradient descent on the L2-regularized log loss.
    ///
    /// # Returns
    /// * The fitted model. Single-class targets and non-convergence still fit.
    pub fn fit(
        x: &Array2<f64>,
        y: &Array1<f64>,
        params: LogisticParams,
    ) -> Result<Self, SignalError> {
        if x.nrows() == 0 {
            return Err(SignalError::EmptyTrainingSet);
        }
        if x.nrows() != y.len() {
            return Err(SignalError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(SignalError::NonFinite("training features"));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(SignalError::NonFinite("training labels"));
        }

        let n = count_as_f64(x.nrows());
        let mean = x
            .mean_axis(Axis(0))
            .ok_or(SignalError::EmptyTrainingSet)?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > f64::EPSILON { s } else { 1.0 });
        let xs = (x - &mean) / &scale;

        let mut weights = Array1::<f64>::zeros(x.ncols());
        let mut bias = 0.0;
        let l2 = 1.0 / (params.c * n);
        let mut previous_cost = f64::INFINITY;
        let mut iterations = 0;
        let mut converged = false;

        for _ in 0..params.max_iter {
            iterations += 1;
            let predictions = (xs.dot(&weights) + bias).mapv(sigmoid);
            let errors = &predictions - y;

            let dw = xs.t().dot(&errors) / n + &weights * l2;
            let db = errors.sum() / n;

            weights = weights - dw * params.learning_rate;
            bias -= params.learning_rate * db;

            let cost = log_loss(y, &predictions) + 0.5 * l2 * weights.dot(&weights);
            if (previous_cost - cost).abs() < params.tolerance {
                converged = true;
                break;
            }
            previous_cost = cost;
        }

        if !converged {
            debug!(iterations, "Logistic fit stopped before reaching tolerance");
        }

        Ok(Self {
            mean,
            scale,
            weights,
            bias,
            iterations,
            converged,
        })
    }

    /// Probability of the positive class for one raw (unscaled) feature row
    pub fn predict_proba(&self, row: &Array1<f64>) -> Result<f64, SignalError> {
        if row.len() != self.weights.len() {
            return Err(SignalError::DimensionMismatch {
                expected: self.weights.len(),
                got: row.len(),
            });
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(SignalError::NonFinite("live features"));
        }
        let scaled = (row - &self.mean) / &self.scale;
        Ok(sigmoid(scaled.dot(&self.weights) + self.bias))
    }
}

/// # Summary
/// Stateless predictor that refits a logistic model on every call.
///
/// # Invariants
/// * Holds hyper-parameters only, never fitted state.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticPredictor {
    params: LogisticParams,
}

impl LogisticPredictor {
    pub fn new(params: LogisticParams) -> Self {
        Self { params }
    }
}

impl Predictor for LogisticPredictor {
    fn fit_and_score(
        &self,
        training: &[TrainingPair],
        live: &FeatureVector,
    ) -> Result<f64, SignalError> {
        if training.is_empty() {
            return Err(SignalError::EmptyTrainingSet);
        }

        let flat: Vec<f64> = training
            .iter()
            .flat_map(|p| p.features.to_array())
            .collect();
        let x = Array2::from_shape_vec((training.len(), FeatureVector::WIDTH), flat).map_err(
            |_| SignalError::DimensionMismatch {
                expected: training.len() * FeatureVector::WIDTH,
                got: training.len(),
            },
        )?;
        let y: Array1<f64> = training.iter().map(|p| p.label.as_f64()).collect();

        let model = LogisticModel::fit(&x, &y, self.params)?;
        let probability = model.predict_proba(&Array1::from(live.to_array().to_vec()))?;
        Ok(probability.clamp(0.0, 1.0))
    }
}
