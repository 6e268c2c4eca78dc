//! Online logistic SGD with lazy per-row regularization.
//!
//! The trainer performs one gradient step against one weight row: it
//! computes a prediction through the logistic link, applies the gradient
//! update in place, then shrinks the same row under an L1 or L2 prior.
//! Regularization touches only the row of the current step (lazy,
//! on-touch), never the whole parameter matrix.
//!
//! Nothing fancy is done in terms of per-term learning-rate decay because
//! all updates here are dense; the [`TermRatePolicy`] seam stays open for
//! callers that need it.

use serde::{Deserialize, Serialize};

use crate::error::{LatenteError, Result};

/// Number of label categories supported by the trainer (binary logistic).
pub const NUM_CATEGORIES: u32 = 2;

/// Logistic link: σ(z) = 1 / (1 + e^(-z))
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Dot product of two equal-length slices.
#[must_use]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Regularization prior applied to the trained row after each gradient step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Prior {
    /// Subtractive shrink toward zero, clamped at zero on sign flip.
    #[default]
    L1,
    /// Multiplicative shrink toward zero.
    L2,
}

impl Prior {
    /// Shrinks one weight toward zero by an already-annealed amount
    /// (`lambda * learning_rate`).
    ///
    /// L1 never flips a weight's sign: if the shrink would overshoot past
    /// zero the weight snaps to exactly zero instead.
    #[must_use]
    pub fn shrink(self, weight: f64, amount: f64) -> f64 {
        match self {
            Prior::L1 => {
                if weight == 0.0 {
                    return 0.0;
                }
                let shrunk = weight - amount * weight.signum();
                if shrunk * weight < 0.0 {
                    0.0
                } else {
                    shrunk
                }
            }
            Prior::L2 => weight * (1.0 - amount).max(0.0),
        }
    }
}

/// Per-row learning-rate annealing schedules.
///
/// The schedule is evaluated against the touch count of the row being
/// trained, not a global step count, so different rows anneal independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LearningRateDecay {
    /// lr = `mu0` / t
    #[default]
    Inverse,
    /// lr = `mu0` / sqrt(t)
    InverseSqrt,
    /// No decay (constant learning rate)
    Constant,
}

/// Overridable per-term learning-rate hook.
pub trait TermRatePolicy {
    /// Multiplier applied on top of the annealed row rate for dimension `j`.
    fn per_term_rate(&self, j: usize) -> f64;
}

/// The default policy: every term trains at the full row rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformTermRate;

impl TermRatePolicy for UniformTermRate {
    fn per_term_rate(&self, _j: usize) -> f64 {
        1.0
    }
}

/// One-row-at-a-time binary logistic SGD trainer.
///
/// Holds the base learning rate, the regularization strength and prior, and
/// the annealing schedule. The trainer itself is stateless across rows: the
/// caller passes each row's own touch count so the schedule anneals per row.
///
/// # Examples
///
/// ```
/// use latente::sgd::LogisticTrainer;
///
/// let trainer = LogisticTrainer::new();
/// let mut weights = vec![0.0, 0.0];
/// let p = trainer.train_step(&mut weights, 1, &[1.0, 1.0], 1).expect("valid step");
/// assert!((p - 0.5).abs() < 1e-12);
/// assert!(weights.iter().all(|&w| w > 0.0));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticTrainer<P: TermRatePolicy = UniformTermRate> {
    mu0: f64,
    lambda: f64,
    prior: Prior,
    decay: LearningRateDecay,
    term_rate: P,
}

impl LogisticTrainer {
    /// Creates a trainer with `mu0 = 1`, no regularization, an L1 prior, and
    /// inverse per-row annealing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_term_rate(UniformTermRate)
    }
}

impl Default for LogisticTrainer {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: TermRatePolicy> LogisticTrainer<P> {
    /// Creates a trainer with default hyperparameters and a custom per-term
    /// rate policy.
    pub fn with_term_rate(policy: P) -> Self {
        Self {
            mu0: 1.0,
            lambda: 0.0,
            prior: Prior::L1,
            decay: LearningRateDecay::default(),
            term_rate: policy,
        }
    }

    /// Sets the base learning rate.
    ///
    /// # Errors
    ///
    /// Returns an error if `mu0` is not finite or not positive.
    pub fn set_learning_rate(&mut self, mu0: f64) -> Result<()> {
        if !mu0.is_finite() || mu0 <= 0.0 {
            return Err(LatenteError::invalid_hyperparameter(
                "learning_rate",
                mu0,
                "> 0 and finite",
            ));
        }
        self.mu0 = mu0;
        Ok(())
    }

    /// Sets the regularization strength.
    ///
    /// # Errors
    ///
    /// Returns an error if `lambda` is negative or not finite.
    pub fn set_lambda(&mut self, lambda: f64) -> Result<()> {
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(LatenteError::invalid_hyperparameter(
                "lambda",
                lambda,
                ">= 0 and finite",
            ));
        }
        self.lambda = lambda;
        Ok(())
    }

    /// Sets the regularization prior.
    pub fn set_prior(&mut self, prior: Prior) {
        self.prior = prior;
    }

    /// Sets the annealing schedule.
    pub fn set_decay(&mut self, decay: LearningRateDecay) {
        self.decay = decay;
    }

    /// Returns the base learning rate.
    #[must_use]
    pub fn learning_rate(&self) -> f64 {
        self.mu0
    }

    /// Returns the regularization strength.
    #[must_use]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Returns the regularization prior.
    #[must_use]
    pub fn prior(&self) -> Prior {
        self.prior
    }

    /// Returns the annealing schedule.
    #[must_use]
    pub fn decay(&self) -> LearningRateDecay {
        self.decay
    }

    /// Annealed learning rate for a row that has been touched `touches`
    /// times. Strictly decreasing in `touches` for the non-constant
    /// schedules.
    #[must_use]
    pub fn learning_rate_for(&self, touches: u64) -> f64 {
        let t = touches.max(1) as f64;
        match self.decay {
            LearningRateDecay::Inverse => self.mu0 / t,
            LearningRateDecay::InverseSqrt => self.mu0 / t.sqrt(),
            LearningRateDecay::Constant => self.mu0,
        }
    }

    /// One gradient + regularize step against one weight row, in place.
    ///
    /// Validates the label and the feature width before touching the row, so
    /// a failed call leaves the weights exactly as they were. Returns the
    /// prediction computed before the update.
    ///
    /// # Errors
    ///
    /// Returns an error if `actual` is not a binary label or the feature
    /// width doesn't match the weight width.
    pub fn train_step(
        &self,
        weights: &mut [f64],
        actual: u32,
        features: &[f64],
        touches: u64,
    ) -> Result<f64> {
        if actual >= NUM_CATEGORIES {
            return Err(LatenteError::invalid_label(actual, NUM_CATEGORIES));
        }
        if weights.len() != features.len() {
            return Err(LatenteError::dimension_mismatch(
                "features",
                weights.len(),
                features.len(),
            ));
        }

        let prediction = sigmoid(dot(weights, features));
        let lr = self.learning_rate_for(touches);
        let residual = f64::from(actual) - prediction;
        for (j, (w, x)) in weights.iter_mut().zip(features).enumerate() {
            *w += lr * self.term_rate.per_term_rate(j) * residual * x;
        }
        self.regularize(weights, lr);
        Ok(prediction)
    }

    /// Shrinks the just-updated row under the configured prior. Applied to
    /// this row only, immediately after the gradient step.
    fn regularize(&self, weights: &mut [f64], lr: f64) {
        if self.lambda == 0.0 {
            return;
        }
        let amount = self.lambda * lr;
        for w in weights.iter_mut() {
            *w = self.prior.shrink(*w, amount);
        }
    }
}

#[cfg(test)]
#[path = "sgd_tests.rs"]
mod tests;
