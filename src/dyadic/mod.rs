//! Two-sided coordinator for dyadic latent-factor prediction.
//!
//! [`DyadicLogLinear`] keeps the latent factors for left entities in one
//! [`FactorModel`] and the factors for right entities in another. Training
//! treats each side's weight row as the feature vector for the other side:
//! the right row is the input for the left update, then the *post-update*
//! left row is the input for the right update. After both updates a bias
//! policy chases the intercept term onto the left side so the two sides
//! don't fight over a redundant degree of freedom.
//!
//! See Menon and Elkan, "Dyadic Prediction Using a Latent Feature
//! Log-Linear Model" (<https://arxiv.org/abs/1006.2156>).

use serde::{Deserialize, Serialize};

use crate::error::{LatenteError, Result};
use crate::factor::{FactorModel, RowState};
use crate::sgd::{dot, sigmoid, LearningRateDecay, Prior, NUM_CATEGORIES};

/// How a training call moves intercept mass between the two sides.
///
/// The transfer formula is a policy seam: both historical variants are
/// available alongside a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BiasPolicy {
    /// After both updates, add the right entity's bias into the left
    /// entity's bias and zero the right bias.
    #[default]
    ChaseAdditive,
    /// Before the updates, multiply the left entity's bias by the right
    /// entity's bias and reset the right bias to one.
    ChaseMultiplicative,
    /// Leave both biases to the gradient alone.
    Keep,
}

/// Online latent-factor log-linear model for dyadic prediction.
///
/// # Examples
///
/// ```
/// use latente::dyadic::DyadicLogLinear;
///
/// let mut model = DyadicLogLinear::with_seed(2, 1).expect("positive factor count");
/// model
///     .learning_rate(0.1)
///     .expect("valid rate")
///     .lambda(1e-8)
///     .expect("valid lambda");
///
/// model.train(3, 7, 1).expect("binary label");
/// let p = model.classify_scalar(3, 7);
/// assert!((0.0..=1.0).contains(&p));
/// ```
#[derive(Debug, Clone)]
pub struct DyadicLogLinear {
    left: FactorModel,
    right: FactorModel,
    bias_policy: BiasPolicy,
}

impl DyadicLogLinear {
    /// Creates a model with `num_factors` latent factors per entity on each
    /// side and entropy-seeded initialization.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_factors` is zero.
    pub fn new(num_factors: usize) -> Result<Self> {
        Ok(Self {
            left: FactorModel::new(num_factors)?,
            right: FactorModel::new(num_factors)?,
            bias_policy: BiasPolicy::default(),
        })
    }

    /// Creates a model with deterministic initialization; the two sides
    /// draw from distinct streams derived from `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_factors` is zero.
    pub fn with_seed(num_factors: usize, seed: u64) -> Result<Self> {
        Ok(Self {
            left: FactorModel::with_seed(num_factors, seed)?,
            right: FactorModel::with_seed(num_factors, seed ^ 0x9E37_79B9_7F4A_7C15)?,
            bias_policy: BiasPolicy::default(),
        })
    }

    /// Number of latent factors per entity.
    #[must_use]
    pub fn num_factors(&self) -> usize {
        self.left.num_factors()
    }

    /// Read access to the left-side model.
    #[must_use]
    pub fn left(&self) -> &FactorModel {
        &self.left
    }

    /// Read access to the right-side model.
    #[must_use]
    pub fn right(&self) -> &FactorModel {
        &self.right
    }

    /// Sets the base learning rate on both sides so the two anneal under
    /// matching schedules. Legal between training calls; takes effect from
    /// the next touched row (per-row counters never reset).
    ///
    /// # Errors
    ///
    /// Returns an error if `mu0` is not finite or not positive.
    pub fn learning_rate(&mut self, mu0: f64) -> Result<&mut Self> {
        self.left.set_learning_rate(mu0)?;
        self.right.set_learning_rate(mu0)?;
        Ok(self)
    }

    /// Sets the regularization strength on both sides.
    ///
    /// # Errors
    ///
    /// Returns an error if `lambda` is negative or not finite.
    pub fn lambda(&mut self, lambda: f64) -> Result<&mut Self> {
        self.left.set_lambda(lambda)?;
        self.right.set_lambda(lambda)?;
        Ok(self)
    }

    /// Sets the annealing schedule on both sides.
    pub fn decay(&mut self, decay: LearningRateDecay) -> &mut Self {
        self.left.set_decay(decay);
        self.right.set_decay(decay);
        self
    }

    /// Sets the regularization prior on both sides.
    pub fn prior(&mut self, prior: Prior) -> &mut Self {
        self.left.set_prior(prior);
        self.right.set_prior(prior);
        self
    }

    /// Sets the bias-transfer policy.
    pub fn bias_policy(&mut self, policy: BiasPolicy) -> &mut Self {
        self.bias_policy = policy;
        self
    }

    /// One online update for the pair `(left_id, right_id)` toward `actual`.
    ///
    /// Trains the left row using the current right row as features, then the
    /// right row using the post-update left row (a deliberate, observable
    /// asymmetry), then applies the bias policy. The call is atomic: the two
    /// touched rows and their counters are snapshotted up front, and any
    /// failure after validation restores them so nothing changes.
    ///
    /// # Errors
    ///
    /// Returns an error if `actual` is not 0 or 1, or if a bias transfer
    /// would produce a non-finite bias.
    pub fn train(&mut self, left_id: usize, right_id: usize, actual: u32) -> Result<()> {
        if actual >= NUM_CATEGORIES {
            return Err(LatenteError::invalid_label(actual, NUM_CATEGORIES));
        }

        self.left.extend(left_id);
        self.right.extend(right_id);
        let undo = Snapshot::take(self, left_id, right_id);
        let outcome = self.train_unchecked(left_id, right_id, actual);
        if outcome.is_err() {
            undo.restore(self);
        }
        outcome
    }

    fn train_unchecked(&mut self, left_id: usize, right_id: usize, actual: u32) -> Result<()> {
        if self.bias_policy == BiasPolicy::ChaseMultiplicative {
            let right_bias = self.right.bias(right_id);
            self.left.scale_bias(left_id, right_bias)?;
            self.right.set_bias(right_id, 1.0)?;
        }

        {
            let features = self.right.weights(right_id);
            self.left.train(left_id, actual, features)?;
        }
        {
            let features = self.left.weights(left_id);
            self.right.train(right_id, actual, features)?;
        }

        if self.bias_policy == BiasPolicy::ChaseAdditive {
            let right_bias = self.right.bias(right_id);
            self.left.adjust_bias(left_id, right_bias)?;
            self.right.set_bias(right_id, 0.0)?;
        }
        Ok(())
    }

    /// Predicted probability that `actual == 1` for the pair, in `[0, 1]`.
    ///
    /// Auto-extends both IDs (growing state without otherwise mutating
    /// trained weights); extension always succeeds, so there is no
    /// out-of-range sentinel.
    pub fn classify_scalar(&mut self, left_id: usize, right_id: usize) -> f64 {
        self.left.extend(left_id);
        self.right.extend(right_id);
        sigmoid(dot(self.left.weights(left_id), self.right.weights(right_id)))
    }
}

/// Pre-call copy of the two touched rows, for atomic-or-nothing training.
struct Snapshot {
    left_id: usize,
    right_id: usize,
    left_row: Vec<f64>,
    right_row: Vec<f64>,
    left_state: RowState,
    right_state: RowState,
}

impl Snapshot {
    fn take(model: &mut DyadicLogLinear, left_id: usize, right_id: usize) -> Self {
        Self {
            left_id,
            right_id,
            left_row: model.left.weights(left_id).to_vec(),
            right_row: model.right.weights(right_id).to_vec(),
            left_state: model.left.row_state(left_id),
            right_state: model.right.row_state(right_id),
        }
    }

    fn restore(&self, model: &mut DyadicLogLinear) {
        model
            .left
            .restore_row(self.left_id, &self.left_row, self.left_state);
        model
            .right
            .restore_row(self.right_id, &self.right_row, self.right_state);
    }
}

#[cfg(test)]
#[path = "dyadic_tests.rs"]
mod tests;
