//! Per-entity factor model over one growable store and one trainer.
//!
//! [`FactorModel`] presents a per-entity-ID view over a [`BlockMatrix`]:
//! each ID owns one weight row of width `num_factors + 1`, where column 0 is
//! that entity's bias term. Rows materialize on first access and are filled
//! with Gaussian noise exactly once; thereafter only the trainer's gradient
//! and regularization steps mutate them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{LatenteError, Result};
use crate::sgd::{LearningRateDecay, LogisticTrainer, Prior, NUM_CATEGORIES};
use crate::store::BlockMatrix;

/// Initialization state of one entity's weight row.
///
/// Replaces the out-of-band negative-counter sentinel of ad-hoc designs:
/// a row is either untouched or initialized with an explicit update count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowState {
    /// The row has never been touched; its weights await random
    /// initialization.
    Uninitialized,
    /// The row was Gaussian-initialized and has been trained `updates`
    /// times since.
    Initialized {
        /// Number of training steps this row has participated in.
        updates: u64,
    },
}

/// One side of a dyadic predictor: an ID-addressed collection of factor
/// rows plus the trainer that updates them.
///
/// # Examples
///
/// ```
/// use latente::factor::FactorModel;
///
/// let mut model = FactorModel::with_seed(2, 7).expect("positive factor count");
/// let features = model.weights(1).to_vec();
/// let p = model.train(0, 1, &features).expect("valid step");
/// assert!((0.0..=1.0).contains(&p));
/// assert_eq!(model.update_count(0), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FactorModel {
    weights: BlockMatrix,
    states: Vec<RowState>,
    trainer: LogisticTrainer,
    rng: StdRng,
    num_factors: usize,
}

impl FactorModel {
    /// Creates a model with entropy-seeded row initialization.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_factors` is zero.
    pub fn new(num_factors: usize) -> Result<Self> {
        Self::with_rng(num_factors, StdRng::from_entropy())
    }

    /// Creates a model with deterministic row initialization.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_factors` is zero.
    pub fn with_seed(num_factors: usize, seed: u64) -> Result<Self> {
        Self::with_rng(num_factors, StdRng::seed_from_u64(seed))
    }

    fn with_rng(num_factors: usize, rng: StdRng) -> Result<Self> {
        if num_factors == 0 {
            return Err(LatenteError::invalid_hyperparameter(
                "num_factors",
                0.0,
                ">= 1",
            ));
        }
        Ok(Self {
            weights: BlockMatrix::new(num_factors + 1)?,
            states: Vec::new(),
            trainer: LogisticTrainer::new(),
            rng,
            num_factors,
        })
    }

    /// Number of latent factors per entity.
    #[must_use]
    pub fn num_factors(&self) -> usize {
        self.num_factors
    }

    /// Physical row width: the factors plus the bias column.
    #[must_use]
    pub fn width(&self) -> usize {
        self.num_factors + 1
    }

    /// Number of entity IDs seen so far.
    #[must_use]
    pub fn n_entities(&self) -> usize {
        self.states.len()
    }

    /// Ensures row `id` exists and is initialized. Idempotent: the Gaussian
    /// randomization happens exactly once per ID, on the transition out of
    /// [`RowState::Uninitialized`].
    pub fn extend(&mut self, id: usize) {
        if id >= self.states.len() {
            self.states.resize(id + 1, RowState::Uninitialized);
        }
        if self.states[id] == RowState::Uninitialized {
            let row = self.weights.row_mut(id);
            for w in row.iter_mut() {
                *w = gaussian(&mut self.rng);
            }
            self.states[id] = RowState::Initialized { updates: 0 };
        }
    }

    /// Returns the live (aliased) weight row for `id`, auto-extending.
    pub fn weights(&mut self, id: usize) -> &[f64] {
        self.extend(id);
        self.weights.row_mut(id)
    }

    /// True when `id` has been materialized and Gaussian-initialized.
    #[must_use]
    pub fn is_initialized(&self, id: usize) -> bool {
        matches!(self.states.get(id), Some(RowState::Initialized { .. }))
    }

    /// Number of training steps this entity has participated in.
    #[must_use]
    pub fn update_count(&self, id: usize) -> u64 {
        match self.states.get(id) {
            Some(RowState::Initialized { updates }) => *updates,
            _ => 0,
        }
    }

    /// The annealed learning rate this entity's row currently trains at.
    /// Anneals with the row's own update count, independently of every
    /// other row.
    #[must_use]
    pub fn current_learning_rate(&self, id: usize) -> f64 {
        self.trainer.learning_rate_for(self.update_count(id))
    }

    /// One online update of row `id` toward `actual` given `features`.
    ///
    /// Validates the label and feature width before mutating anything, then
    /// extends `id`, bumps its update counter, and runs the trainer's
    /// gradient + regularize step against the aliased row. Returns the
    /// prediction computed before the update.
    ///
    /// # Errors
    ///
    /// Returns an error if `actual` is not a binary label or `features` does
    /// not have width `num_factors + 1`.
    pub fn train(&mut self, id: usize, actual: u32, features: &[f64]) -> Result<f64> {
        if actual >= NUM_CATEGORIES {
            return Err(LatenteError::invalid_label(actual, NUM_CATEGORIES));
        }
        if features.len() != self.width() {
            return Err(LatenteError::dimension_mismatch(
                "features",
                self.width(),
                features.len(),
            ));
        }

        self.extend(id);
        let touches = self.update_count(id) + 1;
        self.states[id] = RowState::Initialized { updates: touches };
        let row = self.weights.row_mut(id);
        self.trainer.train_step(row, actual, features, touches)
    }

    /// Returns the bias term (column 0) for `id`, auto-extending.
    pub fn bias(&mut self, id: usize) -> f64 {
        self.extend(id);
        self.weights.row_mut(id)[0]
    }

    /// Overwrites the bias term for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is NaN or infinite; the row is left
    /// untouched.
    pub fn set_bias(&mut self, id: usize, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(LatenteError::degenerate_bias(id, value));
        }
        self.extend(id);
        self.weights.row_mut(id)[0] = value;
        Ok(())
    }

    /// Adds `delta` to the bias term for `id`, returning the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the result would be NaN or infinite; the row is
    /// left untouched rather than silently corrupted.
    pub fn adjust_bias(&mut self, id: usize, delta: f64) -> Result<f64> {
        let updated = self.bias(id) + delta;
        if !updated.is_finite() {
            return Err(LatenteError::degenerate_bias(id, updated));
        }
        self.weights.row_mut(id)[0] = updated;
        Ok(updated)
    }

    /// Multiplies the bias term for `id` by `factor`, returning the new
    /// value.
    ///
    /// # Errors
    ///
    /// Returns an error if the result would be NaN or infinite; the row is
    /// left untouched.
    pub fn scale_bias(&mut self, id: usize, factor: f64) -> Result<f64> {
        let updated = self.bias(id) * factor;
        if !updated.is_finite() {
            return Err(LatenteError::degenerate_bias(id, updated));
        }
        self.weights.row_mut(id)[0] = updated;
        Ok(updated)
    }

    /// Sets the base learning rate. Takes effect from the next touched row;
    /// per-row counters are never reset.
    ///
    /// # Errors
    ///
    /// Returns an error if `mu0` is not finite or not positive.
    pub fn set_learning_rate(&mut self, mu0: f64) -> Result<()> {
        self.trainer.set_learning_rate(mu0)
    }

    /// Sets the regularization strength.
    ///
    /// # Errors
    ///
    /// Returns an error if `lambda` is negative or not finite.
    pub fn set_lambda(&mut self, lambda: f64) -> Result<()> {
        self.trainer.set_lambda(lambda)
    }

    /// Sets the annealing schedule.
    pub fn set_decay(&mut self, decay: LearningRateDecay) {
        self.trainer.set_decay(decay);
    }

    /// Sets the regularization prior.
    pub fn set_prior(&mut self, prior: Prior) {
        self.trainer.set_prior(prior);
    }

    /// Read access to the trainer configuration.
    #[must_use]
    pub fn trainer(&self) -> &LogisticTrainer {
        &self.trainer
    }

    pub(crate) fn row_state(&self, id: usize) -> RowState {
        self.states
            .get(id)
            .copied()
            .unwrap_or(RowState::Uninitialized)
    }

    pub(crate) fn restore_row(&mut self, id: usize, row: &[f64], state: RowState) {
        self.weights.row_mut(id).copy_from_slice(row);
        self.states[id] = state;
    }
}

/// Standard normal sample via Box-Muller.
fn gaussian<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-12);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

#[cfg(test)]
#[path = "factor_tests.rs"]
mod tests;
