//! Latente: online latent-factor learning for dyadic prediction.
//!
//! Latente maintains two independently growable collections of per-entity
//! weight rows ("factors") and updates them with online logistic SGD so that
//! the logistic link of their dot product approximates an observed binary
//! label. Entity IDs arrive from an unbounded stream; storage grows lazily as
//! new IDs appear.
//!
//! # Quick Start
//!
//! ```
//! use latente::prelude::*;
//!
//! let mut model = DyadicLogLinear::with_seed(2, 42).expect("positive factor count");
//! model
//!     .learning_rate(0.1)
//!     .expect("valid rate")
//!     .bias_policy(BiasPolicy::Keep);
//!
//! let before = model.classify_scalar(0, 0);
//! for _ in 0..20 {
//!     model.train(0, 0, 1).expect("binary label");
//! }
//! let after = model.classify_scalar(0, 0);
//!
//! // Repeated positive examples move the prediction toward 1.
//! assert!(after > before);
//! assert!((0.0..=1.0).contains(&after));
//! ```
//!
//! # Modules
//!
//! - [`store`]: `BlockMatrix`, a row-extensible block-dense weight store
//! - [`sgd`]: the online logistic trainer, priors, and annealing schedules
//! - [`factor`]: per-entity factor model over one store and one trainer
//! - [`dyadic`]: the two-sided coordinator and its bias-transfer policy
//! - [`error`]: crate error type and `Result` alias

pub mod dyadic;
pub mod error;
pub mod factor;
pub mod prelude;
pub mod sgd;
pub mod store;

pub use dyadic::{BiasPolicy, DyadicLogLinear};
pub use error::{LatenteError, Result};
