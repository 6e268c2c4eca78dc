//! Convenience re-exports for common usage.
//!
//! ```
//! use latente::prelude::*;
//!
//! let mut model = DyadicLogLinear::new(4).expect("positive factor count");
//! let p = model.classify_scalar(0, 0);
//! assert!((0.0..=1.0).contains(&p));
//! ```

pub use crate::dyadic::{BiasPolicy, DyadicLogLinear};
pub use crate::error::{LatenteError, Result};
pub use crate::factor::{FactorModel, RowState};
pub use crate::sgd::{
    sigmoid, LearningRateDecay, LogisticTrainer, Prior, TermRatePolicy, UniformTermRate,
};
pub use crate::store::BlockMatrix;
