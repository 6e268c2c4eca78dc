//! Error types for Latente operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Latente operations.
///
/// Provides detailed context about failures including dimension mismatches,
/// invalid labels, degenerate bias updates, and invalid hyperparameters.
///
/// # Examples
///
/// ```
/// use latente::error::LatenteError;
///
/// let err = LatenteError::InvalidLabel {
///     value: 3,
///     num_categories: 2,
/// };
/// assert!(err.to_string().contains("Invalid label"));
/// ```
#[derive(Debug)]
pub enum LatenteError {
    /// Feature/weight vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Observed label outside the supported category range.
    InvalidLabel {
        /// Label value provided
        value: u32,
        /// Number of supported categories
        num_categories: u32,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Index past the materialized range of a bounds-checked accessor.
    IndexOutOfBounds {
        /// Index requested
        index: usize,
        /// Valid length
        len: usize,
    },

    /// A bias mutation that would store a NaN or infinite value.
    DegenerateBias {
        /// Entity ID whose bias was being updated
        id: usize,
        /// The rejected value
        value: f64,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for LatenteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatenteError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            LatenteError::InvalidLabel {
                value,
                num_categories,
            } => {
                write!(
                    f,
                    "Invalid label: {value}, expected a value in [0, {num_categories})"
                )
            }
            LatenteError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            LatenteError::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds (len={len})")
            }
            LatenteError::DegenerateBias { id, value } => {
                write!(f, "Degenerate bias for entity {id}: rejected {value}")
            }
            LatenteError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for LatenteError {}

impl From<&str> for LatenteError {
    fn from(msg: &str) -> Self {
        LatenteError::Other(msg.to_string())
    }
}

impl From<String> for LatenteError {
    fn from(msg: String) -> Self {
        LatenteError::Other(msg)
    }
}

impl LatenteError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an invalid label error
    #[must_use]
    pub fn invalid_label(value: u32, num_categories: u32) -> Self {
        Self::InvalidLabel {
            value,
            num_categories,
        }
    }

    /// Create an invalid hyperparameter error
    #[must_use]
    pub fn invalid_hyperparameter(param: &str, value: f64, constraint: &str) -> Self {
        Self::InvalidHyperparameter {
            param: param.to_string(),
            value: format!("{value}"),
            constraint: constraint.to_string(),
        }
    }

    /// Create an index out of bounds error
    #[must_use]
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    /// Create a degenerate bias error
    #[must_use]
    pub fn degenerate_bias(id: usize, value: f64) -> Self {
        Self::DegenerateBias { id, value }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, LatenteError>;
