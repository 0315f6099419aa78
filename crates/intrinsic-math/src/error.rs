//! Error types for numerical routines.

use thiserror::Error;

/// A specialized Result type for numerical routines.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur in numerical routines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Root-finding algorithm exhausted its iteration budget.
    #[error(
        "Convergence failed after {iterations} iterations (residual: {residual:.2e}, bracket: [{low}, {high}])"
    )]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// Residual at the last evaluated point.
        residual: f64,
        /// Lower end of the last bracket examined.
        low: f64,
        /// Upper end of the last bracket examined.
        high: f64,
    },

    /// The supplied interval does not bracket a sign change.
    #[error("Invalid bracket: f({a}) = {fa:.2e} and f({b}) = {fb:.2e} have same sign")]
    InvalidBracket {
        /// Lower bound of bracket.
        a: f64,
        /// Upper bound of bracket.
        b: f64,
        /// Function value at a.
        fa: f64,
        /// Function value at b.
        fb: f64,
    },

    /// The objective returned a non-finite value.
    #[error("Objective is not finite at x = {x}")]
    NonFiniteObjective {
        /// The point where evaluation produced NaN or infinity.
        x: f64,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates a convergence failed error carrying the last bracket.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64, low: f64, high: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
            low,
            high,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
