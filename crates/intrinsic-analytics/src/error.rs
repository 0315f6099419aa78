//! Error types for the valuation engine.
//!
//! Data-model failures ([`CoreError`]) and numerical failures ([`MathError`])
//! pass through unchanged; the variants defined here are the valuation
//! preconditions and reverse-solve outcomes a caller is expected to match on.

use intrinsic_core::CoreError;
use intrinsic_math::MathError;
use thiserror::Error;

use crate::sensitivity::ValueDriver;

/// Result type alias for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Unified error type for all valuation operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    // ========== Input Errors ==========
    /// Data-model error (malformed series, missing line item, bad assumption).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Invalid input parameter.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    // ========== Valuation Errors ==========
    /// Terminal growth is not strictly below the discount rate.
    #[error("invalid terminal assumption: terminal growth {terminal_growth} must be below WACC {wacc}")]
    InvalidTerminalAssumption {
        /// Discount rate of the rejected valuation.
        wacc: f64,
        /// Terminal growth rate of the rejected valuation.
        terminal_growth: f64,
    },

    /// Shares outstanding is not a positive number.
    #[error("invalid share count: {shares}")]
    InvalidShareCount {
        /// The rejected share count.
        shares: f64,
    },

    /// Equity and debt weights cannot be formed.
    #[error("invalid capital structure: equity {equity}, debt {debt}")]
    InvalidCapitalStructure {
        /// Equity value supplied.
        equity: f64,
        /// Debt value supplied.
        debt: f64,
    },

    // ========== Reverse Solve Errors ==========
    /// The bracket does not straddle the target value.
    #[error(
        "no bracket for {driver}: residual {f_low:.4e} at {low} and {f_high:.4e} at {high} have the same sign"
    )]
    NoBracket {
        /// Driver being solved for.
        driver: ValueDriver,
        /// Lower end of the bracket.
        low: f64,
        /// Upper end of the bracket.
        high: f64,
        /// Relative residual at `low`.
        f_low: f64,
        /// Relative residual at `high`.
        f_high: f64,
    },

    /// The solver ran out of iterations.
    #[error("{driver} did not converge after {iterations} iterations; last bracket [{low}, {high}]")]
    OutOfBounds {
        /// Driver being solved for.
        driver: ValueDriver,
        /// Iterations spent.
        iterations: u32,
        /// Lower end of the last bracket examined.
        low: f64,
        /// Upper end of the last bracket examined.
        high: f64,
    },

    /// Math/solver error not mapped to a reverse-solve outcome.
    #[error("math error: {0}")]
    Math(#[from] MathError),
}

impl AnalyticsError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// True for errors confined to one evaluation point: a sensitivity cell
    /// or tornado endpoint hitting one of these is reported as undefined.
    ///
    /// Only failures a varied driver value can cause count. A bad share count
    /// or capital structure invalidates the whole run.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidTerminalAssumption { .. }
                | Self::Core(CoreError::InvalidAssumption { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalyticsError::InvalidTerminalAssumption {
            wacc: 0.08,
            terminal_growth: 0.08,
        };
        assert!(err.to_string().contains("must be below WACC 0.08"));

        let err = AnalyticsError::OutOfBounds {
            driver: ValueDriver::Wacc,
            iterations: 3,
            low: 0.07,
            high: 0.09,
        };
        let msg = err.to_string();
        assert!(msg.contains("3 iterations"));
        assert!(msg.contains("[0.07, 0.09]"));
    }

    #[test]
    fn test_core_error_is_transparent() {
        let core = CoreError::invalid_input("empty series");
        let err: AnalyticsError = core.clone().into();
        assert_eq!(err.to_string(), core.to_string());
    }

    #[test]
    fn test_locality() {
        assert!(AnalyticsError::InvalidTerminalAssumption {
            wacc: 0.05,
            terminal_growth: 0.06
        }
        .is_local());
        assert!(AnalyticsError::Core(CoreError::invalid_assumption("tax_rate", "above 100%")).is_local());
        assert!(!AnalyticsError::InvalidShareCount { shares: 0.0 }.is_local());
        assert!(!AnalyticsError::invalid_input("x").is_local());
    }
}
