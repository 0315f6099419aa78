//! Error types for the Intrinsic data model.
//!
//! This module defines the errors raised while constructing or validating
//! core inputs, before any valuation arithmetic runs.

use thiserror::Error;

use crate::types::FiscalYear;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The main error type for the data model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Historical periods are not in strictly increasing fiscal-year order.
    #[error("Malformed series: period {position} has fiscal year {found}, which does not follow {previous}")]
    MalformedSeries {
        /// Zero-based position of the offending period.
        position: usize,
        /// Fiscal year of the preceding period.
        previous: FiscalYear,
        /// Fiscal year found at `position`.
        found: FiscalYear,
    },

    /// A required line item is not reported for a period.
    #[error("Missing {field} for fiscal year {fiscal_year}")]
    MissingField {
        /// Fiscal year of the period.
        fiscal_year: FiscalYear,
        /// Name of the missing line item.
        field: &'static str,
    },

    /// A scenario assumption is outside its valid range.
    #[error("Invalid assumption {field}: {reason}")]
    InvalidAssumption {
        /// Name of the assumption.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Invalid input not covered by a more specific variant.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid assumption error.
    #[must_use]
    pub fn invalid_assumption(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidAssumption {
            field,
            reason: reason.into(),
        }
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(fiscal_year: FiscalYear, field: &'static str) -> Self {
        Self::MissingField { fiscal_year, field }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
