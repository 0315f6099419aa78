//! # Intrinsic Core
//!
//! Core data model for the Intrinsic discounted cash flow valuation engine.
//!
//! This crate provides the value objects every valuation stage consumes:
//!
//! - **Historical facts**: [`FinancialPeriod`] and the ordered [`HistoricalSeries`]
//! - **Scenario inputs**: [`ProjectionAssumptions`] and [`CostOfCapitalInputs`]
//! - **Errors**: [`CoreError`] for malformed series and out-of-range assumptions
//!
//! ## Design Philosophy
//!
//! - **Missing Is Explicit**: Unreported line items are `None`, never zero
//! - **Validated Once**: Series ordering and assumption ranges are checked at construction
//! - **Immutable Values**: Stages take inputs by reference and return new records
//!
//! ## Example
//!
//! ```rust
//! use intrinsic_core::prelude::*;
//!
//! let series = HistoricalSeries::new(vec![
//!     FinancialPeriod::new(FiscalYear::new(2022)).with_revenue(90.0),
//!     FinancialPeriod::new(FiscalYear::new(2023)).with_revenue(100.0),
//! ])
//! .unwrap();
//!
//! assert_eq!(series.len(), 2);
//! assert_eq!(series.latest().unwrap().revenue, Some(100.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::cast_precision_loss)]

pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{
        CostOfCapitalInputs, FinancialPeriod, FiscalYear, HistoricalSeries, ProjectionAssumptions,
    };
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{
    CostOfCapitalInputs, FinancialPeriod, FiscalYear, HistoricalSeries, ProjectionAssumptions,
};
