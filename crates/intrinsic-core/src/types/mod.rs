//! Domain types for equity valuation.
//!
//! This module provides the value objects passed between valuation stages:
//!
//! - [`FiscalYear`]: Key identifying one reporting year
//! - [`FinancialPeriod`]: One fiscal year's reported facts
//! - [`HistoricalSeries`]: Chronologically ordered periods for one company
//! - [`ProjectionAssumptions`]: Forward-looking scenario parameters
//! - [`CostOfCapitalInputs`]: Market and capital-structure inputs for WACC

mod assumptions;
mod capital;
mod fiscal_year;
mod period;
mod series;

pub use assumptions::ProjectionAssumptions;
pub use capital::CostOfCapitalInputs;
pub use fiscal_year::FiscalYear;
pub use period::FinancialPeriod;
pub use series::HistoricalSeries;
