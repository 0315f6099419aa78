//! # Intrinsic
//!
//! Discounted cash flow valuation from historical statements to value per
//! share, with sensitivity tables and reverse DCF.
//!
//! This crate re-exports the member crates:
//!
//! - [`model`]: Financial periods, historical series and assumption types
//! - [`math`]: Bracketing root finders and linear fades
//! - [`analytics`]: Ratios, cost of capital, projection, DCF, sensitivity and reverse DCF
//! - [`config`]: TOML / JSON scenario files
//!
//! [`ValuationReport::build`] runs every stage for one company and scenario
//! file and returns the engine records together.
//!
//! ## Example
//!
//! ```rust
//! use intrinsic::prelude::*;
//!
//! let periods = vec![
//!     FinancialPeriod::new(FiscalYear::new(2023))
//!         .with_revenue(900.0)
//!         .with_operating_income(135.0),
//!     FinancialPeriod::new(FiscalYear::new(2024))
//!         .with_revenue(1_000.0)
//!         .with_operating_income(160.0)
//!         .with_total_debt(250.0)
//!         .with_cash(100.0)
//!         .with_shares_outstanding(40.0),
//! ];
//! let series = HistoricalSeries::new(periods).unwrap();
//!
//! let scenario = Scenario::from_series(&series, ProjectionAssumptions::default(), 0.09).unwrap();
//! let result = scenario.evaluate().unwrap();
//! assert!(result.value_per_share > 0.0);
//!
//! let table = grid(
//!     &scenario,
//!     &GridAxis::linspace(ValueDriver::Wacc, 0.07, 0.11, 5),
//!     &GridAxis::linspace(ValueDriver::TerminalGrowth, 0.015, 0.035, 5),
//!     &SensitivityConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(table.undefined_count(), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use intrinsic_analytics as analytics;
pub use intrinsic_config as config;
pub use intrinsic_core as model;
pub use intrinsic_math as math;

pub mod pipeline;

pub use pipeline::{ImpliedDriver, MarketSnapshot, ValuationReport};

/// Prelude with the types and functions used in a typical valuation.
pub mod prelude {
    pub use intrinsic_analytics::prelude::*;
    pub use intrinsic_config::{ConfigError, ConfigResult, ScenarioConfig, Validate};
    pub use intrinsic_core::prelude::*;
    pub use intrinsic_math::solvers::SolverConfig;

    pub use crate::pipeline::{ImpliedDriver, MarketSnapshot, ValuationReport};
}
