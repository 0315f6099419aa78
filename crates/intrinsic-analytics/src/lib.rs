//! # Intrinsic Analytics
//!
//! Valuation engine for the Intrinsic DCF library.
//!
//! This crate holds every numeric stage between historical statements and a
//! value per share:
//!
//! - **Ratios**: Margins, growth, NOPAT, ROIC, working-capital days ([`ratios`])
//! - **Cost of Capital**: CAPM, after-tax cost of debt, WACC ([`cost_of_capital`])
//! - **Projection**: Revenue, margin and FCFF paths with linear fades ([`projection`])
//! - **DCF**: Explicit and terminal value discounting ([`dcf`])
//! - **Sensitivity**: Tornado ranking and two-way grids ([`sensitivity`])
//! - **Reverse DCF**: Driver values implied by a market price ([`reverse`])
//!
//! ## Architecture
//!
//! Every stage is a pure function of its inputs. [`dcf::Scenario`] bundles
//! the full parameter set of one valuation; sensitivity and reverse analyses
//! work on perturbed copies of a base scenario and never share state.
//!
//! ## Usage
//!
//! ```rust
//! use intrinsic_analytics::prelude::*;
//! use intrinsic_core::ProjectionAssumptions;
//!
//! let assumptions = ProjectionAssumptions::default()
//!     .with_near_term_growth(vec![0.10])
//!     .with_explicit_years(1)
//!     .with_target_operating_margin(0.20)
//!     .with_margin_fade_years(0)
//!     .with_terminal_growth(0.02)
//!     .with_reinvestment(0.0, 0.0, 0.0)
//!     .with_tax_rate(0.20);
//!
//! let scenario = Scenario::new(ProjectionAnchor::new(100.0, 0.20), assumptions, 0.10, 0.0, 1.0);
//! let result = scenario.evaluate().unwrap();
//! assert!((result.enterprise_value - 220.0).abs() < 0.1);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::float_cmp)]

pub mod cost_of_capital;
pub mod dcf;
pub mod error;
pub mod projection;
pub mod ratios;
pub mod reverse;
pub mod sensitivity;

pub use error::{AnalyticsError, AnalyticsResult};

/// Prelude module for convenient imports.
///
/// ```rust
/// use intrinsic_analytics::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{AnalyticsError, AnalyticsResult};

    // Ratios
    pub use crate::ratios::{
        cagr, compute_ratios, ratios_from_periods, revenue_cagr, RatioSnapshot, RatioSummary,
    };

    // Cost of capital
    pub use crate::cost_of_capital::{
        cost_of_debt_after_tax, cost_of_equity, wacc, wacc_from_target_structure, CostOfCapital,
    };

    // Projection
    pub use crate::projection::{
        growth_path, margin_path, project, Projection, ProjectionAnchor, ProjectionRow,
    };

    // Valuation
    pub use crate::dcf::{net_debt_from_period, target_equity_value, value, Scenario, ValuationResult};

    // Sensitivity
    pub use crate::sensitivity::{
        grid, rank_drivers, DriverRange, GridAxis, SensitivityConfig, SensitivityGrid,
        TornadoEntry, ValueDriver,
    };

    // Reverse DCF
    pub use crate::reverse::{
        default_bracket, implied_expectations, solve_for, PlausibilityBounds, ReverseSolveResult,
        ReverseSolverConfig, RootMethod,
    };
}
