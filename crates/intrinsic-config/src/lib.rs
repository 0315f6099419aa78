//! Intrinsic Configuration Layer
//!
//! Typed scenario files for the Intrinsic valuation engine. A scenario file
//! carries the assumptions of one valuation and converts into the inputs the
//! analytics crate consumes.
//!
//! # Features
//!
//! - **Scenario schema**: Company, tax, cost of capital, projection, sensitivity and solver sections
//! - **Formats**: TOML and JSON with the same schema, chosen by file extension
//! - **Validation**: One pass that reports every problem before any conversion
//!
//! # Example
//!
//! ```rust
//! use intrinsic_config::ScenarioConfig;
//!
//! let config = ScenarioConfig::from_json_str(r#"{
//!     "company": { "name": "Example Corp", "ticker": "EXC" },
//!     "tax": { "effective_rate": 0.21, "statutory_rate": 0.25 },
//!     "cost_of_capital": {
//!         "risk_free_rate": 0.04, "beta": 1.1,
//!         "equity_risk_premium": 0.055, "pre_tax_cost_of_debt": 0.06
//!     },
//!     "projection": { "terminal_growth_rate": 0.025 },
//!     "revenue": { "near_term_growth_rates": [0.10, 0.08], "long_term_growth_rate": 0.03 },
//!     "margins": { "target_operating_margin": 0.18 },
//!     "capital_intensity": {
//!         "capex_to_revenue": 0.05, "depreciation_to_revenue": 0.04, "nwc_to_revenue": 0.1
//!     }
//! }"#).unwrap();
//!
//! let assumptions = config.projection_assumptions();
//! assert_eq!(assumptions.explicit_years, 10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod scenario;

pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use scenario::{
    CapitalIntensitySection, CompanySection, CostOfCapitalSection, MarginsSection,
    ProjectionSection, RangeSpec, RevenueSection, ScenarioConfig, SensitivitySection,
    SolverSection, TaxSection, TornadoSpec,
};
