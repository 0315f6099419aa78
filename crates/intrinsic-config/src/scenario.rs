//! Scenario configuration files.
//!
//! A scenario file holds every assumption of one valuation: company
//! identity, tax, cost of capital, the projection shape and the sensitivity
//! and solver settings used around it. Files are TOML or JSON with the same
//! schema.
//!
//! ```toml
//! [company]
//! name = "Example Corp"
//! ticker = "EXC"
//!
//! [tax]
//! effective_rate = 0.21
//! statutory_rate = 0.25
//!
//! [cost_of_capital]
//! risk_free_rate = 0.04
//! beta = 1.1
//! equity_risk_premium = 0.055
//! pre_tax_cost_of_debt = 0.06
//!
//! [projection]
//! terminal_growth_rate = 0.025
//!
//! [revenue]
//! near_term_growth_rates = [0.10, 0.08, 0.06]
//! long_term_growth_rate = 0.03
//!
//! [margins]
//! target_operating_margin = 0.18
//!
//! [capital_intensity]
//! capex_to_revenue = 0.05
//! depreciation_to_revenue = 0.04
//! nwc_to_revenue = 0.10
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use intrinsic_analytics::cost_of_capital::CostOfCapital;
use intrinsic_analytics::reverse::{PlausibilityBounds, ReverseSolverConfig};
use intrinsic_analytics::sensitivity::{DriverRange, GridAxis, SensitivityConfig, ValueDriver};
use intrinsic_core::{CostOfCapitalInputs, ProjectionAssumptions};
use intrinsic_math::solvers::{SolverConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};

// =============================================================================
// SECTIONS
// =============================================================================

/// Company identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySection {
    /// Company name.
    pub name: String,
    /// Ticker symbol.
    pub ticker: String,
    /// Reporting currency, if stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Tax rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxSection {
    /// Rate applied to projected operating income.
    pub effective_rate: f64,
    /// Marginal rate, used for the debt tax shield and as the NOPAT fallback
    /// for historical periods without a usable effective rate.
    pub statutory_rate: f64,
}

/// Cost of capital inputs that do not depend on market data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostOfCapitalSection {
    /// Risk-free rate.
    pub risk_free_rate: f64,
    /// Equity beta.
    pub beta: f64,
    /// Equity risk premium.
    pub equity_risk_premium: f64,
    /// Additional country risk premium.
    #[serde(default)]
    pub country_risk_premium: f64,
    /// Pre-tax cost of debt.
    pub pre_tax_cost_of_debt: f64,
    /// Target debt / (debt + equity). Overrides market weights when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_debt_to_capital: Option<f64>,
}

/// Projection horizon and terminal assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSection {
    /// Number of explicitly projected years.
    #[serde(default = "default_explicit_years")]
    pub explicit_years: u32,
    /// Perpetual growth rate after the explicit horizon.
    pub terminal_growth_rate: f64,
    /// Years over which the operating margin reaches its target.
    #[serde(default = "default_margin_fade_years")]
    pub margin_fade_years: u32,
}

fn default_explicit_years() -> u32 {
    10
}

fn default_margin_fade_years() -> u32 {
    5
}

/// Revenue growth path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSection {
    /// Growth rates for the first years of the projection.
    pub near_term_growth_rates: Vec<f64>,
    /// Growth rate reached at the end of the explicit horizon.
    pub long_term_growth_rate: f64,
}

/// Margin path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginsSection {
    /// Operating margin reached after the fade.
    pub target_operating_margin: f64,
}

/// Reinvestment ratios, all as fractions of revenue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalIntensitySection {
    /// Capital expenditure.
    pub capex_to_revenue: f64,
    /// Depreciation and amortisation.
    pub depreciation_to_revenue: f64,
    /// Net working capital. May be negative.
    pub nwc_to_revenue: f64,
}

/// An evenly spaced grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    /// First value.
    pub low: f64,
    /// Last value.
    pub high: f64,
    /// Number of points, endpoints included.
    #[serde(default = "default_steps")]
    pub steps: usize,
}

fn default_steps() -> usize {
    5
}

impl RangeSpec {
    /// Builds the grid axis for `driver`.
    #[must_use]
    pub fn axis(&self, driver: ValueDriver) -> GridAxis {
        GridAxis::linspace(driver, self.low, self.high, self.steps)
    }
}

/// One tornado bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TornadoSpec {
    /// Driver to move.
    pub driver: ValueDriver,
    /// Low input value.
    pub low: f64,
    /// High input value.
    pub high: f64,
}

/// Sensitivity analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivitySection {
    /// Evaluate large tables in parallel when the feature is available.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// WACC grid axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wacc_range: Option<RangeSpec>,
    /// Terminal growth grid axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_growth_range: Option<RangeSpec>,
    /// Near-term growth grid axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_range: Option<RangeSpec>,
    /// Target operating margin grid axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_range: Option<RangeSpec>,
    /// Tornado bars.
    #[serde(default)]
    pub tornado: Vec<TornadoSpec>,
}

fn default_parallel() -> bool {
    true
}

impl Default for SensitivitySection {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            wacc_range: None,
            terminal_growth_range: None,
            growth_range: None,
            margin_range: None,
            tornado: Vec::new(),
        }
    }
}

impl SensitivitySection {
    fn ranges(&self) -> [(ValueDriver, &'static str, Option<&RangeSpec>); 4] {
        [
            (ValueDriver::Wacc, "wacc_range", self.wacc_range.as_ref()),
            (
                ValueDriver::TerminalGrowth,
                "terminal_growth_range",
                self.terminal_growth_range.as_ref(),
            ),
            (ValueDriver::NearTermGrowth, "growth_range", self.growth_range.as_ref()),
            (
                ValueDriver::TargetOperatingMargin,
                "margin_range",
                self.margin_range.as_ref(),
            ),
        ]
    }
}

/// Root finder settings for reverse DCF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSection {
    /// Convergence tolerance.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Iteration cap.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

impl Default for SolverSection {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

// =============================================================================
// SCENARIO CONFIG
// =============================================================================

/// A complete valuation scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Company identity.
    pub company: CompanySection,
    /// Tax rates.
    pub tax: TaxSection,
    /// Cost of capital.
    pub cost_of_capital: CostOfCapitalSection,
    /// Projection horizon.
    pub projection: ProjectionSection,
    /// Revenue growth.
    pub revenue: RevenueSection,
    /// Margins.
    pub margins: MarginsSection,
    /// Reinvestment.
    pub capital_intensity: CapitalIntensitySection,
    /// Sensitivity settings.
    #[serde(default)]
    pub sensitivity: SensitivitySection,
    /// Solver settings.
    #[serde(default)]
    pub solver: SolverSection,
    /// Plausibility bounds for implied drivers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plausibility: Option<PlausibilityBounds>,
}

impl ScenarioConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(input: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(input: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Loads a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&contents)?,
            Some("json") => Self::from_json_str(&contents)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        log::debug!(
            "loaded scenario for {} from {}",
            config.company.ticker,
            path.display()
        );
        Ok(config)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // -------------------------------------------------------------------------
    // Conversions
    // -------------------------------------------------------------------------

    /// Projection assumptions for the valuation engine.
    pub fn projection_assumptions(&self) -> ProjectionAssumptions {
        ProjectionAssumptions {
            near_term_growth_rates: self.revenue.near_term_growth_rates.clone(),
            long_term_growth_rate: self.revenue.long_term_growth_rate,
            explicit_years: self.projection.explicit_years,
            target_operating_margin: self.margins.target_operating_margin,
            margin_fade_years: self.projection.margin_fade_years,
            terminal_growth_rate: self.projection.terminal_growth_rate,
            capex_to_revenue: self.capital_intensity.capex_to_revenue,
            depreciation_to_revenue: self.capital_intensity.depreciation_to_revenue,
            nwc_to_revenue: self.capital_intensity.nwc_to_revenue,
            tax_rate: self.tax.effective_rate,
        }
    }

    /// Cost of capital inputs, completed with market data.
    pub fn cost_of_capital_inputs(
        &self,
        market_value_of_equity: f64,
        book_value_of_debt: f64,
    ) -> CostOfCapitalInputs {
        let coc = &self.cost_of_capital;
        CostOfCapitalInputs {
            risk_free_rate: coc.risk_free_rate,
            beta: coc.beta,
            equity_risk_premium: coc.equity_risk_premium,
            country_risk_premium: coc.country_risk_premium,
            pre_tax_cost_of_debt: coc.pre_tax_cost_of_debt,
            market_value_of_equity,
            book_value_of_debt,
            tax_rate: self.tax.statutory_rate,
        }
    }

    /// Cost of capital breakdown, weighted by the target structure when the
    /// file sets one and by market equity and book debt otherwise.
    pub fn cost_of_capital(
        &self,
        market_value_of_equity: f64,
        book_value_of_debt: f64,
    ) -> ConfigResult<CostOfCapital> {
        let inputs = self.cost_of_capital_inputs(market_value_of_equity, book_value_of_debt);
        let breakdown = match self.cost_of_capital.target_debt_to_capital {
            Some(dtc) => CostOfCapital::from_target_structure(&inputs, dtc)?,
            None => CostOfCapital::from_inputs(&inputs)?,
        };
        Ok(breakdown)
    }

    /// Tornado ranges in file order.
    pub fn tornado_ranges(&self) -> Vec<DriverRange> {
        self.sensitivity
            .tornado
            .iter()
            .map(|t| DriverRange::new(t.driver, t.low, t.high))
            .collect()
    }

    /// Grid axis configured for `driver`, if any.
    pub fn grid_axis(&self, driver: ValueDriver) -> Option<GridAxis> {
        self.sensitivity
            .ranges()
            .into_iter()
            .find(|(d, _, _)| *d == driver)
            .and_then(|(_, _, range)| range.map(|s| s.axis(driver)))
    }

    /// Every configured grid axis.
    pub fn grid_axes(&self) -> Vec<GridAxis> {
        self.sensitivity
            .ranges()
            .into_iter()
            .filter_map(|(driver, _, range)| range.map(|s| s.axis(driver)))
            .collect()
    }

    /// Execution settings for sensitivity runs.
    pub fn sensitivity_config(&self) -> SensitivityConfig {
        SensitivityConfig::default().with_parallel(self.sensitivity.parallel)
    }

    /// Root finder settings.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.solver.tolerance, self.solver.max_iterations)
    }

    /// Plausibility bounds, defaulted when the file has none.
    pub fn plausibility_bounds(&self) -> PlausibilityBounds {
        self.plausibility.unwrap_or_default()
    }

    /// Complete reverse solver settings.
    pub fn reverse_solver_config(&self) -> ReverseSolverConfig {
        ReverseSolverConfig::default()
            .with_solver(self.solver_config())
            .with_plausibility(self.plausibility_bounds())
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

fn check_finite(errors: &mut Vec<ValidationError>, field: &str, value: f64) {
    if !value.is_finite() {
        errors.push(ValidationError::with_rule(
            field,
            format!("must be finite, got {value}"),
            "finite",
        ));
    }
}

fn check_rate(errors: &mut Vec<ValidationError>, field: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ValidationError::with_rule(
            field,
            format!("must lie in [0, 1], got {value}"),
            "unit_interval",
        ));
    }
}

fn check_growth(errors: &mut Vec<ValidationError>, field: &str, value: f64) {
    if !(value.is_finite() && value > -1.0) {
        errors.push(ValidationError::with_rule(
            field,
            format!("must be finite and above -100%, got {value}"),
            "valid_growth",
        ));
    }
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.company.name.trim().is_empty() {
            errors.push(ValidationError::new("company.name", "Name cannot be empty"));
        }
        if self.company.ticker.trim().is_empty() {
            errors.push(ValidationError::new("company.ticker", "Ticker cannot be empty"));
        }

        check_rate(&mut errors, "tax.effective_rate", self.tax.effective_rate);
        check_rate(&mut errors, "tax.statutory_rate", self.tax.statutory_rate);

        let coc = &self.cost_of_capital;
        check_finite(&mut errors, "cost_of_capital.risk_free_rate", coc.risk_free_rate);
        check_finite(&mut errors, "cost_of_capital.beta", coc.beta);
        check_finite(
            &mut errors,
            "cost_of_capital.equity_risk_premium",
            coc.equity_risk_premium,
        );
        check_finite(
            &mut errors,
            "cost_of_capital.country_risk_premium",
            coc.country_risk_premium,
        );
        check_finite(
            &mut errors,
            "cost_of_capital.pre_tax_cost_of_debt",
            coc.pre_tax_cost_of_debt,
        );
        if let Some(dtc) = coc.target_debt_to_capital {
            if !(0.0..1.0).contains(&dtc) {
                errors.push(ValidationError::with_rule(
                    "cost_of_capital.target_debt_to_capital",
                    format!("must lie in [0, 1), got {dtc}"),
                    "valid_structure",
                ));
            }
        }

        let near_term = &self.revenue.near_term_growth_rates;
        if near_term.is_empty() {
            errors.push(ValidationError::new(
                "revenue.near_term_growth_rates",
                "At least one near-term growth rate is required",
            ));
        }
        for (i, g) in near_term.iter().enumerate() {
            check_growth(&mut errors, &format!("revenue.near_term_growth_rates[{i}]"), *g);
        }
        check_growth(
            &mut errors,
            "revenue.long_term_growth_rate",
            self.revenue.long_term_growth_rate,
        );

        let explicit = self.projection.explicit_years as usize;
        if explicit == 0 || explicit < near_term.len() {
            errors.push(ValidationError::with_rule(
                "projection.explicit_years",
                format!(
                    "Explicit years {explicit} must be at least 1 and cover {} near-term rates",
                    near_term.len()
                ),
                "horizon_covers_near_term",
            ));
        }
        check_finite(
            &mut errors,
            "projection.terminal_growth_rate",
            self.projection.terminal_growth_rate,
        );

        check_finite(
            &mut errors,
            "margins.target_operating_margin",
            self.margins.target_operating_margin,
        );

        let ci = &self.capital_intensity;
        check_finite(&mut errors, "capital_intensity.capex_to_revenue", ci.capex_to_revenue);
        check_finite(
            &mut errors,
            "capital_intensity.depreciation_to_revenue",
            ci.depreciation_to_revenue,
        );
        check_finite(&mut errors, "capital_intensity.nwc_to_revenue", ci.nwc_to_revenue);

        for (_, name, range) in self.sensitivity.ranges() {
            let Some(range) = range else { continue };
            let field = format!("sensitivity.{name}");
            if range.steps == 0 {
                errors.push(ValidationError::with_rule(
                    &field,
                    "Grid axis must have at least one point",
                    "non_empty_axis",
                ));
            }
            if !(range.low.is_finite() && range.high.is_finite()) || range.low > range.high {
                errors.push(ValidationError::with_rule(
                    &field,
                    format!("Invalid range [{}, {}]", range.low, range.high),
                    "ordered_range",
                ));
            }
        }
        for (i, bar) in self.sensitivity.tornado.iter().enumerate() {
            let field = format!("sensitivity.tornado[{i}]");
            if !(bar.low.is_finite() && bar.high.is_finite()) {
                errors.push(ValidationError::with_rule(
                    &field,
                    "Tornado bounds must be finite",
                    "finite",
                ));
            } else if bar.low == bar.high {
                errors.push(ValidationError::with_rule(
                    &field,
                    format!("Tornado bar for {} has equal low and high", bar.driver),
                    "distinct_bounds",
                ));
            }
        }

        if !(self.solver.tolerance.is_finite() && self.solver.tolerance > 0.0) {
            errors.push(ValidationError::with_rule(
                "solver.tolerance",
                "Solver tolerance must be positive",
                "valid_tolerance",
            ));
        }
        if self.solver.max_iterations == 0 || self.solver.max_iterations > 10_000 {
            errors.push(ValidationError::with_rule(
                "solver.max_iterations",
                "Max iterations must be between 1 and 10000",
                "valid_iterations",
            ));
        }

        if let Some(bounds) = &self.plausibility {
            check_finite(&mut errors, "plausibility.max_growth", bounds.max_growth);
            check_finite(
                &mut errors,
                "plausibility.max_operating_margin",
                bounds.max_operating_margin,
            );
            check_finite(&mut errors, "plausibility.min_wacc", bounds.min_wacc);
            check_finite(
                &mut errors,
                "plausibility.max_terminal_growth",
                bounds.max_terminal_growth,
            );
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SCENARIO: &str = r#"
[company]
name = "Example Corp"
ticker = "EXC"
currency = "USD"

[tax]
effective_rate = 0.21
statutory_rate = 0.25

[cost_of_capital]
risk_free_rate = 0.04
beta = 1.1
equity_risk_premium = 0.055
pre_tax_cost_of_debt = 0.06

[projection]
terminal_growth_rate = 0.025

[revenue]
near_term_growth_rates = [0.10, 0.08, 0.06]
long_term_growth_rate = 0.03

[margins]
target_operating_margin = 0.18

[capital_intensity]
capex_to_revenue = 0.05
depreciation_to_revenue = 0.04
nwc_to_revenue = -0.02

[sensitivity]
wacc_range = { low = 0.07, high = 0.11, steps = 5 }
terminal_growth_range = { low = 0.01, high = 0.03 }

[[sensitivity.tornado]]
driver = "wacc"
low = 0.08
high = 0.10

[[sensitivity.tornado]]
driver = "target_operating_margin"
low = 0.15
high = 0.21
"#;

    #[test]
    fn test_parse_toml_with_defaults() {
        let config = ScenarioConfig::from_toml_str(SCENARIO).unwrap();
        assert_eq!(config.company.ticker, "EXC");
        assert_eq!(config.projection.explicit_years, 10);
        assert_eq!(config.projection.margin_fade_years, 5);
        assert_eq!(config.cost_of_capital.country_risk_premium, 0.0);
        assert_eq!(config.solver, SolverSection::default());
        assert!(config.plausibility.is_none());
        assert!(config.sensitivity.parallel);
    }

    #[test]
    fn test_projection_assumptions() {
        let config = ScenarioConfig::from_toml_str(SCENARIO).unwrap();
        let assumptions = config.projection_assumptions();
        assert!(assumptions.validate().is_ok());
        assert_eq!(assumptions.near_term_growth_rates, vec![0.10, 0.08, 0.06]);
        assert_relative_eq!(assumptions.tax_rate, 0.21);
        assert_relative_eq!(assumptions.nwc_to_revenue, -0.02);
    }

    #[test]
    fn test_cost_of_capital_uses_statutory_rate() {
        let config = ScenarioConfig::from_toml_str(SCENARIO).unwrap();
        let inputs = config.cost_of_capital_inputs(800.0, 200.0);
        assert_relative_eq!(inputs.tax_rate, 0.25);

        let coc = config.cost_of_capital(800.0, 200.0).unwrap();
        assert_relative_eq!(coc.cost_of_equity, 0.04 + 1.1 * 0.055, epsilon = 1e-12);
        assert_relative_eq!(coc.after_tax_cost_of_debt, 0.045, epsilon = 1e-12);
        assert_relative_eq!(coc.debt_weight, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_target_structure_overrides_market_weights() {
        let mut config = ScenarioConfig::from_toml_str(SCENARIO).unwrap();
        config.cost_of_capital.target_debt_to_capital = Some(0.4);
        let coc = config.cost_of_capital(800.0, 200.0).unwrap();
        assert_relative_eq!(coc.debt_weight, 0.4, epsilon = 1e-12);
        assert_relative_eq!(coc.equity_weight, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_sensitivity_conversions() {
        let config = ScenarioConfig::from_toml_str(SCENARIO).unwrap();

        let ranges = config.tornado_ranges();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1].driver, ValueDriver::TargetOperatingMargin);
        assert_relative_eq!(ranges[1].high, 0.21);

        let wacc = config.grid_axis(ValueDriver::Wacc).unwrap();
        assert_eq!(wacc.len(), 5);
        assert_relative_eq!(wacc.values[1], 0.08, epsilon = 1e-12);
        assert_eq!(config.grid_axis(ValueDriver::TerminalGrowth).unwrap().len(), 5);
        assert!(config.grid_axis(ValueDriver::NearTermGrowth).is_none());
        assert_eq!(config.grid_axes().len(), 2);
    }

    #[test]
    fn test_solver_and_plausibility() {
        let mut config = ScenarioConfig::from_toml_str(SCENARIO).unwrap();
        assert_eq!(config.solver_config(), SolverConfig::default());
        assert_eq!(config.plausibility_bounds(), PlausibilityBounds::default());

        config.solver = SolverSection {
            tolerance: 1e-8,
            max_iterations: 50,
        };
        config.plausibility = Some(PlausibilityBounds {
            min_wacc: 0.05,
            ..PlausibilityBounds::default()
        });
        let reverse = config.reverse_solver_config();
        assert_eq!(reverse.solver, SolverConfig::new(1e-8, 50));
        assert_relative_eq!(reverse.plausibility.min_wacc, 0.05);
    }

    #[test]
    fn test_validation_collects_every_error() {
        let broken = SCENARIO
            .replace("statutory_rate = 0.25", "statutory_rate = 1.25")
            .replace("[0.10, 0.08, 0.06]", "[]")
            .replace("low = 0.08\nhigh = 0.10", "low = 0.09\nhigh = 0.09");

        match ScenarioConfig::from_toml_str(&broken) {
            Err(ConfigError::MultipleValidationErrors(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(
                    fields,
                    [
                        "tax.statutory_rate",
                        "revenue.near_term_growth_rates",
                        "sensitivity.tornado[0]",
                    ]
                );
            }
            other => panic!("expected multiple validation errors, got {other:?}"),
        }
    }

    #[test]
    fn test_horizon_must_cover_near_term() {
        let short = SCENARIO.replace(
            "terminal_growth_rate = 0.025",
            "terminal_growth_rate = 0.025\nexplicit_years = 2",
        );
        assert!(matches!(
            ScenarioConfig::from_toml_str(&short),
            Err(ConfigError::Validation { field, .. }) if field == "projection.explicit_years"
        ));
    }

    #[test]
    fn test_terminal_growth_not_checked_against_wacc() {
        let high = SCENARIO.replace("terminal_growth_rate = 0.025", "terminal_growth_rate = 0.15");
        assert!(ScenarioConfig::from_toml_str(&high).is_ok());
    }

    #[test]
    fn test_json_matches_toml() {
        let config = ScenarioConfig::from_toml_str(SCENARIO).unwrap();
        let json = config.to_json_string().unwrap();
        assert_eq!(ScenarioConfig::from_json_str(&json).unwrap(), config);

        let toml = config.to_toml_string().unwrap();
        assert_eq!(ScenarioConfig::from_toml_str(&toml).unwrap(), config);
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            ScenarioConfig::from_json_str("{ \"company\": 3 }"),
            Err(ConfigError::Deserialization(_))
        ));
        assert!(matches!(
            ScenarioConfig::from_toml_str("[company"),
            Err(ConfigError::Deserialization(_))
        ));
    }
}
