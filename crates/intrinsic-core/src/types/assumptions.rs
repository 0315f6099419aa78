//! Forward-looking projection assumptions.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Scenario parameters driving the explicit forecast.
///
/// All rates are decimals (`0.08` is 8%). The terminal growth rate is only
/// checked against a WACC lazily, when a valuation is run, since the same
/// assumptions are evaluated against many discount rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionAssumptions {
    /// Growth for years `1..=near_term_growth_rates.len()`.
    pub near_term_growth_rates: Vec<f64>,
    /// Growth rate the path fades to by the final explicit year.
    pub long_term_growth_rate: f64,
    /// Number of explicitly projected years.
    pub explicit_years: u32,
    /// Operating margin reached at the end of the fade.
    pub target_operating_margin: f64,
    /// Years over which the margin fades from the anchor to the target.
    pub margin_fade_years: u32,
    /// Perpetual growth rate after the explicit horizon.
    pub terminal_growth_rate: f64,
    /// Capital expenditure as a share of revenue.
    pub capex_to_revenue: f64,
    /// Depreciation as a share of revenue.
    pub depreciation_to_revenue: f64,
    /// Change in net working capital per unit change in revenue.
    pub nwc_to_revenue: f64,
    /// Tax rate applied to operating income.
    pub tax_rate: f64,
}

impl Default for ProjectionAssumptions {
    fn default() -> Self {
        Self {
            near_term_growth_rates: vec![0.08, 0.08, 0.07, 0.06, 0.05],
            long_term_growth_rate: 0.03,
            explicit_years: 10,
            target_operating_margin: 0.15,
            margin_fade_years: 5,
            terminal_growth_rate: 0.025,
            capex_to_revenue: 0.05,
            depreciation_to_revenue: 0.04,
            nwc_to_revenue: 0.10,
            tax_rate: 0.21,
        }
    }
}

impl ProjectionAssumptions {
    /// Sets the near-term growth rates.
    #[must_use]
    pub fn with_near_term_growth(mut self, rates: Vec<f64>) -> Self {
        self.near_term_growth_rates = rates;
        self
    }

    /// Sets the long-term fade target.
    #[must_use]
    pub fn with_long_term_growth(mut self, rate: f64) -> Self {
        self.long_term_growth_rate = rate;
        self
    }

    /// Sets the explicit horizon.
    #[must_use]
    pub fn with_explicit_years(mut self, years: u32) -> Self {
        self.explicit_years = years;
        self
    }

    /// Sets the target operating margin.
    #[must_use]
    pub fn with_target_operating_margin(mut self, margin: f64) -> Self {
        self.target_operating_margin = margin;
        self
    }

    /// Sets the margin fade duration.
    #[must_use]
    pub fn with_margin_fade_years(mut self, years: u32) -> Self {
        self.margin_fade_years = years;
        self
    }

    /// Sets the terminal growth rate.
    #[must_use]
    pub fn with_terminal_growth(mut self, rate: f64) -> Self {
        self.terminal_growth_rate = rate;
        self
    }

    /// Sets capex, depreciation and working-capital intensity together.
    #[must_use]
    pub fn with_reinvestment(mut self, capex: f64, depreciation: f64, nwc: f64) -> Self {
        self.capex_to_revenue = capex;
        self.depreciation_to_revenue = depreciation;
        self.nwc_to_revenue = nwc;
        self
    }

    /// Sets the tax rate.
    #[must_use]
    pub fn with_tax_rate(mut self, rate: f64) -> Self {
        self.tax_rate = rate;
        self
    }

    /// Number of years with an explicitly supplied growth rate.
    pub fn near_term_years(&self) -> usize {
        self.near_term_growth_rates.len()
    }

    /// Checks the assumption ranges that do not depend on a discount rate.
    pub fn validate(&self) -> CoreResult<()> {
        if self.near_term_growth_rates.is_empty() {
            return Err(CoreError::invalid_assumption(
                "near_term_growth_rates",
                "at least one near-term growth rate is required",
            ));
        }
        if self.explicit_years == 0 {
            return Err(CoreError::invalid_assumption(
                "explicit_years",
                "must be at least 1",
            ));
        }
        if (self.explicit_years as usize) < self.near_term_years() {
            return Err(CoreError::invalid_assumption(
                "explicit_years",
                format!(
                    "{} explicit years cannot hold {} near-term growth rates",
                    self.explicit_years,
                    self.near_term_years()
                ),
            ));
        }

        for (idx, rate) in self.near_term_growth_rates.iter().enumerate() {
            if !rate.is_finite() || *rate <= -1.0 {
                return Err(CoreError::invalid_assumption(
                    "near_term_growth_rates",
                    format!("rate {idx} must be finite and above -100%, got {rate}"),
                ));
            }
        }

        check_growth("long_term_growth_rate", self.long_term_growth_rate)?;
        check_growth("terminal_growth_rate", self.terminal_growth_rate)?;
        check_finite("target_operating_margin", self.target_operating_margin)?;
        check_finite("capex_to_revenue", self.capex_to_revenue)?;
        check_finite("depreciation_to_revenue", self.depreciation_to_revenue)?;
        check_finite("nwc_to_revenue", self.nwc_to_revenue)?;
        check_unit_interval("tax_rate", self.tax_rate)?;

        Ok(())
    }
}

pub(crate) fn check_finite(field: &'static str, value: f64) -> CoreResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CoreError::invalid_assumption(
            field,
            format!("must be finite, got {value}"),
        ))
    }
}

pub(crate) fn check_unit_interval(field: &'static str, value: f64) -> CoreResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::invalid_assumption(
            field,
            format!("must lie in [0, 1], got {value}"),
        ))
    }
}

fn check_growth(field: &'static str, value: f64) -> CoreResult<()> {
    check_finite(field, value)?;
    if value <= -1.0 {
        return Err(CoreError::invalid_assumption(
            field,
            format!("must be above -100%, got {value}"),
        ));
    }
    Ok(())
}
