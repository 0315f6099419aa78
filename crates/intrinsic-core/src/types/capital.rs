//! Cost-of-capital inputs.

use serde::{Deserialize, Serialize};

use super::assumptions::{check_finite, check_unit_interval};
use crate::error::{CoreError, CoreResult};

/// Inputs to the CAPM cost of equity and the capital-structure weights.
///
/// Equity is weighted at market value and debt at book value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostOfCapitalInputs {
    /// Risk-free rate.
    pub risk_free_rate: f64,
    /// Levered equity beta.
    pub beta: f64,
    /// Mature-market equity risk premium.
    pub equity_risk_premium: f64,
    /// Additional country risk premium.
    #[serde(default)]
    pub country_risk_premium: f64,
    /// Pre-tax cost of debt.
    pub pre_tax_cost_of_debt: f64,
    /// Market value of equity.
    pub market_value_of_equity: f64,
    /// Book value of debt.
    pub book_value_of_debt: f64,
    /// Marginal tax rate for the debt shield.
    pub tax_rate: f64,
}

impl CostOfCapitalInputs {
    /// Checks every rate is finite and the capital structure is non-degenerate.
    pub fn validate(&self) -> CoreResult<()> {
        check_finite("risk_free_rate", self.risk_free_rate)?;
        check_finite("beta", self.beta)?;
        check_finite("equity_risk_premium", self.equity_risk_premium)?;
        check_finite("country_risk_premium", self.country_risk_premium)?;
        check_finite("pre_tax_cost_of_debt", self.pre_tax_cost_of_debt)?;
        check_unit_interval("tax_rate", self.tax_rate)?;

        for (field, value) in [
            ("market_value_of_equity", self.market_value_of_equity),
            ("book_value_of_debt", self.book_value_of_debt),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::invalid_assumption(
                    field,
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
        }

        if self.market_value_of_equity + self.book_value_of_debt <= 0.0 {
            return Err(CoreError::invalid_assumption(
                "market_value_of_equity",
                "equity plus debt must be positive",
            ));
        }
        Ok(())
    }
}
