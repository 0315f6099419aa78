//! Cost of capital.
//!
//! CAPM cost of equity, after-tax cost of debt and the weighted average
//! cost of capital. Equity is weighted at market value and debt at book value.
//!
//! # Example
//!
//! ```rust
//! use intrinsic_analytics::cost_of_capital::{cost_of_debt_after_tax, cost_of_equity, wacc};
//!
//! let re = cost_of_equity(0.04, 1.2, 0.05, 0.0);
//! let rd = cost_of_debt_after_tax(0.06, 0.25);
//! let rate = wacc(800.0, 200.0, re, rd).unwrap();
//!
//! assert!((re - 0.10).abs() < 1e-12);
//! assert!((rate - (0.8 * 0.10 + 0.2 * 0.045)).abs() < 1e-12);
//! ```

use intrinsic_core::CostOfCapitalInputs;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// CAPM cost of equity: `rf + beta * erp + country_premium`.
pub fn cost_of_equity(
    risk_free_rate: f64,
    beta: f64,
    equity_risk_premium: f64,
    country_risk_premium: f64,
) -> f64 {
    risk_free_rate + beta * equity_risk_premium + country_risk_premium
}

/// After-tax cost of debt: `pretax * (1 - tax)`.
pub fn cost_of_debt_after_tax(pre_tax_rate: f64, tax_rate: f64) -> f64 {
    pre_tax_rate * (1.0 - tax_rate)
}

/// Weighted average cost of capital.
///
/// With no debt the result is exactly `cost_of_equity`.
///
/// # Errors
///
/// [`AnalyticsError::InvalidCapitalStructure`] when either value is negative
/// or non-finite, or when `equity + debt` is not positive.
pub fn wacc(
    equity_value: f64,
    debt_value: f64,
    cost_of_equity: f64,
    after_tax_cost_of_debt: f64,
) -> AnalyticsResult<f64> {
    let (equity_weight, debt_weight) = capital_weights(equity_value, debt_value)?;
    if debt_weight == 0.0 {
        return Ok(cost_of_equity);
    }
    Ok(equity_weight * cost_of_equity + debt_weight * after_tax_cost_of_debt)
}

/// WACC from a target debt-to-capital ratio instead of observed values.
pub fn wacc_from_target_structure(
    debt_to_capital: f64,
    cost_of_equity: f64,
    after_tax_cost_of_debt: f64,
) -> AnalyticsResult<f64> {
    if !(0.0..1.0).contains(&debt_to_capital) {
        return Err(AnalyticsError::invalid_input(format!(
            "debt-to-capital must lie in [0, 1), got {debt_to_capital}"
        )));
    }
    wacc(
        1.0 - debt_to_capital,
        debt_to_capital,
        cost_of_equity,
        after_tax_cost_of_debt,
    )
}

fn capital_weights(equity: f64, debt: f64) -> AnalyticsResult<(f64, f64)> {
    let valid = equity.is_finite() && debt.is_finite() && equity >= 0.0 && debt >= 0.0;
    if !valid || equity + debt <= 0.0 {
        return Err(AnalyticsError::InvalidCapitalStructure { equity, debt });
    }
    if debt == 0.0 {
        return Ok((1.0, 0.0));
    }
    let total = equity + debt;
    Ok((equity / total, debt / total))
}

/// Cost-of-capital breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostOfCapital {
    /// CAPM cost of equity.
    pub cost_of_equity: f64,
    /// Pre-tax cost of debt times one minus the tax rate.
    pub after_tax_cost_of_debt: f64,
    /// E / (E + D).
    pub equity_weight: f64,
    /// D / (E + D).
    pub debt_weight: f64,
    /// Blended discount rate.
    pub wacc: f64,
}

impl CostOfCapital {
    /// Computes the breakdown from validated inputs.
    pub fn from_inputs(inputs: &CostOfCapitalInputs) -> AnalyticsResult<Self> {
        inputs.validate()?;
        let (equity_weight, debt_weight) =
            capital_weights(inputs.market_value_of_equity, inputs.book_value_of_debt)?;
        Self::assemble(inputs, equity_weight, debt_weight)
    }

    /// Computes the breakdown with weights from a target debt-to-capital ratio.
    ///
    /// The market and book values in `inputs` are ignored.
    pub fn from_target_structure(
        inputs: &CostOfCapitalInputs,
        debt_to_capital: f64,
    ) -> AnalyticsResult<Self> {
        inputs.validate()?;
        if !(0.0..1.0).contains(&debt_to_capital) {
            return Err(AnalyticsError::invalid_input(format!(
                "debt-to-capital must lie in [0, 1), got {debt_to_capital}"
            )));
        }
        Self::assemble(inputs, 1.0 - debt_to_capital, debt_to_capital)
    }

    fn assemble(
        inputs: &CostOfCapitalInputs,
        equity_weight: f64,
        debt_weight: f64,
    ) -> AnalyticsResult<Self> {
        let re = cost_of_equity(
            inputs.risk_free_rate,
            inputs.beta,
            inputs.equity_risk_premium,
            inputs.country_risk_premium,
        );
        let rd = cost_of_debt_after_tax(inputs.pre_tax_cost_of_debt, inputs.tax_rate);
        let rate = wacc(equity_weight, debt_weight, re, rd)?;

        log::debug!(
            "cost of capital: re={re:.4}, rd_at={rd:.4}, we={equity_weight:.3}, wacc={rate:.4}"
        );

        Ok(Self {
            cost_of_equity: re,
            after_tax_cost_of_debt: rd,
            equity_weight,
            debt_weight,
            wacc: rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn inputs() -> CostOfCapitalInputs {
        CostOfCapitalInputs {
            risk_free_rate: 0.04,
            beta: 1.1,
            equity_risk_premium: 0.05,
            country_risk_premium: 0.0,
            pre_tax_cost_of_debt: 0.06,
            market_value_of_equity: 900.0,
            book_value_of_debt: 100.0,
            tax_rate: 0.25,
        }
    }

    #[test]
    fn test_cost_of_equity() {
        assert_relative_eq!(cost_of_equity(0.04, 0.9, 0.05, 0.0), 0.085, epsilon = 1e-12);
        assert_relative_eq!(cost_of_equity(0.04, 0.9, 0.05, 0.01), 0.095, epsilon = 1e-12);
    }

    #[test]
    fn test_after_tax_debt() {
        assert_relative_eq!(cost_of_debt_after_tax(0.06, 0.25), 0.045, epsilon = 1e-12);
    }

    #[test]
    fn test_debt_free_wacc_is_exactly_cost_of_equity() {
        let re = 0.0937;
        assert_eq!(wacc(1234.5, 0.0, re, 0.03).unwrap(), re);
    }

    #[test]
    fn test_wacc_weights() {
        let rate = wacc(750.0, 250.0, 0.10, 0.04).unwrap();
        assert_relative_eq!(rate, 0.085, epsilon = 1e-12);
    }

    #[test]
    fn test_wacc_rejects_empty_structure() {
        assert!(matches!(
            wacc(0.0, 0.0, 0.1, 0.05),
            Err(AnalyticsError::InvalidCapitalStructure { .. })
        ));
        assert!(wacc(-10.0, 20.0, 0.1, 0.05).is_err());
        assert!(wacc(f64::NAN, 20.0, 0.1, 0.05).is_err());
    }

    #[test]
    fn test_all_debt_structure() {
        assert_relative_eq!(wacc(0.0, 100.0, 0.1, 0.05).unwrap(), 0.05);
    }

    #[test]
    fn test_target_structure() {
        assert_relative_eq!(
            wacc_from_target_structure(0.3, 0.10, 0.04).unwrap(),
            0.082,
            epsilon = 1e-12
        );
        assert_eq!(wacc_from_target_structure(0.0, 0.11, 0.04).unwrap(), 0.11);
        assert!(wacc_from_target_structure(1.0, 0.10, 0.04).is_err());
    }

    #[test]
    fn test_breakdown_from_inputs() {
        let coc = CostOfCapital::from_inputs(&inputs()).unwrap();
        assert_relative_eq!(coc.cost_of_equity, 0.095, epsilon = 1e-12);
        assert_relative_eq!(coc.after_tax_cost_of_debt, 0.045, epsilon = 1e-12);
        assert_relative_eq!(coc.equity_weight, 0.9, epsilon = 1e-12);
        assert_relative_eq!(coc.wacc, 0.9 * 0.095 + 0.1 * 0.045, epsilon = 1e-12);
    }

    #[test]
    fn test_breakdown_rejects_bad_tax() {
        let mut bad = inputs();
        bad.tax_rate = 1.5;
        assert!(matches!(
            CostOfCapital::from_inputs(&bad),
            Err(AnalyticsError::Core(_))
        ));
    }

    #[test]
    fn test_breakdown_from_target() {
        let coc = CostOfCapital::from_target_structure(&inputs(), 0.2).unwrap();
        assert_relative_eq!(coc.debt_weight, 0.2);
        assert_relative_eq!(coc.wacc, 0.8 * 0.095 + 0.2 * 0.045, epsilon = 1e-12);
    }
}
