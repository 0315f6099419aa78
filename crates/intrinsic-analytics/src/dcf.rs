//! Discounted cash flow valuation.
//!
//! Discounts explicit FCFF and a Gordon-growth terminal value at the WACC
//! using year-end discounting (`t = 1..=N`):
//!
//! ```text
//! PV(FCFF)  = sum FCFF(t) / (1 + WACC)^t
//! TV        = FCFF(N) * (1 + g) / (WACC - g)
//! PV(TV)    = TV / (1 + WACC)^N
//! EV        = PV(FCFF) + PV(TV)
//! Equity    = EV - net debt
//! ```
//!
//! The terminal cash flow grows from the final explicit year's FCFF, so a
//! margin fade that has not finished by year `N` is carried into perpetuity
//! at the margin actually reached.

use intrinsic_core::{FinancialPeriod, HistoricalSeries, ProjectionAssumptions};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::projection::{project, Projection, ProjectionAnchor};

/// Output of one DCF valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// Sum of discounted explicit FCFF.
    pub pv_explicit_fcff: f64,
    /// Terminal value at year `N`, undiscounted.
    pub terminal_value: f64,
    /// Terminal value discounted to today.
    pub pv_terminal_value: f64,
    /// Enterprise value.
    pub enterprise_value: f64,
    /// Share of enterprise value coming from the terminal value.
    pub terminal_value_weight: f64,
    /// Net debt deducted (negative for net cash).
    pub net_debt: f64,
    /// Equity value.
    pub equity_value: f64,
    /// Shares outstanding.
    pub shares_outstanding: f64,
    /// Equity value per share.
    pub value_per_share: f64,
    /// Discount rate used.
    pub wacc: f64,
    /// Terminal growth rate used.
    pub terminal_growth: f64,
}

/// Values a projection.
///
/// # Errors
///
/// - [`AnalyticsError::InvalidTerminalAssumption`] when `terminal_growth >= wacc`
/// - [`AnalyticsError::InvalidShareCount`] when `shares_outstanding <= 0`
/// - [`AnalyticsError::InvalidInput`] for an empty projection or non-finite inputs
pub fn value(
    projection: &Projection,
    wacc: f64,
    terminal_growth: f64,
    net_debt: f64,
    shares_outstanding: f64,
) -> AnalyticsResult<ValuationResult> {
    let last = projection
        .final_row()
        .ok_or_else(|| AnalyticsError::invalid_input("projection has no explicit years"))?;

    if !wacc.is_finite() || !terminal_growth.is_finite() || wacc <= -1.0 {
        return Err(AnalyticsError::invalid_input(format!(
            "discount inputs must be finite with WACC above -100%: wacc={wacc}, g={terminal_growth}"
        )));
    }
    if wacc <= terminal_growth {
        return Err(AnalyticsError::InvalidTerminalAssumption {
            wacc,
            terminal_growth,
        });
    }
    if !(shares_outstanding.is_finite() && shares_outstanding > 0.0) {
        return Err(AnalyticsError::InvalidShareCount {
            shares: shares_outstanding,
        });
    }
    if !net_debt.is_finite() {
        return Err(AnalyticsError::invalid_input(format!(
            "net debt must be finite, got {net_debt}"
        )));
    }

    let growth = 1.0 + wacc;
    let mut discount_factor = 1.0;
    let mut pv_explicit_fcff = 0.0;
    for row in &projection.rows {
        discount_factor /= growth;
        pv_explicit_fcff += row.fcff * discount_factor;
    }

    let terminal_fcff = last.fcff * (1.0 + terminal_growth);
    let terminal_value = terminal_fcff / (wacc - terminal_growth);
    let pv_terminal_value = terminal_value * discount_factor;

    let enterprise_value = pv_explicit_fcff + pv_terminal_value;
    let equity_value = enterprise_value - net_debt;
    let terminal_value_weight = if enterprise_value == 0.0 {
        0.0
    } else {
        pv_terminal_value / enterprise_value
    };

    let result = ValuationResult {
        pv_explicit_fcff,
        terminal_value,
        pv_terminal_value,
        enterprise_value,
        terminal_value_weight,
        net_debt,
        equity_value,
        shares_outstanding,
        value_per_share: equity_value / shares_outstanding,
        wacc,
        terminal_growth,
    };

    if !(result.equity_value.is_finite() && result.value_per_share.is_finite()) {
        return Err(AnalyticsError::invalid_input(
            "valuation overflowed to a non-finite value",
        ));
    }

    log::debug!(
        "DCF: EV={:.2} (TV weight {:.1}%), equity={:.2}, per share={:.4}",
        result.enterprise_value,
        result.terminal_value_weight * 100.0,
        result.equity_value,
        result.value_per_share
    );
    Ok(result)
}

/// Total debt minus cash of a reported period.
///
/// # Errors
///
/// [`CoreError::MissingField`](intrinsic_core::CoreError) when either line
/// item is unreported.
pub fn net_debt_from_period(period: &FinancialPeriod) -> AnalyticsResult<f64> {
    let debt = period.require("total_debt", period.total_debt)?;
    let cash = period.require("cash", period.cash)?;
    Ok(debt - cash)
}

/// Equity value implied by a share price.
pub fn target_equity_value(price: f64, shares_outstanding: f64) -> AnalyticsResult<f64> {
    if !(shares_outstanding.is_finite() && shares_outstanding > 0.0) {
        return Err(AnalyticsError::InvalidShareCount {
            shares: shares_outstanding,
        });
    }
    if !(price.is_finite() && price >= 0.0) {
        return Err(AnalyticsError::invalid_input(format!(
            "price must be finite and non-negative, got {price}"
        )));
    }
    Ok(price * shares_outstanding)
}

/// Complete parameter set for one valuation.
///
/// Sensitivity and reverse analyses perturb a copy of a base scenario one
/// driver at a time and call [`Scenario::evaluate`] on the copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Year-0 revenue and margin.
    pub anchor: ProjectionAnchor,
    /// Forecast assumptions.
    pub assumptions: ProjectionAssumptions,
    /// Discount rate.
    pub wacc: f64,
    /// Net debt (negative for net cash).
    pub net_debt: f64,
    /// Shares outstanding.
    pub shares_outstanding: f64,
}

impl Scenario {
    /// Creates a scenario.
    #[must_use]
    pub fn new(
        anchor: ProjectionAnchor,
        assumptions: ProjectionAssumptions,
        wacc: f64,
        net_debt: f64,
        shares_outstanding: f64,
    ) -> Self {
        Self {
            anchor,
            assumptions,
            wacc,
            net_debt,
            shares_outstanding,
        }
    }

    /// Builds a scenario anchored on the latest reported period.
    ///
    /// Anchor, net debt and share count come from that period.
    pub fn from_series(
        series: &HistoricalSeries,
        assumptions: ProjectionAssumptions,
        wacc: f64,
    ) -> AnalyticsResult<Self> {
        let anchor = ProjectionAnchor::from_series(series)?;
        let latest = series
            .latest()
            .ok_or_else(|| AnalyticsError::invalid_input("cannot anchor on an empty series"))?;
        let net_debt = net_debt_from_period(latest)?;
        let shares = latest.require("shares_outstanding", latest.shares_outstanding)?;
        Ok(Self::new(anchor, assumptions, wacc, net_debt, shares))
    }

    /// Checks the inputs every perturbed copy of this scenario shares.
    ///
    /// Terminal growth against WACC is not checked here; that depends on the
    /// evaluation point.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidAssumption`](intrinsic_core::CoreError) for malformed assumptions
    /// - [`AnalyticsError::InvalidShareCount`] when `shares_outstanding <= 0`
    /// - [`AnalyticsError::InvalidInput`] for a bad anchor or non-finite WACC or net debt
    pub fn validate(&self) -> AnalyticsResult<()> {
        self.assumptions.validate()?;
        self.anchor.validate()?;
        if !(self.shares_outstanding.is_finite() && self.shares_outstanding > 0.0) {
            return Err(AnalyticsError::InvalidShareCount {
                shares: self.shares_outstanding,
            });
        }
        if !(self.wacc.is_finite() && self.net_debt.is_finite()) {
            return Err(AnalyticsError::invalid_input(format!(
                "wacc and net debt must be finite, got wacc={} net_debt={}",
                self.wacc, self.net_debt
            )));
        }
        Ok(())
    }

    /// Projects and values the scenario.
    pub fn evaluate(&self) -> AnalyticsResult<ValuationResult> {
        let projection = self.project()?;
        value(
            &projection,
            self.wacc,
            self.assumptions.terminal_growth_rate,
            self.net_debt,
            self.shares_outstanding,
        )
    }

    /// Projects the scenario without valuing it.
    pub fn project(&self) -> AnalyticsResult<Projection> {
        project(&self.anchor, &self.assumptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use intrinsic_core::{CoreError, FiscalYear};

    fn single_year() -> Scenario {
        let assumptions = ProjectionAssumptions::default()
            .with_near_term_growth(vec![0.10])
            .with_explicit_years(1)
            .with_target_operating_margin(0.20)
            .with_margin_fade_years(0)
            .with_terminal_growth(0.02)
            .with_reinvestment(0.0, 0.0, 0.0)
            .with_tax_rate(0.20);
        Scenario::new(ProjectionAnchor::new(100.0, 0.20), assumptions, 0.10, 0.0, 10.0)
    }

    #[test]
    fn test_single_year_scenario() {
        let result = single_year().evaluate().unwrap();
        assert_relative_eq!(result.pv_explicit_fcff, 16.0, epsilon = 1e-9);
        assert_relative_eq!(result.terminal_value, 224.4, epsilon = 1e-9);
        assert_relative_eq!(result.pv_terminal_value, 204.0, epsilon = 1e-9);
        assert_relative_eq!(result.enterprise_value, 220.0, epsilon = 1e-9);
        assert_relative_eq!(result.value_per_share, 22.0, epsilon = 1e-9);
        assert_relative_eq!(result.terminal_value_weight, 204.0 / 220.0, epsilon = 1e-12);
    }

    #[test]
    fn test_net_debt_and_net_cash() {
        let mut scenario = single_year();
        scenario.net_debt = 20.0;
        assert_relative_eq!(scenario.evaluate().unwrap().equity_value, 200.0, epsilon = 1e-9);
        scenario.net_debt = -30.0;
        assert_relative_eq!(scenario.evaluate().unwrap().equity_value, 250.0, epsilon = 1e-9);
    }

    #[test]
    fn test_terminal_growth_equal_to_wacc_rejected() {
        let projection = single_year().project().unwrap();
        let err = value(&projection, 0.08, 0.08, 0.0, 1.0).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InvalidTerminalAssumption {
                wacc: 0.08,
                terminal_growth: 0.08
            }
        );
        assert!(value(&projection, 0.08, 0.09, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_share_count_must_be_positive() {
        let projection = single_year().project().unwrap();
        for shares in [0.0, -5.0, f64::NAN] {
            assert!(matches!(
                value(&projection, 0.1, 0.02, 0.0, shares),
                Err(AnalyticsError::InvalidShareCount { .. })
            ));
        }
    }

    #[test]
    fn test_empty_projection_rejected() {
        let projection = Projection {
            anchor: ProjectionAnchor::new(1.0, 0.1),
            rows: vec![],
        };
        assert!(matches!(
            value(&projection, 0.1, 0.02, 0.0, 1.0),
            Err(AnalyticsError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_multi_year_discounting() {
        let mut scenario = single_year();
        scenario.assumptions = scenario
            .assumptions
            .with_near_term_growth(vec![0.0, 0.0])
            .with_explicit_years(2);
        // FCFF flat at 16 for two years.
        let result = scenario.evaluate().unwrap();
        let expected_pv = 16.0 / 1.1 + 16.0 / 1.21;
        assert_relative_eq!(result.pv_explicit_fcff, expected_pv, epsilon = 1e-9);
        assert_relative_eq!(
            result.pv_terminal_value,
            16.0 * 1.02 / 0.08 / 1.21,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_unfinished_fade_flows_into_terminal_value() {
        let mut scenario = single_year();
        scenario.anchor = ProjectionAnchor::new(100.0, 0.10);
        scenario.assumptions = scenario
            .assumptions
            .with_target_operating_margin(0.30)
            .with_margin_fade_years(4);
        // Year-1 margin is 15%, not the 30% target.
        let result = scenario.evaluate().unwrap();
        let fcff = 110.0 * 0.15 * 0.8;
        assert_relative_eq!(result.terminal_value, fcff * 1.02 / 0.08, epsilon = 1e-9);
    }

    #[test]
    fn test_net_debt_from_period() {
        let period = FinancialPeriod::new(FiscalYear::new(2024))
            .with_total_debt(40.0)
            .with_cash(65.0);
        assert_eq!(net_debt_from_period(&period).unwrap(), -25.0);

        let missing = FinancialPeriod::new(FiscalYear::new(2024)).with_total_debt(40.0);
        assert!(matches!(
            net_debt_from_period(&missing),
            Err(AnalyticsError::Core(CoreError::MissingField { field: "cash", .. }))
        ));
    }

    #[test]
    fn test_target_equity_value() {
        assert_relative_eq!(target_equity_value(25.0, 4.0).unwrap(), 100.0);
        assert!(target_equity_value(25.0, 0.0).is_err());
        assert!(target_equity_value(-1.0, 4.0).is_err());
    }

    #[test]
    fn test_scenario_validate() {
        assert!(single_year().validate().is_ok());

        let mut no_shares = single_year();
        no_shares.shares_outstanding = 0.0;
        assert_eq!(
            no_shares.validate(),
            Err(AnalyticsError::InvalidShareCount { shares: 0.0 })
        );

        let mut no_growth = single_year();
        no_growth.assumptions.near_term_growth_rates.clear();
        assert!(matches!(
            no_growth.validate(),
            Err(AnalyticsError::Core(CoreError::InvalidAssumption {
                field: "near_term_growth_rates",
                ..
            }))
        ));

        // Terminal growth above WACC is a property of the evaluation point.
        let mut hot = single_year();
        hot.wacc = 0.01;
        assert!(hot.validate().is_ok());
    }

    #[test]
    fn test_scenario_from_series() {
        let series = HistoricalSeries::new(vec![FinancialPeriod::new(FiscalYear::new(2024))
            .with_revenue(100.0)
            .with_operating_income(20.0)
            .with_total_debt(10.0)
            .with_cash(30.0)
            .with_shares_outstanding(5.0)])
        .unwrap();
        let scenario =
            Scenario::from_series(&series, single_year().assumptions, 0.10).unwrap();
        assert_eq!(scenario.net_debt, -20.0);
        assert_eq!(scenario.shares_outstanding, 5.0);
        assert_relative_eq!(scenario.evaluate().unwrap().equity_value, 240.0, epsilon = 1e-9);
    }
}
