//! One-call valuation run from a historical series and a scenario file.
//!
//! The report is a bundle of engine records. Rendering it is left to the
//! caller.

use serde::{Deserialize, Serialize};

use intrinsic_analytics::cost_of_capital::CostOfCapital;
use intrinsic_analytics::dcf::{net_debt_from_period, target_equity_value, Scenario, ValuationResult};
use intrinsic_analytics::projection::ProjectionAnchor;
use intrinsic_analytics::ratios::{compute_ratios, RatioSnapshot};
use intrinsic_analytics::reverse::{
    default_bracket, implied_expectations, ReverseSolveResult,
};
use intrinsic_analytics::sensitivity::{grid, rank_drivers, SensitivityGrid, TornadoEntry, ValueDriver};
use intrinsic_analytics::AnalyticsError;
use intrinsic_config::{ConfigResult, ScenarioConfig};
use intrinsic_core::HistoricalSeries;

/// Grid pairs computed when both axes are configured, as (x, y).
const GRID_PAIRS: [(ValueDriver, ValueDriver); 3] = [
    (ValueDriver::Wacc, ValueDriver::TerminalGrowth),
    (ValueDriver::NearTermGrowth, ValueDriver::TargetOperatingMargin),
    (ValueDriver::NearTermGrowth, ValueDriver::Wacc),
];

/// Drivers solved against the market price.
const IMPLIED_DRIVERS: [ValueDriver; 4] = [
    ValueDriver::NearTermGrowth,
    ValueDriver::TargetOperatingMargin,
    ValueDriver::Wacc,
    ValueDriver::TerminalGrowth,
];

/// Market data observed at the valuation date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Share price.
    pub price: f64,
    /// Diluted share count. Falls back to the latest reported count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares_outstanding: Option<f64>,
}

impl MarketSnapshot {
    /// Snapshot at `price` using the reported share count.
    #[must_use]
    pub fn at_price(price: f64) -> Self {
        Self {
            price,
            shares_outstanding: None,
        }
    }

    /// Overrides the share count.
    #[must_use]
    pub fn with_shares(mut self, shares: f64) -> Self {
        self.shares_outstanding = Some(shares);
        self
    }
}

/// Implied value of one driver, or why it could not be found.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpliedDriver {
    /// Driver that was solved.
    pub driver: ValueDriver,
    /// Solve outcome.
    pub outcome: Result<ReverseSolveResult, AnalyticsError>,
}

/// Every engine output for one company and scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationReport {
    /// Historical ratios, one per period.
    pub ratios: Vec<RatioSnapshot>,
    /// Discount rate breakdown.
    pub cost_of_capital: CostOfCapital,
    /// Base-case valuation.
    pub valuation: ValuationResult,
    /// Tornado entries, largest swing first.
    pub tornado: Vec<TornadoEntry>,
    /// Two-way tables for the configured axis pairs.
    pub grids: Vec<SensitivityGrid>,
    /// Drivers implied by the market price.
    pub implied: Vec<ImpliedDriver>,
}

impl ValuationReport {
    /// Runs ratios, cost of capital, valuation, sensitivity and reverse DCF.
    ///
    /// Fails only when the base case cannot be valued. Sensitivity points and
    /// implied drivers that cannot be computed are reported individually.
    pub fn build(
        series: &HistoricalSeries,
        config: &ScenarioConfig,
        market: &MarketSnapshot,
    ) -> ConfigResult<Self> {
        let ratios = compute_ratios(series, config.tax.statutory_rate);

        let latest = series
            .latest()
            .ok_or_else(|| AnalyticsError::invalid_input("historical series is empty"))?;
        let shares = match market.shares_outstanding {
            Some(shares) => shares,
            None => latest
                .require("shares_outstanding", latest.shares_outstanding)
                .map_err(AnalyticsError::from)?,
        };
        let debt = latest
            .require("total_debt", latest.total_debt)
            .map_err(AnalyticsError::from)?;

        let cost_of_capital = config.cost_of_capital(market.price * shares, debt)?;

        let scenario = Scenario::new(
            ProjectionAnchor::from_series(series)?,
            config.projection_assumptions(),
            cost_of_capital.wacc,
            net_debt_from_period(latest)?,
            shares,
        );
        let valuation = scenario.evaluate()?;

        let sensitivity = config.sensitivity_config();
        let tornado = rank_drivers(&scenario, &config.tornado_ranges(), &sensitivity)?;
        let grids = GRID_PAIRS
            .iter()
            .filter_map(|(x, y)| Some((config.grid_axis(*x)?, config.grid_axis(*y)?)))
            .map(|(x, y)| grid(&scenario, &x, &y, &sensitivity))
            .collect::<Result<Vec<_>, _>>()?;

        let target = target_equity_value(market.price, shares)?;
        let requests: Vec<_> = IMPLIED_DRIVERS
            .iter()
            .filter_map(|d| default_bracket(*d, &scenario).map(|b| (*d, b)))
            .collect();
        let implied = implied_expectations(target, &scenario, &requests, &config.reverse_solver_config())
            .into_iter()
            .map(|(driver, outcome)| ImpliedDriver { driver, outcome })
            .collect();

        log::debug!(
            "{}: value per share {:.2} vs price {:.2}",
            config.company.ticker,
            valuation.value_per_share,
            market.price
        );

        Ok(Self {
            ratios,
            cost_of_capital,
            valuation,
            tornado,
            grids,
            implied,
        })
    }

    /// Implied outcome for `driver`, if it was requested.
    pub fn implied_for(&self, driver: ValueDriver) -> Option<&ImpliedDriver> {
        self.implied.iter().find(|i| i.driver == driver)
    }
}
