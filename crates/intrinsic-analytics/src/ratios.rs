//! Historical ratio analysis.
//!
//! [`compute_ratios`] turns a [`HistoricalSeries`] into one [`RatioSnapshot`]
//! per period, in the same order. Each ratio is an `Option<f64>`: `None`
//! marks a ratio that cannot be formed (missing input, zero or negative
//! denominator, no prior period) and never leaks into other ratios of the
//! same snapshot. Non-finite intermediate values are reported as `None`.
//!
//! # Conventions
//!
//! - Invested capital = total debt + total equity - cash
//! - ROIC uses the average of opening and closing invested capital
//! - Net working capital = receivables + inventory - payables
//! - Day counts use a 365-day year
//! - "Prior period" is the previous entry in the series, not necessarily the
//!   previous fiscal year; a series with missing years compares across the gap

use intrinsic_core::{FinancialPeriod, FiscalYear, HistoricalSeries};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsResult;

/// Days per year used for DSO, DIO and DPO.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Smallest change in invested capital treated as non-zero for incremental ROIC.
pub const MIN_CAPITAL_CHANGE: f64 = 1e-6;

/// Derived ratios for one fiscal period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSnapshot {
    /// Period the ratios describe.
    pub fiscal_year: FiscalYear,
    /// Gross profit / revenue.
    pub gross_margin: Option<f64>,
    /// Operating income / revenue.
    pub operating_margin: Option<f64>,
    /// Net income / revenue.
    pub net_margin: Option<f64>,
    /// Revenue growth over the prior period in the series.
    ///
    /// Not annualized: across a gap in fiscal years this is the growth over
    /// the whole gap.
    pub revenue_growth: Option<f64>,
    /// Income tax / pretax income, clamped to [0, 1].
    pub effective_tax_rate: Option<f64>,
    /// Operating income after tax.
    pub nopat: Option<f64>,
    /// Debt + equity - cash.
    pub invested_capital: Option<f64>,
    /// NOPAT / average invested capital.
    pub roic: Option<f64>,
    /// Change in NOPAT / prior-period change in invested capital.
    pub incremental_roic: Option<f64>,
    /// Net income / total equity.
    pub roe: Option<f64>,
    /// Days sales outstanding.
    pub dso: Option<f64>,
    /// Days inventory outstanding.
    pub dio: Option<f64>,
    /// Days payables outstanding.
    pub dpo: Option<f64>,
    /// DSO + DIO - DPO.
    pub cash_conversion_cycle: Option<f64>,
    /// Receivables + inventory - payables.
    pub net_working_capital: Option<f64>,
    /// Change in net working capital from the prior period.
    pub delta_net_working_capital: Option<f64>,
    /// (Operating cash flow - |capex|) / revenue.
    pub fcf_margin: Option<f64>,
    /// |Capex| / revenue.
    pub capex_to_revenue: Option<f64>,
    /// Depreciation / revenue.
    pub depreciation_to_revenue: Option<f64>,
    /// R&D expense / revenue.
    pub rd_to_revenue: Option<f64>,
}

/// Computes ratios for every period of `series`.
///
/// `statutory_tax_rate` replaces the effective rate in NOPAT whenever the
/// effective rate cannot be formed (pretax income missing or not positive).
///
/// # Example
///
/// ```rust
/// use intrinsic_analytics::ratios::compute_ratios;
/// use intrinsic_core::{FinancialPeriod, FiscalYear, HistoricalSeries};
///
/// let series = HistoricalSeries::new(vec![
///     FinancialPeriod::new(FiscalYear::new(2023)).with_revenue(100.0).with_operating_income(20.0),
///     FinancialPeriod::new(FiscalYear::new(2024)).with_revenue(120.0).with_operating_income(30.0),
/// ])
/// .unwrap();
///
/// let ratios = compute_ratios(&series, 0.25);
/// assert_eq!(ratios[0].revenue_growth, None);
/// assert!((ratios[1].revenue_growth.unwrap() - 0.2).abs() < 1e-12);
/// assert_eq!(ratios[1].operating_margin, Some(0.25));
/// ```
pub fn compute_ratios(series: &HistoricalSeries, statutory_tax_rate: f64) -> Vec<RatioSnapshot> {
    let periods = series.periods();
    let mut snapshots: Vec<RatioSnapshot> = Vec::with_capacity(periods.len());

    for (idx, period) in periods.iter().enumerate() {
        let prior = idx.checked_sub(1).map(|i| &periods[i]);
        let prior_snapshot = snapshots.last();
        let older_snapshot = idx.checked_sub(2).map(|i| &snapshots[i]);
        let snapshot = snapshot_for(
            period,
            prior,
            prior_snapshot,
            older_snapshot,
            statutory_tax_rate,
        );
        snapshots.push(snapshot);
    }

    log::debug!("computed ratios for {} periods", snapshots.len());
    snapshots
}

/// Validates ordering of raw periods, then computes their ratios.
///
/// Fails with [`CoreError::MalformedSeries`](intrinsic_core::CoreError) when
/// fiscal years are duplicated or out of order; nothing is repaired.
pub fn ratios_from_periods(
    periods: Vec<FinancialPeriod>,
    statutory_tax_rate: f64,
) -> AnalyticsResult<Vec<RatioSnapshot>> {
    let series = HistoricalSeries::new(periods)?;
    Ok(compute_ratios(&series, statutory_tax_rate))
}

fn snapshot_for(
    period: &FinancialPeriod,
    prior: Option<&FinancialPeriod>,
    prior_snapshot: Option<&RatioSnapshot>,
    older_snapshot: Option<&RatioSnapshot>,
    statutory_tax_rate: f64,
) -> RatioSnapshot {
    let revenue = period.revenue.filter(|r| *r > 0.0);
    let cogs = cost_of_revenue(period);
    let gross_profit = period
        .gross_profit
        .or_else(|| Some(period.revenue? - period.cost_of_revenue?));

    let effective_tax_rate = effective_tax_rate(period);
    let nopat_tax_rate = effective_tax_rate.unwrap_or_else(|| {
        if period.operating_income.is_some() {
            log::warn!(
                "{}: effective tax rate unavailable, using statutory rate {statutory_tax_rate}",
                period.fiscal_year
            );
        }
        statutory_tax_rate
    });
    let nopat = period
        .operating_income
        .and_then(|ebit| finite(ebit * (1.0 - nopat_tax_rate)));

    let invested_capital = invested_capital(period);
    let roic = prior_snapshot.and_then(|p| {
        let average = (p.invested_capital? + invested_capital?) / 2.0;
        if average > 0.0 {
            finite(nopat? / average)
        } else {
            None
        }
    });
    let incremental_roic = match (prior_snapshot, older_snapshot) {
        (Some(p), Some(o)) => incremental_roic(nopat, p, o),
        _ => None,
    };

    let roe = match (period.net_income, period.total_equity) {
        (Some(ni), Some(eq)) if eq > 0.0 => finite(ni / eq),
        _ => None,
    };

    let dso = days(period.receivables, revenue);
    let dio = days(period.inventory, cogs);
    let dpo = days(period.payables, cogs);
    let cash_conversion_cycle = match (dso, dio, dpo) {
        (Some(s), Some(i), Some(p)) => finite(s + i - p),
        _ => None,
    };

    let net_working_capital = net_working_capital(period);
    let delta_net_working_capital =
        prior_snapshot.and_then(|p| finite(net_working_capital? - p.net_working_capital?));

    let revenue_growth = prior
        .and_then(|p| p.revenue)
        .filter(|r| *r > 0.0)
        .and_then(|previous| finite(period.revenue? / previous - 1.0));

    let fcf_margin = period
        .operating_cash_flow
        .zip(period.capex)
        .and_then(|(ocf, capex)| ratio(Some(ocf - capex.abs()), revenue));

    RatioSnapshot {
        fiscal_year: period.fiscal_year,
        gross_margin: ratio(gross_profit, revenue),
        operating_margin: ratio(period.operating_income, revenue),
        net_margin: ratio(period.net_income, revenue),
        revenue_growth,
        effective_tax_rate,
        nopat,
        invested_capital,
        roic,
        incremental_roic,
        roe,
        dso,
        dio,
        dpo,
        cash_conversion_cycle,
        net_working_capital,
        delta_net_working_capital,
        fcf_margin,
        capex_to_revenue: ratio(period.capex.map(f64::abs), revenue),
        depreciation_to_revenue: ratio(period.depreciation, revenue),
        rd_to_revenue: ratio(period.rd_expense, revenue),
    }
}

/// Income tax / pretax income clamped to [0, 1]; `None` when pretax income
/// is missing or not positive.
pub fn effective_tax_rate(period: &FinancialPeriod) -> Option<f64> {
    let pretax = period.pretax_income.filter(|p| *p > 0.0)?;
    finite(period.income_tax? / pretax).map(|rate| rate.clamp(0.0, 1.0))
}

/// Total debt + total equity - cash.
pub fn invested_capital(period: &FinancialPeriod) -> Option<f64> {
    finite(period.total_debt? + period.total_equity? - period.cash?)
}

/// Receivables + inventory - payables.
pub fn net_working_capital(period: &FinancialPeriod) -> Option<f64> {
    finite(period.receivables? + period.inventory? - period.payables?)
}

fn cost_of_revenue(period: &FinancialPeriod) -> Option<f64> {
    period
        .cost_of_revenue
        .or_else(|| Some(period.revenue? - period.gross_profit?))
        .filter(|c| *c > 0.0)
}

fn incremental_roic(
    nopat: Option<f64>,
    prior: &RatioSnapshot,
    older: &RatioSnapshot,
) -> Option<f64> {
    let delta_nopat = nopat? - prior.nopat?;
    let delta_capital = prior.invested_capital? - older.invested_capital?;
    if delta_capital.abs() <= MIN_CAPITAL_CHANGE {
        return None;
    }
    finite(delta_nopat / delta_capital)
}

fn days(balance: Option<f64>, flow: Option<f64>) -> Option<f64> {
    ratio(balance, flow).and_then(|r| finite(DAYS_PER_YEAR * r))
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let denominator = denominator.filter(|d| *d > 0.0)?;
    finite(numerator? / denominator)
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Compound annual growth rate from `start` to `end` over `years`.
///
/// `None` unless both endpoints are positive and `years > 0`.
pub fn cagr(start: f64, end: f64, years: u32) -> Option<f64> {
    if years == 0 || start <= 0.0 || end <= 0.0 {
        return None;
    }
    finite((end / start).powf(1.0 / f64::from(years)) - 1.0)
}

/// Revenue CAGR over the `years` fiscal years ending at the latest period.
///
/// `None` when the series lacks a period exactly `years` before the latest
/// or either revenue is missing or non-positive.
pub fn revenue_cagr(series: &HistoricalSeries, years: u32) -> Option<f64> {
    let end = series.latest()?;
    let offset = i32::try_from(years).ok()?;
    let start = series.get(FiscalYear::new(end.fiscal_year.year() - offset))?;
    cagr(start.revenue?, end.revenue?, years)
}

/// Latest, mean and median of one ratio across a set of snapshots.
///
/// Undefined observations are skipped rather than treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioSummary {
    /// Most recent defined value.
    pub latest: Option<f64>,
    /// Mean of defined values.
    pub average: Option<f64>,
    /// Median of defined values.
    pub median: Option<f64>,
    /// Number of defined values.
    pub observations: usize,
}

impl RatioSummary {
    /// Summarises the ratio selected by `select`.
    ///
    /// ```rust
    /// use intrinsic_analytics::ratios::{compute_ratios, RatioSummary};
    /// use intrinsic_core::{FinancialPeriod, FiscalYear, HistoricalSeries};
    ///
    /// let series = HistoricalSeries::new(
    ///     [(2022, 10.0), (2023, 30.0), (2024, 20.0)]
    ///         .into_iter()
    ///         .map(|(y, ebit)| {
    ///             FinancialPeriod::new(FiscalYear::new(y))
    ///                 .with_revenue(100.0)
    ///                 .with_operating_income(ebit)
    ///         })
    ///         .collect(),
    /// )
    /// .unwrap();
    ///
    /// let summary = RatioSummary::of(&compute_ratios(&series, 0.2), |r| r.operating_margin);
    /// assert_eq!(summary.latest, Some(0.2));
    /// assert_eq!(summary.median, Some(0.2));
    /// ```
    pub fn of<F>(snapshots: &[RatioSnapshot], select: F) -> Self
    where
        F: Fn(&RatioSnapshot) -> Option<f64>,
    {
        let values: Vec<f64> = snapshots.iter().filter_map(&select).collect();
        let latest = snapshots.iter().rev().find_map(&select);

        if values.is_empty() {
            return Self {
                latest,
                average: None,
                median: None,
                observations: 0,
            };
        }

        let average = values.iter().sum::<f64>() / values.len() as f64;

        let mut sorted = values.clone();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Self {
            latest,
            average: Some(average),
            median: Some(median),
            observations: values.len(),
        }
    }
}
