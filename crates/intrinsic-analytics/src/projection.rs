//! Free cash flow projection.
//!
//! Projects revenue, operating margin, NOPAT and free cash flow to the firm
//! (FCFF) for each explicit year of a scenario:
//!
//! ```text
//! Revenue(t)        = Revenue(t-1) * (1 + growth(t))
//! NOPAT(t)          = Revenue(t) * margin(t) * (1 - tax)
//! NetInvestment(t)  = Revenue(t) * (capex_to_revenue - depreciation_to_revenue)
//! dNWC(t)           = (Revenue(t) - Revenue(t-1)) * nwc_to_revenue
//! FCFF(t)           = NOPAT(t) - NetInvestment(t) - dNWC(t)
//! ```
//!
//! Growth uses the near-term rates as given, then fades linearly from the
//! last near-term rate to the long-term rate, reaching it in the final
//! explicit year. Margin fades linearly from the anchor margin to the target
//! over the fade period and is then held flat. Negative FCFF is kept as is.

use intrinsic_core::{HistoricalSeries, ProjectionAssumptions};
use intrinsic_math::fade::LinearFade;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// Last reported revenue and operating margin: the year-0 starting point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionAnchor {
    /// Revenue of the last reported year.
    pub revenue: f64,
    /// Operating margin of the last reported year.
    pub operating_margin: f64,
}

impl ProjectionAnchor {
    /// Creates an anchor.
    #[must_use]
    pub fn new(revenue: f64, operating_margin: f64) -> Self {
        Self {
            revenue,
            operating_margin,
        }
    }

    /// Anchors on the latest period of a series.
    ///
    /// # Errors
    ///
    /// Fails when the series is empty, or the latest period lacks revenue or
    /// operating income, or reports non-positive revenue.
    pub fn from_series(series: &HistoricalSeries) -> AnalyticsResult<Self> {
        let latest = series
            .latest()
            .ok_or_else(|| AnalyticsError::invalid_input("cannot anchor on an empty series"))?;
        let revenue = latest.require("revenue", latest.revenue)?;
        let operating_income = latest.require("operating_income", latest.operating_income)?;
        if revenue <= 0.0 {
            return Err(AnalyticsError::invalid_input(format!(
                "{}: anchor revenue must be positive, got {revenue}",
                latest.fiscal_year
            )));
        }
        Ok(Self::new(revenue, operating_income / revenue))
    }

    pub(crate) fn validate(&self) -> AnalyticsResult<()> {
        if !(self.revenue.is_finite() && self.revenue > 0.0) {
            return Err(AnalyticsError::invalid_input(format!(
                "anchor revenue must be positive and finite, got {}",
                self.revenue
            )));
        }
        if !self.operating_margin.is_finite() {
            return Err(AnalyticsError::invalid_input(format!(
                "anchor operating margin must be finite, got {}",
                self.operating_margin
            )));
        }
        Ok(())
    }
}

/// One projected year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    /// Year offset from the anchor, starting at 1.
    pub year: u32,
    /// Projected revenue.
    pub revenue: f64,
    /// Growth applied this year.
    pub growth_rate: f64,
    /// Operating margin this year.
    pub operating_margin: f64,
    /// Operating income.
    pub ebit: f64,
    /// Operating income after tax.
    pub nopat: f64,
    /// Capital expenditure.
    pub capex: f64,
    /// Depreciation.
    pub depreciation: f64,
    /// Capex minus depreciation.
    pub net_investment: f64,
    /// Investment in net working capital.
    pub delta_nwc: f64,
    /// Free cash flow to the firm.
    pub fcff: f64,
}

/// An explicit-horizon projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Starting point of the projection.
    pub anchor: ProjectionAnchor,
    /// Projected years, year 1 first.
    pub rows: Vec<ProjectionRow>,
}

impl Projection {
    /// Number of explicit years.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no projected years.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Last explicit year.
    pub fn final_row(&self) -> Option<&ProjectionRow> {
        self.rows.last()
    }

    /// FCFF series, year 1 first.
    pub fn fcff(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.fcff).collect()
    }
}

/// Growth rate for each explicit year.
///
/// ```rust
/// use intrinsic_analytics::projection::growth_path;
/// use intrinsic_core::ProjectionAssumptions;
///
/// let a = ProjectionAssumptions::default()
///     .with_near_term_growth(vec![0.10, 0.08])
///     .with_long_term_growth(0.02)
///     .with_explicit_years(5);
///
/// let path = growth_path(&a);
/// assert_eq!(path.len(), 5);
/// assert_eq!(path[1], 0.08);
/// assert!((path[2] - 0.06).abs() < 1e-12);
/// assert_eq!(path[4], 0.02);
/// ```
pub fn growth_path(assumptions: &ProjectionAssumptions) -> Vec<f64> {
    let rates = &assumptions.near_term_growth_rates;
    let near_term = u32::try_from(rates.len()).unwrap_or(u32::MAX);
    let last_explicit = rates.last().copied().unwrap_or(assumptions.long_term_growth_rate);
    let fade = LinearFade::new(
        last_explicit,
        assumptions.long_term_growth_rate,
        assumptions.explicit_years.saturating_sub(near_term),
    );

    (1..=assumptions.explicit_years)
        .map(|t| {
            if t <= near_term {
                rates[(t - 1) as usize]
            } else {
                fade.at(t - near_term)
            }
        })
        .collect()
}

/// Operating margin for each explicit year.
///
/// Year `margin_fade_years` (and any later year) carries the target; a fade
/// longer than the horizon ends short of it.
pub fn margin_path(anchor_margin: f64, assumptions: &ProjectionAssumptions) -> Vec<f64> {
    let fade = LinearFade::new(
        anchor_margin,
        assumptions.target_operating_margin,
        assumptions.margin_fade_years,
    );
    (1..=assumptions.explicit_years).map(|t| fade.at(t)).collect()
}

/// Projects FCFF over the explicit horizon.
///
/// # Example
///
/// ```rust
/// use intrinsic_analytics::projection::{project, ProjectionAnchor};
/// use intrinsic_core::ProjectionAssumptions;
///
/// let assumptions = ProjectionAssumptions::default()
///     .with_near_term_growth(vec![0.10])
///     .with_explicit_years(1)
///     .with_target_operating_margin(0.20)
///     .with_margin_fade_years(0)
///     .with_reinvestment(0.0, 0.0, 0.0)
///     .with_tax_rate(0.20);
///
/// let projection = project(&ProjectionAnchor::new(100.0, 0.20), &assumptions).unwrap();
/// let year1 = projection.rows[0];
/// assert!((year1.revenue - 110.0).abs() < 1e-9);
/// assert!((year1.fcff - 17.6).abs() < 1e-9);
/// ```
///
/// # Errors
///
/// Fails when the assumptions do not validate or the anchor revenue is not
/// positive.
pub fn project(
    anchor: &ProjectionAnchor,
    assumptions: &ProjectionAssumptions,
) -> AnalyticsResult<Projection> {
    assumptions.validate()?;
    anchor.validate()?;

    let growth = growth_path(assumptions);
    let margins = margin_path(anchor.operating_margin, assumptions);
    let reinvestment_rate = assumptions.capex_to_revenue - assumptions.depreciation_to_revenue;

    let mut rows = Vec::with_capacity(growth.len());
    let mut previous_revenue = anchor.revenue;

    for (idx, (&growth_rate, &operating_margin)) in growth.iter().zip(&margins).enumerate() {
        let revenue = previous_revenue * (1.0 + growth_rate);
        let ebit = revenue * operating_margin;
        let nopat = ebit * (1.0 - assumptions.tax_rate);
        let capex = revenue * assumptions.capex_to_revenue;
        let depreciation = revenue * assumptions.depreciation_to_revenue;
        let net_investment = revenue * reinvestment_rate;
        let delta_nwc = (revenue - previous_revenue) * assumptions.nwc_to_revenue;
        let fcff = nopat - net_investment - delta_nwc;

        rows.push(ProjectionRow {
            year: u32::try_from(idx + 1).unwrap_or(u32::MAX),
            revenue,
            growth_rate,
            operating_margin,
            ebit,
            nopat,
            capex,
            depreciation,
            net_investment,
            delta_nwc,
            fcff,
        });
        previous_revenue = revenue;
    }

    if let Some(last) = rows.last() {
        log::debug!(
            "projected {} years: revenue {:.2} -> {:.2}, final FCFF {:.2}",
            rows.len(),
            anchor.revenue,
            last.revenue,
            last.fcff
        );
    }

    Ok(Projection {
        anchor: *anchor,
        rows,
    })
}
