//! Value drivers: the scenario parameters sensitivity and reverse analyses vary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dcf::Scenario;

/// A scalar scenario parameter that can be overridden independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueDriver {
    /// Every near-term growth rate set to the same value.
    NearTermGrowth,
    /// Long-term growth the near-term path fades to.
    LongTermGrowth,
    /// Target operating margin.
    TargetOperatingMargin,
    /// Discount rate.
    Wacc,
    /// Perpetual growth after the explicit horizon.
    TerminalGrowth,
    /// Tax rate on operating income.
    TaxRate,
    /// Capex as a share of revenue.
    CapexToRevenue,
    /// Depreciation as a share of revenue.
    DepreciationToRevenue,
    /// Working-capital investment per unit of revenue change.
    NwcToRevenue,
}

impl ValueDriver {
    /// Every driver, in declaration order.
    pub const ALL: [ValueDriver; 9] = [
        ValueDriver::NearTermGrowth,
        ValueDriver::LongTermGrowth,
        ValueDriver::TargetOperatingMargin,
        ValueDriver::Wacc,
        ValueDriver::TerminalGrowth,
        ValueDriver::TaxRate,
        ValueDriver::CapexToRevenue,
        ValueDriver::DepreciationToRevenue,
        ValueDriver::NwcToRevenue,
    ];

    /// Returns a copy of `scenario` with this driver set to `value`.
    ///
    /// ```rust
    /// use intrinsic_analytics::dcf::Scenario;
    /// use intrinsic_analytics::projection::ProjectionAnchor;
    /// use intrinsic_analytics::sensitivity::ValueDriver;
    /// use intrinsic_core::ProjectionAssumptions;
    ///
    /// let base = Scenario::new(
    ///     ProjectionAnchor::new(100.0, 0.2),
    ///     ProjectionAssumptions::default(),
    ///     0.09,
    ///     0.0,
    ///     10.0,
    /// );
    /// let shocked = ValueDriver::Wacc.apply(&base, 0.11);
    /// assert_eq!(shocked.wacc, 0.11);
    /// assert_eq!(base.wacc, 0.09);
    /// ```
    #[must_use]
    pub fn apply(self, scenario: &Scenario, value: f64) -> Scenario {
        let mut out = scenario.clone();
        let a = &mut out.assumptions;
        match self {
            Self::NearTermGrowth => a.near_term_growth_rates.fill(value),
            Self::LongTermGrowth => a.long_term_growth_rate = value,
            Self::TargetOperatingMargin => a.target_operating_margin = value,
            Self::Wacc => out.wacc = value,
            Self::TerminalGrowth => a.terminal_growth_rate = value,
            Self::TaxRate => a.tax_rate = value,
            Self::CapexToRevenue => a.capex_to_revenue = value,
            Self::DepreciationToRevenue => a.depreciation_to_revenue = value,
            Self::NwcToRevenue => a.nwc_to_revenue = value,
        }
        out
    }

    /// Current value of this driver in `scenario`.
    ///
    /// For [`ValueDriver::NearTermGrowth`] this is the mean near-term rate.
    pub fn base_value(self, scenario: &Scenario) -> f64 {
        let a = &scenario.assumptions;
        match self {
            Self::NearTermGrowth => {
                let rates = &a.near_term_growth_rates;
                if rates.is_empty() {
                    a.long_term_growth_rate
                } else {
                    rates.iter().sum::<f64>() / rates.len() as f64
                }
            }
            Self::LongTermGrowth => a.long_term_growth_rate,
            Self::TargetOperatingMargin => a.target_operating_margin,
            Self::Wacc => scenario.wacc,
            Self::TerminalGrowth => a.terminal_growth_rate,
            Self::TaxRate => a.tax_rate,
            Self::CapexToRevenue => a.capex_to_revenue,
            Self::DepreciationToRevenue => a.depreciation_to_revenue,
            Self::NwcToRevenue => a.nwc_to_revenue,
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::NearTermGrowth => "near-term growth",
            Self::LongTermGrowth => "long-term growth",
            Self::TargetOperatingMargin => "target operating margin",
            Self::Wacc => "WACC",
            Self::TerminalGrowth => "terminal growth",
            Self::TaxRate => "tax rate",
            Self::CapexToRevenue => "capex / revenue",
            Self::DepreciationToRevenue => "depreciation / revenue",
            Self::NwcToRevenue => "NWC / revenue",
        }
    }
}

impl fmt::Display for ValueDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
