//! Single-driver (tornado) sensitivity.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::parallel::maybe_parallel_map;
use super::{value_per_share, SensitivityConfig, ValueDriver};
use crate::dcf::Scenario;
use crate::error::AnalyticsResult;

/// Low and high input for one driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriverRange {
    /// Driver to vary.
    pub driver: ValueDriver,
    /// Low input value.
    pub low: f64,
    /// High input value.
    pub high: f64,
}

impl DriverRange {
    /// Creates a range.
    #[must_use]
    pub fn new(driver: ValueDriver, low: f64, high: f64) -> Self {
        Self { driver, low, high }
    }

    /// Range of `low_shift` and `high_shift` around the driver's base value.
    #[must_use]
    pub fn around(scenario: &Scenario, driver: ValueDriver, low_shift: f64, high_shift: f64) -> Self {
        let base = driver.base_value(scenario);
        Self::new(driver, base + low_shift, base + high_shift)
    }
}

/// Valuation response to one driver's range.
///
/// Values are per share; `None` marks an endpoint that could not be valued.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TornadoEntry {
    /// Driver varied.
    pub driver: ValueDriver,
    /// Driver value in the base scenario.
    ///
    /// For [`ValueDriver::NearTermGrowth`] this is the mean near-term rate.
    /// The low and high inputs set every near-term year to one rate, so a
    /// base with uneven near-term rates is not itself a point on that line.
    pub base_input: f64,
    /// Low input value.
    pub low_input: f64,
    /// High input value.
    pub high_input: f64,
    /// Base-scenario value per share.
    pub base_value: Option<f64>,
    /// Value per share at the low input.
    pub low_value: Option<f64>,
    /// Value per share at the high input.
    pub high_value: Option<f64>,
    /// `high_value - low_value`; `None` if either endpoint is undefined.
    pub swing: Option<f64>,
}

impl TornadoEntry {
    /// Absolute swing.
    pub fn magnitude(&self) -> Option<f64> {
        self.swing.map(f64::abs)
    }
}

/// Ranks drivers by the absolute value swing across their ranges.
///
/// Every driver other than the one being varied stays at its base value.
/// Entries are sorted by descending `|swing|`; entries whose swing is
/// undefined come last, in input order.
///
/// # Errors
///
/// Fails before any endpoint is evaluated when the base scenario itself is
/// invalid (see [`Scenario::validate`]).
///
/// # Example
///
/// ```rust
/// use intrinsic_analytics::dcf::Scenario;
/// use intrinsic_analytics::projection::ProjectionAnchor;
/// use intrinsic_analytics::sensitivity::{rank_drivers, DriverRange, SensitivityConfig, ValueDriver};
/// use intrinsic_core::ProjectionAssumptions;
///
/// let base = Scenario::new(
///     ProjectionAnchor::new(1_000.0, 0.20),
///     ProjectionAssumptions::default(),
///     0.09,
///     0.0,
///     100.0,
/// );
/// let ranges = [
///     DriverRange::new(ValueDriver::TaxRate, 0.20, 0.22),
///     DriverRange::new(ValueDriver::Wacc, 0.07, 0.11),
/// ];
///
/// let entries = rank_drivers(&base, &ranges, &SensitivityConfig::default()).unwrap();
/// assert_eq!(entries[0].driver, ValueDriver::Wacc);
/// assert!(entries[0].swing.unwrap() < 0.0);
/// ```
pub fn rank_drivers(
    base: &Scenario,
    ranges: &[DriverRange],
    config: &SensitivityConfig,
) -> AnalyticsResult<Vec<TornadoEntry>> {
    base.validate()?;
    let base_value = value_per_share(base);

    let points: Vec<(ValueDriver, f64)> = ranges
        .iter()
        .flat_map(|r| [(r.driver, r.low), (r.driver, r.high)])
        .collect();
    let values = maybe_parallel_map(&points, config, |(driver, input)| {
        value_per_share(&driver.apply(base, *input))
    });

    let mut entries: Vec<TornadoEntry> = ranges
        .iter()
        .zip(values.chunks_exact(2))
        .map(|(range, pair)| {
            let (low_value, high_value) = (pair[0], pair[1]);
            TornadoEntry {
                driver: range.driver,
                base_input: range.driver.base_value(base),
                low_input: range.low,
                high_input: range.high,
                base_value,
                low_value,
                high_value,
                swing: low_value.zip(high_value).map(|(lo, hi)| hi - lo),
            }
        })
        .collect();

    entries.sort_by(|a, b| match (a.magnitude(), b.magnitude()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let undefined = entries.iter().filter(|e| e.swing.is_none()).count();
    if undefined > 0 {
        log::warn!("tornado: {undefined} of {} drivers have an undefined swing", entries.len());
    }
    log::debug!("tornado ranked {} drivers", entries.len());
    Ok(entries)
}
