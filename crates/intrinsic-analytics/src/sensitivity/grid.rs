//! Two-way sensitivity grids.

use serde::{Deserialize, Serialize};

use super::parallel::maybe_parallel_map;
use super::{value_per_share, SensitivityConfig, ValueDriver};
use crate::dcf::Scenario;
use crate::error::AnalyticsResult;

/// One grid axis: a driver and the values it takes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAxis {
    /// Driver varied along this axis.
    pub driver: ValueDriver,
    /// Axis values, in display order.
    pub values: Vec<f64>,
}

impl GridAxis {
    /// Creates an axis.
    #[must_use]
    pub fn new(driver: ValueDriver, values: Vec<f64>) -> Self {
        Self { driver, values }
    }

    /// `count` evenly spaced values from `start` to `end` inclusive.
    ///
    /// ```rust
    /// use intrinsic_analytics::sensitivity::{GridAxis, ValueDriver};
    ///
    /// let axis = GridAxis::linspace(ValueDriver::Wacc, 0.08, 0.10, 3);
    /// assert_eq!(axis.values.len(), 3);
    /// assert!((axis.values[1] - 0.09).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn linspace(driver: ValueDriver, start: f64, end: f64, count: usize) -> Self {
        let values = match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (end - start) / (count - 1) as f64;
                (0..count)
                    .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                    .collect()
            }
        };
        Self::new(driver, values)
    }

    /// Number of axis values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the axis has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Value per share for every combination of two axes.
///
/// `cells[i][j]` holds the value with the x driver at `x.values[i]` and the
/// y driver at `y.values[j]`; `None` marks a combination that could not be
/// valued (for example WACC at or below terminal growth).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityGrid {
    /// Row axis.
    pub x: GridAxis,
    /// Column axis.
    pub y: GridAxis,
    /// Row-major cells.
    pub cells: Vec<Vec<Option<f64>>>,
    /// Base-scenario value per share.
    pub base_value: Option<f64>,
}

impl SensitivityGrid {
    /// Cell at row `i`, column `j`; `None` when out of range or undefined.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.cells.get(i)?.get(j).copied().flatten()
    }

    /// Number of defined cells.
    pub fn defined_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Number of undefined cells.
    pub fn undefined_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_none()).count()
    }

    /// Smallest and largest defined values.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Evaluates every `(x, y)` combination with all other drivers at base.
///
/// Cells are independent evaluations; with the `parallel` feature they run
/// on the rayon pool. When both axes name the same driver the y value wins.
///
/// # Errors
///
/// Fails before any cell is evaluated when the base scenario itself is
/// invalid (see [`Scenario::validate`]). Cells that fail only at their own
/// driver values are `None`.
///
/// # Example
///
/// ```rust
/// use intrinsic_analytics::dcf::Scenario;
/// use intrinsic_analytics::projection::ProjectionAnchor;
/// use intrinsic_analytics::sensitivity::{grid, GridAxis, SensitivityConfig, ValueDriver};
/// use intrinsic_core::ProjectionAssumptions;
///
/// let base = Scenario::new(
///     ProjectionAnchor::new(1_000.0, 0.20),
///     ProjectionAssumptions::default().with_terminal_growth(0.03),
///     0.09,
///     0.0,
///     100.0,
/// );
/// let table = grid(
///     &base,
///     &GridAxis::new(ValueDriver::Wacc, vec![0.03, 0.08, 0.10]),
///     &GridAxis::new(ValueDriver::TerminalGrowth, vec![0.02, 0.03]),
///     &SensitivityConfig::default(),
/// )
/// .unwrap();
///
/// // WACC of 3% does not exceed a 3% terminal growth rate.
/// assert_eq!(table.get(0, 1), None);
/// assert!(table.get(1, 1).is_some());
/// assert_eq!(table.undefined_count(), 1);
/// ```
pub fn grid(
    base: &Scenario,
    x: &GridAxis,
    y: &GridAxis,
    config: &SensitivityConfig,
) -> AnalyticsResult<SensitivityGrid> {
    base.validate()?;

    let points: Vec<(f64, f64)> = x
        .values
        .iter()
        .flat_map(|&xv| y.values.iter().map(move |&yv| (xv, yv)))
        .collect();

    let flat = maybe_parallel_map(&points, config, |&(xv, yv)| {
        let scenario = y.driver.apply(&x.driver.apply(base, xv), yv);
        let cell = value_per_share(&scenario);
        log::trace!("grid cell {}={xv}, {}={yv}: {cell:?}", x.driver, y.driver);
        cell
    });

    let cells: Vec<Vec<Option<f64>>> = if y.is_empty() {
        vec![Vec::new(); x.len()]
    } else {
        flat.chunks(y.len()).map(<[Option<f64>]>::to_vec).collect()
    };

    let table = SensitivityGrid {
        x: x.clone(),
        y: y.clone(),
        cells,
        base_value: value_per_share(base),
    };

    let undefined = table.undefined_count();
    if undefined > 0 {
        log::warn!(
            "sensitivity grid {} x {}: {undefined} of {} cells undefined",
            x.driver,
            y.driver,
            points.len()
        );
    }
    log::debug!("sensitivity grid {}x{} evaluated", x.len(), y.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;
    use crate::projection::ProjectionAnchor;
    use approx::assert_relative_eq;
    use intrinsic_core::{CoreError, ProjectionAssumptions};

    fn base() -> Scenario {
        Scenario::new(
            ProjectionAnchor::new(1_000.0, 0.20),
            ProjectionAssumptions::default().with_terminal_growth(0.025),
            0.09,
            100.0,
            50.0,
        )
    }

    #[test]
    fn test_grid_shape_and_cells() {
        let x = GridAxis::new(ValueDriver::Wacc, vec![0.08, 0.09, 0.10]);
        let y = GridAxis::new(ValueDriver::TerminalGrowth, vec![0.02, 0.025]);
        let table = grid(&base(), &x, &y, &SensitivityConfig::sequential()).unwrap();

        assert_eq!(table.cells.len(), 3);
        assert!(table.cells.iter().all(|row| row.len() == 2));

        let direct = ValueDriver::TerminalGrowth
            .apply(&ValueDriver::Wacc.apply(&base(), 0.10), 0.02)
            .evaluate()
            .unwrap()
            .value_per_share;
        assert_relative_eq!(table.get(2, 0).unwrap(), direct);

        // Base scenario sits at (0.09, 0.025).
        assert_relative_eq!(table.get(1, 1).unwrap(), table.base_value.unwrap());
    }

    #[test]
    fn test_grid_monotone_in_wacc() {
        let x = GridAxis::linspace(ValueDriver::Wacc, 0.07, 0.12, 6);
        let y = GridAxis::new(ValueDriver::TargetOperatingMargin, vec![0.15, 0.25]);
        let table = grid(&base(), &x, &y, &SensitivityConfig::sequential()).unwrap();
        for j in 0..2 {
            for i in 1..6 {
                assert!(table.get(i, j).unwrap() < table.get(i - 1, j).unwrap());
            }
        }
    }

    #[test]
    fn test_invalid_cells_are_isolated() {
        let x = GridAxis::new(ValueDriver::Wacc, vec![0.02, 0.025, 0.09]);
        let y = GridAxis::new(ValueDriver::TerminalGrowth, vec![0.02, 0.03]);
        let table = grid(&base(), &x, &y, &SensitivityConfig::sequential()).unwrap();

        assert_eq!(table.get(0, 0), None);
        assert_eq!(table.get(0, 1), None);
        assert_eq!(table.get(1, 1), None);
        assert!(table.get(1, 0).is_some());
        assert!(table.get(2, 0).is_some());
        assert!(table.get(2, 1).is_some());
        assert_eq!(table.undefined_count(), 3);
        assert_eq!(table.defined_count(), 3);
        assert!(table
            .cells
            .iter()
            .flatten()
            .flatten()
            .all(|v| v.is_finite()));
    }

    #[test]
    fn test_empty_axis() {
        let x = GridAxis::new(ValueDriver::Wacc, vec![0.08, 0.09]);
        let y = GridAxis::new(ValueDriver::TerminalGrowth, vec![]);
        let table = grid(&base(), &x, &y, &SensitivityConfig::sequential()).unwrap();
        assert_eq!(table.cells, vec![Vec::<Option<f64>>::new(); 2]);
        assert_eq!(table.range(), None);
    }

    #[test]
    fn test_range() {
        let x = GridAxis::new(ValueDriver::Wacc, vec![0.08, 0.10]);
        let y = GridAxis::new(ValueDriver::TerminalGrowth, vec![0.02]);
        let table = grid(&base(), &x, &y, &SensitivityConfig::sequential()).unwrap();
        let (lo, hi) = table.range().unwrap();
        assert_relative_eq!(lo, table.get(1, 0).unwrap());
        assert_relative_eq!(hi, table.get(0, 0).unwrap());
    }

    #[test]
    fn test_invalid_base_fails_whole_grid() {
        let x = GridAxis::new(ValueDriver::Wacc, vec![0.08, 0.09, 0.10]);
        let y = GridAxis::new(ValueDriver::TerminalGrowth, vec![0.02, 0.03]);

        let mut no_shares = base();
        no_shares.shares_outstanding = 0.0;
        assert_eq!(
            grid(&no_shares, &x, &y, &SensitivityConfig::sequential()),
            Err(AnalyticsError::InvalidShareCount { shares: 0.0 })
        );

        let mut no_growth = base();
        no_growth.assumptions.near_term_growth_rates.clear();
        assert!(matches!(
            grid(&no_growth, &x, &y, &SensitivityConfig::sequential()),
            Err(AnalyticsError::Core(CoreError::InvalidAssumption { .. }))
        ));
    }

    #[test]
    fn test_out_of_range_driver_value_is_local() {
        let x = GridAxis::new(ValueDriver::TaxRate, vec![0.2, 1.5]);
        let y = GridAxis::new(ValueDriver::Wacc, vec![0.09]);
        let table = grid(&base(), &x, &y, &SensitivityConfig::sequential()).unwrap();
        assert!(table.get(0, 0).is_some());
        assert_eq!(table.get(1, 0), None);
    }

    #[test]
    fn test_linspace_hits_end_exactly() {
        let axis = GridAxis::linspace(ValueDriver::TerminalGrowth, 0.01, 0.03, 5);
        assert_eq!(axis.values[0], 0.01);
        assert_eq!(axis.values[4], 0.03);
        assert!(GridAxis::linspace(ValueDriver::Wacc, 0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let x = GridAxis::linspace(ValueDriver::NearTermGrowth, 0.0, 0.2, 9);
        let y = GridAxis::linspace(ValueDriver::Wacc, 0.07, 0.11, 9);
        let sequential = grid(&base(), &x, &y, &SensitivityConfig::sequential()).unwrap();
        let parallel = grid(&base(), &x, &y, &SensitivityConfig::default().with_threshold(1)).unwrap();
        assert_eq!(sequential, parallel);
    }
}
