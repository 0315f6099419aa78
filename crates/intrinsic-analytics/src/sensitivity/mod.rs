//! Sensitivity analysis.
//!
//! - [`rank_drivers`]: tornado ranking of single-driver swings
//! - [`grid`]: two-way value-per-share tables
//!
//! Each evaluation point is a perturbed copy of a base [`Scenario`] valued
//! on its own. A point that fails a valuation precondition (terminal growth
//! at or above WACC, for example) is recorded as `None` and never aborts the
//! surrounding table.

mod driver;
mod grid;
pub mod parallel;
mod tornado;

pub use driver::ValueDriver;
pub use grid::{grid, GridAxis, SensitivityGrid};
pub use tornado::{rank_drivers, DriverRange, TornadoEntry};

use serde::{Deserialize, Serialize};

use crate::dcf::Scenario;

/// Default minimum number of points before parallel evaluation kicks in.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Execution settings for sensitivity runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitivityConfig {
    /// Enable parallel evaluation (requires the `parallel` feature).
    pub parallel: bool,
    /// Minimum number of points to evaluate in parallel.
    pub parallel_threshold: usize,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl SensitivityConfig {
    /// A config that always evaluates sequentially.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets whether to evaluate in parallel.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the parallel threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// True when `count` points should be evaluated in parallel.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }
}

/// Value per share of one scenario, `None` if it cannot be valued.
pub(crate) fn value_per_share(scenario: &Scenario) -> Option<f64> {
    match scenario.evaluate() {
        Ok(result) => Some(result.value_per_share),
        Err(err) if err.is_local() => {
            log::trace!("undefined point: {err}");
            None
        }
        Err(err) => {
            log::warn!("scenario could not be valued: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SensitivityConfig::default();
        assert!(config.parallel);
        assert_eq!(config.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert!(!SensitivityConfig::sequential().parallel);
    }

    #[test]
    fn test_should_parallelize() {
        let config = SensitivityConfig::default().with_threshold(10);

        #[cfg(feature = "parallel")]
        {
            assert!(!config.should_parallelize(5));
            assert!(config.should_parallelize(10));
        }

        #[cfg(not(feature = "parallel"))]
        assert!(!config.should_parallelize(500));

        assert!(!config.with_parallel(false).should_parallelize(500));
    }
}
