//! Reverse DCF: the driver value implied by a market price.
//!
//! [`solve_for`] finds the value of one [`ValueDriver`] at which the
//! scenario's equity value equals a target, holding everything else at base.
//! The residual is relative, `equity(x) / target - 1`, so the tolerance does
//! not depend on the size of the company.
//!
//! The bracket must straddle the target: both endpoints are valued first and
//! a bracket whose residuals share a sign fails with
//! [`AnalyticsError::NoBracket`] before any iteration. A solve that runs out
//! of iterations fails with [`AnalyticsError::OutOfBounds`] carrying the last
//! bracket; no extrapolated guess is ever returned.

use intrinsic_math::solvers::{BisectionSolver, BracketSolver, BrentSolver, SolverConfig, SolverResult};
use intrinsic_math::MathError;
use serde::{Deserialize, Serialize};

use crate::dcf::Scenario;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::sensitivity::ValueDriver;

/// Root-finding method for reverse solves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootMethod {
    /// Interval halving.
    #[default]
    Bisection,
    /// Brent's method.
    Brent,
}

/// Limits outside which an implied driver value is flagged as implausible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlausibilityBounds {
    /// Highest plausible growth rate (near-term or long-term).
    pub max_growth: f64,
    /// Highest plausible operating margin.
    pub max_operating_margin: f64,
    /// Lowest plausible discount rate.
    pub min_wacc: f64,
    /// Highest plausible terminal growth rate.
    pub max_terminal_growth: f64,
}

impl Default for PlausibilityBounds {
    fn default() -> Self {
        Self {
            max_growth: 0.20,
            max_operating_margin: 0.45,
            min_wacc: 0.06,
            max_terminal_growth: 0.04,
        }
    }
}

impl PlausibilityBounds {
    /// True when `value` is plausible for `driver`.
    ///
    /// Drivers without a bound are always plausible.
    pub fn is_plausible(&self, driver: ValueDriver, value: f64) -> bool {
        match driver {
            ValueDriver::NearTermGrowth | ValueDriver::LongTermGrowth => value <= self.max_growth,
            ValueDriver::TargetOperatingMargin => value <= self.max_operating_margin,
            ValueDriver::Wacc => value >= self.min_wacc,
            ValueDriver::TerminalGrowth => value <= self.max_terminal_growth,
            ValueDriver::TaxRate
            | ValueDriver::CapexToRevenue
            | ValueDriver::DepreciationToRevenue
            | ValueDriver::NwcToRevenue => true,
        }
    }
}

/// Settings for a reverse solve.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReverseSolverConfig {
    /// Tolerance and iteration budget.
    pub solver: SolverConfig,
    /// Root-finding method.
    pub method: RootMethod,
    /// Plausibility limits applied to the solved value.
    pub plausibility: PlausibilityBounds,
}

impl ReverseSolverConfig {
    /// Sets the solver tolerance and budget.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the root-finding method.
    #[must_use]
    pub fn with_method(mut self, method: RootMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the plausibility bounds.
    #[must_use]
    pub fn with_plausibility(mut self, bounds: PlausibilityBounds) -> Self {
        self.plausibility = bounds;
        self
    }
}

/// Outcome of a successful reverse solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReverseSolveResult {
    /// Driver solved for.
    pub driver: ValueDriver,
    /// Driver value that reproduces the target equity value.
    pub solved_value: f64,
    /// Driver value in the base scenario.
    pub base_value: f64,
    /// Solver iterations used.
    pub iterations: u32,
    /// Relative residual at `solved_value`.
    pub residual: f64,
    /// True when `solved_value` lies outside the plausibility bounds.
    pub implausible: bool,
}

impl ReverseSolveResult {
    /// Solved value minus base value.
    pub fn gap(&self) -> f64 {
        self.solved_value - self.base_value
    }
}

/// Conventional search interval for a driver.
///
/// `None` for drivers without a conventional interval. The terminal-growth
/// interval stops half a point below the scenario's WACC.
pub fn default_bracket(driver: ValueDriver, scenario: &Scenario) -> Option<(f64, f64)> {
    match driver {
        ValueDriver::NearTermGrowth | ValueDriver::LongTermGrowth => Some((0.0, 0.40)),
        ValueDriver::TargetOperatingMargin => Some((0.10, 0.70)),
        ValueDriver::Wacc => Some((0.03, 0.20)),
        ValueDriver::TerminalGrowth => {
            let high = scenario.wacc - 0.005;
            (high > 0.005).then_some((0.005, high))
        }
        _ => None,
    }
}

/// Solves for the `driver` value at which equity value equals `target_equity_value`.
///
/// # Example
///
/// ```rust
/// use intrinsic_analytics::dcf::Scenario;
/// use intrinsic_analytics::projection::ProjectionAnchor;
/// use intrinsic_analytics::reverse::{solve_for, ReverseSolverConfig};
/// use intrinsic_analytics::sensitivity::ValueDriver;
/// use intrinsic_core::ProjectionAssumptions;
///
/// let base = Scenario::new(
///     ProjectionAnchor::new(1_000.0, 0.20),
///     ProjectionAssumptions::default(),
///     0.09,
///     0.0,
///     100.0,
/// );
/// let market_cap = 2_500.0;
///
/// let implied = solve_for(
///     market_cap,
///     &base,
///     ValueDriver::Wacc,
///     (0.05, 0.20),
///     &ReverseSolverConfig::default(),
/// )
/// .unwrap();
///
/// let check = ValueDriver::Wacc.apply(&base, implied.solved_value).evaluate().unwrap();
/// assert!((check.equity_value / market_cap - 1.0).abs() < 1e-6);
/// ```
///
/// # Errors
///
/// - [`AnalyticsError::NoBracket`] when the endpoint residuals share a sign
/// - [`AnalyticsError::OutOfBounds`] when the iteration budget runs out
/// - Any valuation error raised while valuing a bracket endpoint
pub fn solve_for(
    target_equity_value: f64,
    base: &Scenario,
    driver: ValueDriver,
    bracket: (f64, f64),
    config: &ReverseSolverConfig,
) -> AnalyticsResult<ReverseSolveResult> {
    let (low, high) = bracket;
    if !target_equity_value.is_finite() {
        return Err(AnalyticsError::invalid_input(format!(
            "target equity value must be finite, got {target_equity_value}"
        )));
    }
    if !(low.is_finite() && high.is_finite() && low < high) {
        return Err(AnalyticsError::invalid_input(format!(
            "bracket must be finite with low < high, got [{low}, {high}]"
        )));
    }

    let residual = |x: f64| -> AnalyticsResult<f64> {
        let equity = driver.apply(base, x).evaluate()?.equity_value;
        Ok(relative_residual(equity, target_equity_value))
    };

    let f_low = residual(low)?;
    let f_high = residual(high)?;
    if f_low * f_high > 0.0 {
        return Err(AnalyticsError::NoBracket {
            driver,
            low,
            high,
            f_low,
            f_high,
        });
    }

    let objective = |x: f64| residual(x).unwrap_or(f64::NAN);
    let outcome = match config.method {
        RootMethod::Bisection => BisectionSolver.solve(objective, low, high, &config.solver),
        RootMethod::Brent => BrentSolver.solve(objective, low, high, &config.solver),
    };

    let SolverResult {
        root,
        iterations,
        residual,
    } = outcome.map_err(|err| match err {
        MathError::ConvergenceFailed {
            iterations,
            low,
            high,
            ..
        } => AnalyticsError::OutOfBounds {
            driver,
            iterations,
            low,
            high,
        },
        MathError::InvalidBracket { a, b, fa, fb } => AnalyticsError::NoBracket {
            driver,
            low: a,
            high: b,
            f_low: fa,
            f_high: fb,
        },
        other => AnalyticsError::Math(other),
    })?;

    let implausible = !config.plausibility.is_plausible(driver, root);
    if implausible {
        log::warn!("implied {driver} of {root:.4} lies outside plausibility bounds");
    }
    log::debug!("reverse solve for {driver}: {root:.6} in {iterations} iterations");

    Ok(ReverseSolveResult {
        driver,
        solved_value: root,
        base_value: driver.base_value(base),
        iterations,
        residual,
        implausible,
    })
}

/// Solves several drivers independently against the same target.
///
/// Each request is solved from the base scenario; one failure does not stop
/// the others.
pub fn implied_expectations(
    target_equity_value: f64,
    base: &Scenario,
    requests: &[(ValueDriver, (f64, f64))],
    config: &ReverseSolverConfig,
) -> Vec<(ValueDriver, AnalyticsResult<ReverseSolveResult>)> {
    requests
        .iter()
        .map(|&(driver, bracket)| {
            let outcome = solve_for(target_equity_value, base, driver, bracket, config);
            if let Err(err) = &outcome {
                log::warn!("implied {driver} unavailable: {err}");
            }
            (driver, outcome)
        })
        .collect()
}

fn relative_residual(equity: f64, target: f64) -> f64 {
    if target == 0.0 {
        equity
    } else {
        equity / target - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ProjectionAnchor;
    use approx::assert_relative_eq;
    use intrinsic_core::ProjectionAssumptions;

    fn base() -> Scenario {
        Scenario::new(
            ProjectionAnchor::new(1_000.0, 0.20),
            ProjectionAssumptions::default()
                .with_target_operating_margin(0.22)
                .with_terminal_growth(0.025),
            0.09,
            200.0,
            100.0,
        )
    }

    fn equity_at(driver: ValueDriver, value: f64) -> f64 {
        driver.apply(&base(), value).evaluate().unwrap().equity_value
    }

    #[test]
    fn test_recovers_known_wacc() {
        let target = equity_at(ValueDriver::Wacc, 0.0825);
        let result = solve_for(
            target,
            &base(),
            ValueDriver::Wacc,
            (0.05, 0.15),
            &ReverseSolverConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(result.solved_value, 0.0825, epsilon = 1e-8);
        assert_relative_eq!(result.base_value, 0.09);
        assert!(!result.implausible);
    }

    #[test]
    fn test_brent_agrees_with_bisection() {
        let target = equity_at(ValueDriver::TargetOperatingMargin, 0.31);
        let bisection = solve_for(
            target,
            &base(),
            ValueDriver::TargetOperatingMargin,
            (0.10, 0.60),
            &ReverseSolverConfig::default(),
        )
        .unwrap();
        let brent = solve_for(
            target,
            &base(),
            ValueDriver::TargetOperatingMargin,
            (0.10, 0.60),
            &ReverseSolverConfig::default().with_method(RootMethod::Brent),
        )
        .unwrap();
        assert_relative_eq!(bisection.solved_value, 0.31, epsilon = 1e-8);
        assert_relative_eq!(brent.solved_value, 0.31, epsilon = 1e-8);
        assert!(brent.iterations <= bisection.iterations);
    }

    #[test]
    fn test_no_bracket() {
        let target = equity_at(ValueDriver::NearTermGrowth, 0.30);
        let err = solve_for(
            target,
            &base(),
            ValueDriver::NearTermGrowth,
            (0.0, 0.10),
            &ReverseSolverConfig::default(),
        )
        .unwrap_err();
        match err {
            AnalyticsError::NoBracket {
                driver,
                f_low,
                f_high,
                ..
            } => {
                assert_eq!(driver, ValueDriver::NearTermGrowth);
                assert!(f_low < 0.0 && f_high < 0.0);
            }
            other => panic!("expected NoBracket, got {other:?}"),
        }
    }

    #[test]
    fn test_budget_exhausted_reports_last_bracket() {
        let target = equity_at(ValueDriver::Wacc, 0.0825);
        let config = ReverseSolverConfig::default().with_solver(SolverConfig::new(1e-14, 4));
        let err = solve_for(target, &base(), ValueDriver::Wacc, (0.05, 0.15), &config).unwrap_err();
        match err {
            AnalyticsError::OutOfBounds {
                iterations,
                low,
                high,
                ..
            } => {
                assert_eq!(iterations, 4);
                assert!(low <= 0.0825 && 0.0825 <= high);
                assert!(high - low < 0.1);
            }
            other => panic!("expected OutOfBounds, got {other:?}"),
        }
    }

    #[test]
    fn test_endpoint_failure_propagates() {
        let err = solve_for(
            1_000.0,
            &base(),
            ValueDriver::Wacc,
            (0.02, 0.15),
            &ReverseSolverConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidTerminalAssumption { .. }));
    }

    #[test]
    fn test_implausible_flag() {
        let target = equity_at(ValueDriver::NearTermGrowth, 0.28);
        let result = solve_for(
            target,
            &base(),
            ValueDriver::NearTermGrowth,
            (0.0, 0.40),
            &ReverseSolverConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(result.solved_value, 0.28, epsilon = 1e-8);
        assert!(result.implausible);
        assert!(result.gap() > 0.0);
    }

    #[test]
    fn test_invalid_bracket_order() {
        let result = solve_for(
            1.0,
            &base(),
            ValueDriver::Wacc,
            (0.15, 0.05),
            &ReverseSolverConfig::default(),
        );
        assert!(matches!(result, Err(AnalyticsError::InvalidInput { .. })));
    }

    #[test]
    fn test_plausibility_bounds() {
        let bounds = PlausibilityBounds::default();
        assert!(bounds.is_plausible(ValueDriver::Wacc, 0.06));
        assert!(!bounds.is_plausible(ValueDriver::Wacc, 0.059));
        assert!(!bounds.is_plausible(ValueDriver::TerminalGrowth, 0.045));
        assert!(!bounds.is_plausible(ValueDriver::TargetOperatingMargin, 0.5));
        assert!(bounds.is_plausible(ValueDriver::TaxRate, 0.9));
    }

    #[test]
    fn test_default_brackets() {
        assert_eq!(
            default_bracket(ValueDriver::Wacc, &base()),
            Some((0.03, 0.20))
        );
        let (lo, hi) = default_bracket(ValueDriver::TerminalGrowth, &base()).unwrap();
        assert_relative_eq!(lo, 0.005);
        assert_relative_eq!(hi, 0.085, epsilon = 1e-12);
        assert_eq!(default_bracket(ValueDriver::TaxRate, &base()), None);
    }

    #[test]
    fn test_implied_expectations_independent() {
        let target = base().evaluate().unwrap().equity_value * 1.3;
        let outcomes = implied_expectations(
            target,
            &base(),
            &[
                (ValueDriver::NearTermGrowth, (0.0, 0.40)),
                (ValueDriver::TerminalGrowth, (0.005, 0.006)),
                (ValueDriver::Wacc, (0.05, 0.15)),
            ],
            &ReverseSolverConfig::default(),
        );
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].1.is_ok());
        assert!(matches!(outcomes[1].1, Err(AnalyticsError::NoBracket { .. })));
        let wacc = outcomes[2].1.as_ref().unwrap();
        assert!(wacc.solved_value < 0.09);
    }
}
