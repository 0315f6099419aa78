//! Root-finding algorithms.
//!
//! This module provides bracketing solvers for equations of one variable:
//!
//! - [`bisection`]: Simple and reliable; halves the bracket every iteration
//! - [`brent`]: Bisection safeguarded by secant and inverse quadratic steps
//!
//! Both require a bracket `[a, b]` with `f(a)` and `f(b)` of opposite sign
//! and both fail with [`MathError::InvalidBracket`](crate::MathError) when
//! the bracket does not straddle a root. Neither extrapolates: when the
//! iteration budget runs out the last bracket is returned inside
//! [`MathError::ConvergenceFailed`](crate::MathError).
//!
//! # Choosing a Solver
//!
//! | Solver | Speed | Reliability | Requires |
//! |--------|-------|-------------|----------|
//! | Brent | Fast (superlinear) | Guaranteed | Bracket |
//! | Bisection | Slow (linear) | Guaranteed | Bracket |
//!
//! # Example: Implied Discount Rate
//!
//! ```rust
//! use intrinsic_math::solvers::{bisection, SolverConfig};
//!
//! // Perpetuity of 5 growing at 2% priced at 100 => r = 7.1%
//! let value = |r: f64| 5.0 * 1.02 / (r - 0.02);
//! let f = |r: f64| value(r) - 100.0;
//!
//! let result = bisection(f, 0.03, 0.20, &SolverConfig::default()).unwrap();
//! assert!((result.root - 0.071).abs() < 1e-8);
//! ```

mod bisection;
mod brent;

pub use bisection::bisection;
pub use brent::brent;

use crate::error::{MathError, MathResult};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 200;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance for convergence, applied both to the residual and to the
    /// half-width of the bracket.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Evaluates `f` at `x`, rejecting NaN and infinite results.
pub(crate) fn evaluate<F>(f: &F, x: f64) -> MathResult<f64>
where
    F: Fn(f64) -> f64,
{
    let value = f(x);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MathError::NonFiniteObjective { x })
    }
}

/// Checks the bracket endpoints and solver settings shared by every solver.
pub(crate) fn check_inputs(a: f64, b: f64, config: &SolverConfig) -> MathResult<()> {
    if !a.is_finite() || !b.is_finite() {
        return Err(MathError::invalid_input(format!(
            "bracket endpoints must be finite: [{a}, {b}]"
        )));
    }
    if !(config.tolerance.is_finite() && config.tolerance > 0.0) {
        return Err(MathError::invalid_input(format!(
            "tolerance must be positive: {}",
            config.tolerance
        )));
    }
    Ok(())
}

/// Trait for bracketing root-finding solvers.
///
/// # Example
///
/// ```rust
/// use intrinsic_math::solvers::{BracketSolver, BrentSolver, SolverConfig};
///
/// let solver = BrentSolver;
/// let f = |x: f64| x * x - 2.0;
///
/// let result = solver.solve(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub trait BracketSolver: Send + Sync {
    /// Solves for a root of `f` inside `[a, b]`.
    fn solve<F>(&self, f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64;

    /// Returns the name of the solver.
    fn name(&self) -> &'static str;
}

/// Bisection solver implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BisectionSolver;

impl BracketSolver for BisectionSolver {
    fn solve<F>(&self, f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
    {
        bisection(f, a, b, config)
    }

    fn name(&self) -> &'static str {
        "Bisection"
    }
}

/// Brent's method solver implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrentSolver;

impl BracketSolver for BrentSolver {
    fn solve<F>(&self, f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
    {
        brent(f, a, b, config)
    }

    fn name(&self) -> &'static str {
        "Brent"
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
}
