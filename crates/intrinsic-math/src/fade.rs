//! Linear fades.
//!
//! A fade moves a value from `start` to `target` in equal increments over a
//! fixed number of steps and then holds it at `target`. Projection paths for
//! growth and operating margin are built from these.

/// A linear glide path from `start` to `target` over `steps` increments.
///
/// Step `0` is `start`; step `steps` (and every step after it) is exactly
/// `target`.
///
/// # Example
///
/// ```rust
/// use intrinsic_math::fade::LinearFade;
///
/// let fade = LinearFade::new(0.10, 0.04, 3);
/// assert_eq!(fade.at(0), 0.10);
/// assert!((fade.at(1) - 0.08).abs() < 1e-12);
/// assert_eq!(fade.at(3), 0.04);
/// assert_eq!(fade.at(7), 0.04);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFade {
    start: f64,
    target: f64,
    steps: u32,
}

impl LinearFade {
    /// Creates a new fade.
    #[must_use]
    pub fn new(start: f64, target: f64, steps: u32) -> Self {
        Self {
            start,
            target,
            steps,
        }
    }

    /// Value at the given step.
    ///
    /// A zero-length fade is a step function straight to `target`.
    pub fn at(&self, step: u32) -> f64 {
        if step >= self.steps {
            return self.target;
        }
        linear_fade(self.start, self.target, step, self.steps)
    }

    /// Returns the starting value.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Returns the target value.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Returns the number of steps needed to reach the target.
    pub fn steps(&self) -> u32 {
        self.steps
    }
}

/// Linear interpolation between `start` and `target` at `step / steps`.
///
/// The fraction is clamped to `[0, 1]`; `steps == 0` returns `target`.
pub fn linear_fade(start: f64, target: f64, step: u32, steps: u32) -> f64 {
    if steps == 0 || step >= steps {
        return target;
    }
    let fraction = f64::from(step) / f64::from(steps);
    start + (target - start) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fade_endpoints() {
        let fade = LinearFade::new(0.20, 0.30, 5);
        assert_relative_eq!(fade.at(0), 0.20);
        assert_relative_eq!(fade.at(5), 0.30);
        assert_relative_eq!(fade.at(10), 0.30);
    }

    #[test]
    fn test_fade_is_linear() {
        let fade = LinearFade::new(0.20, 0.30, 5);
        for step in 1..5 {
            let delta = fade.at(step) - fade.at(step - 1);
            assert_relative_eq!(delta, 0.02, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_step_fade_jumps_to_target() {
        let fade = LinearFade::new(0.15, 0.35, 0);
        assert_relative_eq!(fade.at(0), 0.35);
        assert_relative_eq!(fade.at(1), 0.35);
    }

    #[test]
    fn test_downward_fade() {
        assert_relative_eq!(linear_fade(0.12, 0.04, 2, 4), 0.08, epsilon = 1e-12);
    }
}
