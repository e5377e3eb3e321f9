//! Solver configuration.

use num_traits::Float;

/// Convergence settings shared by root-finding solvers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// The solver stops once `|f(x)| < tolerance` or the bracket width
    /// shrinks below it.
    pub tolerance: T,
    /// Iteration limit before reporting non-convergence.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-10).unwrap(),
            max_iterations: 200,
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Create a configuration with explicit settings.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        assert!(tolerance > T::zero(), "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            max_iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config: SolverConfig<f64> = SolverConfig::default();
        assert!(config.tolerance > 0.0);
        assert!(config.max_iterations >= 100);
    }

    #[test]
    #[should_panic(expected = "tolerance must be positive")]
    fn test_non_positive_tolerance_panics() {
        let _: SolverConfig<f64> = SolverConfig::new(0.0, 100);
    }

    #[test]
    #[should_panic(expected = "max_iterations must be > 0")]
    fn test_zero_iterations_panics() {
        let _: SolverConfig<f64> = SolverConfig::new(1e-8, 0);
    }
}
