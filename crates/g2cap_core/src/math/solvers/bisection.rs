//! Bisection root finding.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Bisection root finder over a sign-changing bracket.
///
/// Halves the bracket until either `|f(mid)|` or the bracket width drops
/// below the configured tolerance. Convergence is guaranteed for any
/// continuous function with a valid bracket, which makes this the solver of
/// choice for monotone mappings such as option price vs. implied volatility.
///
/// # Example
///
/// ```
/// use g2cap_core::math::solvers::{BisectionSolver, SolverConfig};
///
/// let solver = BisectionSolver::new(SolverConfig::default());
/// let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
/// assert!((root - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct BisectionSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BisectionSolver<T> {
    /// Create a solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Find a root of `f` inside the bracket `[a, b]`.
    ///
    /// # Errors
    ///
    /// - `SolverError::NoBracket` if `f(a)` and `f(b)` have the same sign
    /// - `SolverError::MaxIterationsExceeded` if the iteration budget runs
    ///   out before reaching tolerance
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };
        let mut f_lo = f(lo);
        let f_hi = f(hi);

        if f_lo.abs() < self.config.tolerance {
            return Ok(lo);
        }
        if f_hi.abs() < self.config.tolerance {
            return Ok(hi);
        }
        if (f_lo > T::zero()) == (f_hi > T::zero()) {
            return Err(SolverError::NoBracket {
                a: lo.to_f64().unwrap_or(f64::NAN),
                b: hi.to_f64().unwrap_or(f64::NAN),
            });
        }

        let two = T::from(2.0).unwrap();
        for _ in 0..self.config.max_iterations {
            let mid = (lo + hi) / two;
            let f_mid = f(mid);

            if f_mid.abs() < self.config.tolerance || (hi - lo) / two < self.config.tolerance {
                return Ok(mid);
            }

            if (f_mid > T::zero()) == (f_lo > T::zero()) {
                lo = mid;
                f_lo = f_mid;
            } else {
                hi = mid;
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// The solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }
}
