//! Error types for structured error handling.
//!
//! This module provides:
//! - `InterpolationError`: errors from interpolation operations
//! - `SolverError`: errors from root-finding solvers

use thiserror::Error;

/// Errors raised by interpolator construction and evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolationError {
    /// Fewer data points than the interpolant requires.
    #[error("insufficient data: got {got} points, need at least {need}")]
    InsufficientData {
        /// Number of points supplied.
        got: usize,
        /// Minimum number required.
        need: usize,
    },

    /// Malformed input data (mismatched lengths, non-increasing abscissae).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Evaluation point outside the interpolation domain.
    #[error("x = {x} outside interpolation domain [{min}, {max}]")]
    OutOfBounds {
        /// The requested evaluation point.
        x: f64,
        /// Lower end of the domain.
        min: f64,
        /// Upper end of the domain.
        max: f64,
    },
}

/// Errors raised by root-finding solvers.
///
/// A failed inversion is reported through these variants rather than a
/// poisoned numeric result; callers can distinguish a missing bracket from
/// iteration exhaustion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// `f(a)` and `f(b)` have the same sign, so no root is bracketed.
    #[error("no sign change over bracket [{a}, {b}]")]
    NoBracket {
        /// Left bracket endpoint.
        a: f64,
        /// Right bracket endpoint.
        b: f64,
    },

    /// The iteration budget was exhausted before reaching tolerance.
    #[error("failed to converge within {iterations} iterations")]
    MaxIterationsExceeded {
        /// The configured iteration limit.
        iterations: usize,
    },
}
