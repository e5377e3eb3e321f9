//! Market data errors.

use crate::types::InterpolationError;
use thiserror::Error;

/// Errors from yield-curve construction and queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketDataError {
    /// Too few pillar points to build the curve interpolant.
    #[error("insufficient data: got {got} pillar points, need at least {need}")]
    InsufficientData {
        /// Number of points supplied.
        got: usize,
        /// Minimum number required.
        need: usize,
    },

    /// Negative maturity requested, or non-positive tenor spacing supplied.
    #[error("invalid maturity t = {t}")]
    InvalidMaturity {
        /// The offending maturity or spacing.
        t: f64,
    },

    /// Propagated interpolation failure.
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}
