//! Interpolation over discrete data points.
//!
//! The yield curve interpolates a discrete zero-yield term structure with a
//! [`CubicSplineInterpolator`], which also exposes the analytic first
//! derivative needed for instantaneous forward rates.

mod cubic_spline;

pub use cubic_spline::CubicSplineInterpolator;

use crate::types::InterpolationError;
use num_traits::Float;

/// Common interface for one-dimensional interpolators.
pub trait Interpolator<T: Float> {
    /// Interpolate the value at `x`.
    ///
    /// Returns `InterpolationError::OutOfBounds` if `x` lies outside
    /// [`Interpolator::domain`].
    fn interpolate(&self, x: T) -> Result<T, InterpolationError>;

    /// The valid interpolation domain `(x_min, x_max)`.
    fn domain(&self) -> (T, T);
}
