//! Natural cubic spline interpolation.

use super::Interpolator;
use crate::types::InterpolationError;
use num_traits::Float;

/// Coefficients of one cubic segment: `y = a + b*dx + c*dx² + d*dx³`
/// with `dx = x - x[i]`.
#[derive(Debug, Clone, Copy)]
struct Segment<T: Float> {
    a: T,
    b: T,
    c: T,
    d: T,
}

/// Natural cubic spline interpolator with C² continuity.
///
/// Second derivatives are zero at both boundary knots (natural boundary
/// conditions). The abscissae must be strictly increasing; at least three
/// knots are required.
///
/// Besides plain evaluation the spline exposes its analytic first
/// [`derivative`](CubicSplineInterpolator::derivative), which the yield
/// curve uses for instantaneous forward rates.
///
/// # Example
///
/// ```
/// use g2cap_core::math::interpolators::{CubicSplineInterpolator, Interpolator};
///
/// let spline = CubicSplineInterpolator::new(
///     &[0.0, 1.0, 2.0, 3.0],
///     &[0.0, 1.0, 4.0, 9.0],
/// ).unwrap();
///
/// let y = spline.interpolate(1.5).unwrap();
/// assert!(y > 1.0 && y < 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct CubicSplineInterpolator<T: Float> {
    xs: Vec<T>,
    segments: Vec<Segment<T>>,
}

impl<T: Float> CubicSplineInterpolator<T> {
    /// Build a natural cubic spline through `(xs[i], ys[i])`.
    ///
    /// # Errors
    ///
    /// - `InterpolationError::InvalidInput` if the slice lengths differ or
    ///   `xs` is not strictly increasing
    /// - `InterpolationError::InsufficientData` with fewer than 3 knots
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        if xs.len() != ys.len() {
            return Err(InterpolationError::InvalidInput(format!(
                "xs and ys must have same length: got {} and {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 3 {
            return Err(InterpolationError::InsufficientData {
                got: xs.len(),
                need: 3,
            });
        }
        for w in xs.windows(2) {
            if w[1] <= w[0] {
                return Err(InterpolationError::InvalidInput(
                    "xs must be strictly increasing".to_string(),
                ));
            }
        }

        let segments = Self::solve_segments(xs, ys);
        Ok(Self {
            xs: xs.to_vec(),
            segments,
        })
    }

    /// Solve the tridiagonal system for the knot second derivatives and
    /// convert them to per-segment polynomial coefficients.
    fn solve_segments(xs: &[T], ys: &[T]) -> Vec<Segment<T>> {
        let n = xs.len();
        let two = T::from(2.0).unwrap();
        let six = T::from(6.0).unwrap();

        let h: Vec<T> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let interior = n - 2;

        // Tridiagonal system for the interior second derivatives m[1..n-1]:
        //   h[k]*m[k] + 2*(h[k]+h[k+1])*m[k+1] + h[k+1]*m[k+2] = rhs[k]
        // with m[0] = m[n-1] = 0 (natural boundary). The sub-diagonal term of
        // the first row and the super-diagonal term of the last row multiply
        // the boundary zeros, so the Thomas sweep below needs no special
        // cases.
        let mut c_prime: Vec<T> = Vec::with_capacity(interior);
        let mut d_prime: Vec<T> = Vec::with_capacity(interior);
        for k in 0..interior {
            let diag = two * (h[k] + h[k + 1]);
            let rhs =
                six * ((ys[k + 2] - ys[k + 1]) / h[k + 1] - (ys[k + 1] - ys[k]) / h[k]);
            if k == 0 {
                c_prime.push(h[1] / diag);
                d_prime.push(rhs / diag);
            } else {
                let denom = diag - h[k] * c_prime[k - 1];
                c_prime.push(h[k + 1] / denom);
                d_prime.push((rhs - h[k] * d_prime[k - 1]) / denom);
            }
        }

        let mut m = vec![T::zero(); n];
        m[interior] = d_prime[interior - 1];
        for k in (0..interior - 1).rev() {
            m[k + 1] = d_prime[k] - c_prime[k] * m[k + 2];
        }

        (0..n - 1)
            .map(|i| Segment {
                a: ys[i],
                b: (ys[i + 1] - ys[i]) / h[i] - h[i] * (two * m[i] + m[i + 1]) / six,
                c: m[i] / two,
                d: (m[i + 1] - m[i]) / (six * h[i]),
            })
            .collect()
    }

    /// Index of the segment containing `x`, clamped to `[0, n-2]`.
    #[inline]
    fn segment_index(&self, x: T) -> usize {
        let pos = self.xs.partition_point(|&xi| xi <= x);
        pos.saturating_sub(1).min(self.xs.len() - 2)
    }

    fn check_domain(&self, x: T) -> Result<(), InterpolationError> {
        let (min, max) = self.domain();
        if x < min || x > max {
            return Err(InterpolationError::OutOfBounds {
                x: x.to_f64().unwrap_or(f64::NAN),
                min: min.to_f64().unwrap_or(f64::NAN),
                max: max.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(())
    }

    /// Analytic first derivative of the spline at `x`.
    ///
    /// # Errors
    ///
    /// `InterpolationError::OutOfBounds` if `x` lies outside the domain.
    pub fn derivative(&self, x: T) -> Result<T, InterpolationError> {
        self.check_domain(x)?;
        let i = self.segment_index(x);
        let s = &self.segments[i];
        let dx = x - self.xs[i];
        let two = T::from(2.0).unwrap();
        let three = T::from(3.0).unwrap();
        Ok(s.b + two * s.c * dx + three * s.d * dx * dx)
    }

    /// The knot abscissae.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
    }
}

impl<T: Float> Interpolator<T> for CubicSplineInterpolator<T> {
    fn interpolate(&self, x: T) -> Result<T, InterpolationError> {
        self.check_domain(x)?;
        let i = self.segment_index(x);
        let s = &self.segments[i];
        let dx = x - self.xs[i];
        Ok(s.a + dx * (s.b + dx * (s.c + dx * s.d)))
    }

    #[inline]
    fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quadratic_spline() -> CubicSplineInterpolator<f64> {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|x| x * x).collect();
        CubicSplineInterpolator::new(&xs, &ys).unwrap()
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let result = CubicSplineInterpolator::new(&[0.0, 1.0, 2.0], &[0.0, 1.0]);
        assert!(matches!(
            result,
            Err(InterpolationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_too_few_points() {
        let result = CubicSplineInterpolator::new(&[0.0, 1.0], &[0.0, 1.0]);
        assert_eq!(
            result.unwrap_err(),
            InterpolationError::InsufficientData { got: 2, need: 3 }
        );
    }

    #[test]
    fn test_rejects_non_increasing_knots() {
        let result =
            CubicSplineInterpolator::new(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0]);
        assert!(matches!(
            result,
            Err(InterpolationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_reproduces_knot_values() {
        let spline = quadratic_spline();
        for (x, y) in [(0.0, 0.0), (1.0, 1.0), (2.0, 4.0), (3.0, 9.0), (4.0, 16.0)] {
            assert_relative_eq!(spline.interpolate(x).unwrap(), y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_minimum_knot_count() {
        // One interior point exercises the degenerate 1x1 tridiagonal solve.
        let spline =
            CubicSplineInterpolator::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();
        assert_relative_eq!(spline.interpolate(1.0).unwrap(), 1.0, epsilon = 1e-12);
        assert!(spline.interpolate(0.5).unwrap() > 0.0);
    }

    #[test]
    fn test_linear_data_stays_linear() {
        let xs = [0.0, 0.5, 1.5, 2.0, 3.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        let spline = CubicSplineInterpolator::new(&xs, &ys).unwrap();

        for x in [0.25, 0.75, 1.0, 1.75, 2.5] {
            assert_relative_eq!(spline.interpolate(x).unwrap(), 2.0 * x + 1.0, epsilon = 1e-10);
            assert_relative_eq!(spline.derivative(x).unwrap(), 2.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_out_of_bounds() {
        let spline = quadratic_spline();
        assert!(matches!(
            spline.interpolate(-0.1),
            Err(InterpolationError::OutOfBounds { .. })
        ));
        assert!(matches!(
            spline.derivative(4.1),
            Err(InterpolationError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_domain_endpoints_are_valid() {
        let spline = quadratic_spline();
        assert!(spline.interpolate(0.0).is_ok());
        assert!(spline.interpolate(4.0).is_ok());
        assert_eq!(spline.domain(), (0.0, 4.0));
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let spline = quadratic_spline();
        let h = 1e-6;
        for x in [0.3, 1.1, 1.9, 2.5, 3.7] {
            let fd = (spline.interpolate(x + h).unwrap()
                - spline.interpolate(x - h).unwrap())
                / (2.0 * h);
            assert_relative_eq!(spline.derivative(x).unwrap(), fd, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_first_derivative_continuous_at_knots() {
        let spline = quadratic_spline();
        let h = 1e-9;
        for knot in [1.0, 2.0, 3.0] {
            let left = spline.derivative(knot - h).unwrap();
            let right = spline.derivative(knot + h).unwrap();
            assert_relative_eq!(left, right, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_natural_boundary_curvature_vanishes() {
        let spline = quadratic_spline();
        let h = 1e-3;
        let y0 = spline.interpolate(0.0).unwrap();
        let y1 = spline.interpolate(h).unwrap();
        let y2 = spline.interpolate(2.0 * h).unwrap();
        let second = (y2 - 2.0 * y1 + y0) / (h * h);
        assert!(second.abs() < 0.1, "boundary curvature {}", second);
    }
}
