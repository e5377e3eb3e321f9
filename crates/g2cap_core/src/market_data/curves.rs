//! Zero-coupon yield curve over a discrete zero-yield term structure.

use crate::math::interpolators::{CubicSplineInterpolator, Interpolator};

use super::MarketDataError;

/// Immutable zero-coupon yield curve.
///
/// Built once from annualized zero yields quoted **in percent** on a uniform
/// tenor grid (first pillar at `step`, e.g. quarterly `0.25, 0.50, ...`).
/// Yields are converted to decimals and interpolated with a natural cubic
/// spline over maturity; all queries are read-only afterwards.
///
/// Outside the pillar grid the yield is continued linearly with the boundary
/// slope of the spline (the natural-boundary behavior). Cap strips routinely
/// extend past the last pillar, but callers must not rely on the accuracy of
/// long extrapolation.
///
/// # Example
///
/// ```
/// use g2cap_core::market_data::ZeroCurve;
///
/// // Flat 5% quarterly curve out to 2 years.
/// let curve = ZeroCurve::from_percent_yields(&[5.0; 8], 0.25).unwrap();
///
/// let df = curve.discount_factor(1.0).unwrap();
/// assert!((df - (-0.05_f64).exp()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ZeroCurve {
    spline: CubicSplineInterpolator<f64>,
    t_min: f64,
    t_max: f64,
}

impl ZeroCurve {
    /// Build a curve from percent zero yields at uniform `step` spacing.
    ///
    /// The i-th yield is quoted for maturity `(i + 1) * step`.
    ///
    /// # Errors
    ///
    /// - `MarketDataError::InvalidMaturity` if `step <= 0`
    /// - `MarketDataError::InsufficientData` with fewer than 3 pillars
    pub fn from_percent_yields(yields: &[f64], step: f64) -> Result<Self, MarketDataError> {
        if step <= 0.0 || !step.is_finite() {
            return Err(MarketDataError::InvalidMaturity { t: step });
        }
        if yields.len() < 3 {
            return Err(MarketDataError::InsufficientData {
                got: yields.len(),
                need: 3,
            });
        }

        let tenors: Vec<f64> = (1..=yields.len()).map(|i| i as f64 * step).collect();
        let decimals: Vec<f64> = yields.iter().map(|y| y / 100.0).collect();
        let spline = CubicSplineInterpolator::new(&tenors, &decimals)?;
        let (t_min, t_max) = spline.domain();

        Ok(Self {
            spline,
            t_min,
            t_max,
        })
    }

    /// Interpolated zero yield (decimal) at `t >= 0`, with linear
    /// continuation outside the pillar grid.
    fn yield_at(&self, t: f64) -> f64 {
        if t < self.t_min {
            self.edge_continuation(self.t_min, t)
        } else if t > self.t_max {
            self.edge_continuation(self.t_max, t)
        } else {
            self.interpolated(t)
        }
    }

    /// First derivative of the zero yield with respect to maturity.
    fn yield_slope(&self, t: f64) -> f64 {
        let clamped = t.clamp(self.t_min, self.t_max);
        // In-domain evaluation at a clamped point cannot be out of bounds.
        self.spline
            .derivative(clamped)
            .unwrap_or_else(|_| unreachable!("clamped to spline domain"))
    }

    fn interpolated(&self, t: f64) -> f64 {
        self.spline
            .interpolate(t)
            .unwrap_or_else(|_| unreachable!("checked against spline domain"))
    }

    fn edge_continuation(&self, edge: f64, t: f64) -> f64 {
        self.interpolated(edge) + self.yield_slope(edge) * (t - edge)
    }

    /// Discount factor `P(0, t) = exp(-y(t) * t)`.
    ///
    /// `P(0, 0) == 1` exactly; strictly decreasing in `t` for positive
    /// yields.
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` for `t < 0`.
    pub fn discount_factor(&self, t: f64) -> Result<f64, MarketDataError> {
        if t < 0.0 {
            return Err(MarketDataError::InvalidMaturity { t });
        }
        if t == 0.0 {
            return Ok(1.0);
        }
        Ok((-self.yield_at(t) * t).exp())
    }

    /// Instantaneous forward rate `f(0, t) = d[y(t) * t]/dt = y(t) + t * y'(t)`.
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` for `t < 0`.
    pub fn instantaneous_forward(&self, t: f64) -> Result<f64, MarketDataError> {
        if t < 0.0 {
            return Err(MarketDataError::InvalidMaturity { t });
        }
        Ok(self.yield_at(t) + t * self.yield_slope(t))
    }

    /// Interpolated zero yield (decimal) at maturity `t`.
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` for `t < 0`.
    pub fn zero_rate(&self, t: f64) -> Result<f64, MarketDataError> {
        if t < 0.0 {
            return Err(MarketDataError::InvalidMaturity { t });
        }
        Ok(self.yield_at(t))
    }

    /// The pillar maturity range `(t_min, t_max)` covered without
    /// extrapolation.
    #[inline]
    pub fn pillar_range(&self) -> (f64, f64) {
        (self.t_min, self.t_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn flat_curve(rate_percent: f64) -> ZeroCurve {
        ZeroCurve::from_percent_yields(&[rate_percent; 30], 0.25).unwrap()
    }

    /// The reference quarterly zero-yield table (percent).
    fn humped_curve() -> ZeroCurve {
        let yields = [
            4.840355907,
            4.745692608,
            4.776552898,
            4.852996706,
            4.944066306,
            5.036961092,
            5.126129493,
            5.209143662,
            5.285021281,
            5.353489664,
            5.414638913,
            5.468747505,
        ];
        ZeroCurve::from_percent_yields(&yields, 0.25).unwrap()
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(matches!(
            ZeroCurve::from_percent_yields(&[5.0, 5.0], 0.25),
            Err(MarketDataError::InsufficientData { got: 2, need: 3 })
        ));
        assert!(matches!(
            ZeroCurve::from_percent_yields(&[5.0; 10], 0.0),
            Err(MarketDataError::InvalidMaturity { .. })
        ));
        assert!(matches!(
            ZeroCurve::from_percent_yields(&[5.0; 10], -0.25),
            Err(MarketDataError::InvalidMaturity { .. })
        ));
    }

    #[test]
    fn test_discount_at_zero_is_one() {
        assert_eq!(flat_curve(5.0).discount_factor(0.0).unwrap(), 1.0);
        assert_eq!(humped_curve().discount_factor(0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_negative_maturity_rejected() {
        let curve = flat_curve(5.0);
        assert!(curve.discount_factor(-0.5).is_err());
        assert!(curve.instantaneous_forward(-0.5).is_err());
        assert!(curve.zero_rate(-0.5).is_err());
    }

    #[test]
    fn test_flat_curve_discounts_exactly() {
        let curve = flat_curve(5.0);
        for t in [0.25, 0.5, 1.0, 2.0, 5.0, 7.5] {
            assert_relative_eq!(
                curve.discount_factor(t).unwrap(),
                (-0.05 * t).exp(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_percent_conversion() {
        let curve = flat_curve(5.0);
        assert_relative_eq!(curve.zero_rate(1.0).unwrap(), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_discount_strictly_decreasing() {
        let curve = humped_curve();
        let mut prev = curve.discount_factor(0.0).unwrap();
        for i in 1..=48 {
            let t = i as f64 * 0.125;
            let df = curve.discount_factor(t).unwrap();
            assert!(df > 0.0, "df({}) = {}", t, df);
            assert!(df < prev, "df not decreasing at t = {}", t);
            prev = df;
        }
    }

    #[test]
    fn test_forward_equals_rate_on_flat_curve() {
        let curve = flat_curve(5.0);
        for t in [0.5, 1.0, 3.0, 6.0] {
            assert_relative_eq!(
                curve.instantaneous_forward(t).unwrap(),
                0.05,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_forward_matches_discount_derivative() {
        // f(0,t) = -d ln P(0,t) / dt
        let curve = humped_curve();
        let h = 1e-6;
        for t in [0.5, 1.0, 2.0, 2.5] {
            let fd = -(curve.discount_factor(t + h).unwrap().ln()
                - curve.discount_factor(t - h).unwrap().ln())
                / (2.0 * h);
            assert_relative_eq!(
                curve.instantaneous_forward(t).unwrap(),
                fd,
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn test_extrapolation_is_finite_and_continuous() {
        let curve = humped_curve();
        let (_, t_max) = curve.pillar_range();

        let at_edge = curve.zero_rate(t_max).unwrap();
        let just_past = curve.zero_rate(t_max + 1e-6).unwrap();
        assert_relative_eq!(at_edge, just_past, epsilon = 1e-6);

        // Long extrapolation stays finite and keeps discounts in (0, 1).
        let df_20y = curve.discount_factor(20.0).unwrap();
        assert!(df_20y > 0.0 && df_20y < 1.0);

        // Short end below the first pillar.
        let df_short = curve.discount_factor(0.1).unwrap();
        assert!(df_short > 0.0 && df_short < 1.0);
    }

    proptest! {
        #[test]
        fn prop_positive_flat_rates_discount_monotonically(rate in 0.1..12.0f64) {
            let curve = ZeroCurve::from_percent_yields(&[rate; 30], 0.25).unwrap();
            let mut prev = 1.0;
            for i in 1..=40 {
                let t = i as f64 * 0.25;
                let df = curve.discount_factor(t).unwrap();
                prop_assert!(0.0 < df && df < prev, "df({}) = {}", t, df);
                prev = df;
            }
        }
    }
}
