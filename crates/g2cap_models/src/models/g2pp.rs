//! Two-factor additive Gaussian short-rate model (G2++).
//!
//! The short rate is `r(t) = x(t) + y(t) + phi(t)` with two correlated
//! Ornstein-Uhlenbeck factors
//!
//! ```text
//! dx = -a x dt + sigma dW1,   dy = -b y dt + eta dW2,
//! dW1 dW2 = rho dt
//! ```
//!
//! and a deterministic shift `phi` fitted to the initial curve. Options on
//! zero-coupon bonds have Black-style closed forms because the forward bond
//! price is lognormal; caplets are scaled zero-bond puts. All parameter
//! gradients here are analytic, obtained by differentiating the forward
//! bond-price variance, so calibration never needs finite differences.

use g2cap_core::market_data::ZeroCurve;

use crate::analytical::{norm_cdf, norm_pdf};
use crate::instruments::{Cap, Caplet};
use crate::PricingError;

/// Below this gap in mean-reversion speeds the variance kernels are
/// evaluated in their collapsed single-speed form.
const DEGENERATE_SPEED_GAP: f64 = 1e-8;

/// G2++ model parameters.
///
/// Valid for `a, sigma, b, eta > 0` and `rho` in `(-1, 1)`; the calibration
/// search bounds enforce the domain, so pricing functions assume it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct G2Parameters {
    /// Mean-reversion speed of the first factor.
    pub a: f64,
    /// Volatility of the first factor.
    pub sigma: f64,
    /// Mean-reversion speed of the second factor.
    pub b: f64,
    /// Volatility of the second factor.
    pub eta: f64,
    /// Instantaneous correlation between the factor drivers.
    pub rho: f64,
}

impl G2Parameters {
    /// Construct from explicit values.
    pub fn new(a: f64, sigma: f64, b: f64, eta: f64, rho: f64) -> Self {
        Self {
            a,
            sigma,
            b,
            eta,
            rho,
        }
    }

    /// The parameter vector in optimizer order `[a, sigma, b, eta, rho]`.
    #[inline]
    pub fn to_array(self) -> [f64; 5] {
        [self.a, self.sigma, self.b, self.eta, self.rho]
    }

    /// The model with the two factors exchanged. Prices are invariant under
    /// this relabelling.
    #[inline]
    pub fn swapped(self) -> Self {
        Self {
            a: self.b,
            sigma: self.eta,
            b: self.a,
            eta: self.sigma,
            rho: self.rho,
        }
    }

    /// The canonical representative of the factor-relabelling pair: the
    /// factor with the smaller `sigma / a` ratio comes first.
    #[inline]
    pub fn canonical(self) -> Self {
        if self.sigma / self.a > self.eta / self.b {
            self.swapped()
        } else {
            self
        }
    }
}

impl From<[f64; 5]> for G2Parameters {
    fn from(x: [f64; 5]) -> Self {
        Self::new(x[0], x[1], x[2], x[3], x[4])
    }
}

/// Single-speed variance kernel
/// `A(x) = (1 - e^{-x tau})^2 (1 - e^{-2 x T}) / (2 x^3)`.
#[inline]
fn kernel(x: f64, tau: f64, expiry: f64) -> f64 {
    let u = 1.0 - (-x * tau).exp();
    let v = 1.0 - (-2.0 * x * expiry).exp();
    u * u * v / (2.0 * x.powi(3))
}

/// Derivative of [`kernel`] with respect to the speed `x`.
#[inline]
fn kernel_dx(x: f64, tau: f64, expiry: f64) -> f64 {
    let e_tau = (-x * tau).exp();
    let e_2t = (-2.0 * x * expiry).exp();
    let u = 1.0 - e_tau;
    let v = 1.0 - e_2t;
    (2.0 * u * tau * e_tau * v + u * u * 2.0 * expiry * e_2t) / (2.0 * x.powi(3))
        - 3.0 * u * u * v / (2.0 * x.powi(4))
}

/// Cross variance kernel
/// `C(a, b) = (1 - e^{-a tau})(1 - e^{-b tau})(1 - e^{-(a+b) T}) / (a b (a+b))`.
#[inline]
fn cross_kernel(a: f64, b: f64, tau: f64, expiry: f64) -> f64 {
    let u_a = 1.0 - (-a * tau).exp();
    let u_b = 1.0 - (-b * tau).exp();
    let w = 1.0 - (-(a + b) * expiry).exp();
    u_a * u_b * w / (a * b * (a + b))
}

/// Derivative of [`cross_kernel`] with respect to its first speed.
#[inline]
fn cross_kernel_da(a: f64, b: f64, tau: f64, expiry: f64) -> f64 {
    let e_a = (-a * tau).exp();
    let u_a = 1.0 - e_a;
    let u_b = 1.0 - (-b * tau).exp();
    let e_ab = (-(a + b) * expiry).exp();
    let w = 1.0 - e_ab;
    let denom = a * b * (a + b);
    let c = u_a * u_b * w / denom;
    (tau * e_a * u_b * w + u_a * u_b * expiry * e_ab) / denom - c * (1.0 / a + 1.0 / (a + b))
}

/// Variance of the log forward bond price `P(expiry, maturity)` seen from
/// today, the quantity entering the Black-style bond-option formulas:
///
/// `Sigma^2 = sigma^2 A(a) + eta^2 A(b) + 2 rho sigma eta C(a, b)`.
///
/// When the speeds are within `1e-8` of each other the cross kernel
/// coincides with the single-speed kernel and the whole expression is
/// evaluated in the collapsed form
/// `(sigma^2 + 2 rho sigma eta + eta^2) A((a + b) / 2)`, avoiding loss of
/// significance between nearly-cancelling terms.
pub fn bond_option_vol_sq(params: &G2Parameters, expiry: f64, maturity: f64) -> f64 {
    let tau = maturity - expiry;
    let G2Parameters {
        a,
        sigma,
        b,
        eta,
        rho,
    } = *params;

    if (a - b).abs() < DEGENERATE_SPEED_GAP {
        let mean_speed = 0.5 * (a + b);
        return (sigma * sigma + 2.0 * rho * sigma * eta + eta * eta)
            * kernel(mean_speed, tau, expiry);
    }

    sigma * sigma * kernel(a, tau, expiry)
        + eta * eta * kernel(b, tau, expiry)
        + 2.0 * rho * sigma * eta * cross_kernel(a, b, tau, expiry)
}

/// [`bond_option_vol_sq`] together with its gradient in optimizer order
/// `[a, sigma, b, eta, rho]`.
fn bond_option_vol_sq_gradient(
    params: &G2Parameters,
    expiry: f64,
    maturity: f64,
) -> (f64, [f64; 5]) {
    let tau = maturity - expiry;
    let G2Parameters {
        a,
        sigma,
        b,
        eta,
        rho,
    } = *params;

    if (a - b).abs() < DEGENERATE_SPEED_GAP {
        let mean_speed = 0.5 * (a + b);
        let combined = sigma * sigma + 2.0 * rho * sigma * eta + eta * eta;
        let k = kernel(mean_speed, tau, expiry);
        let dk_dspeed = combined * kernel_dx(mean_speed, tau, expiry) * 0.5;
        let grad = [
            dk_dspeed,
            (2.0 * sigma + 2.0 * rho * eta) * k,
            dk_dspeed,
            (2.0 * eta + 2.0 * rho * sigma) * k,
            2.0 * sigma * eta * k,
        ];
        return (combined * k, grad);
    }

    let k_a = kernel(a, tau, expiry);
    let k_b = kernel(b, tau, expiry);
    let c = cross_kernel(a, b, tau, expiry);

    let vol_sq = sigma * sigma * k_a + eta * eta * k_b + 2.0 * rho * sigma * eta * c;
    let grad = [
        sigma * sigma * kernel_dx(a, tau, expiry)
            + 2.0 * rho * sigma * eta * cross_kernel_da(a, b, tau, expiry),
        2.0 * sigma * k_a + 2.0 * rho * eta * c,
        eta * eta * kernel_dx(b, tau, expiry)
            + 2.0 * rho * sigma * eta * cross_kernel_da(b, a, tau, expiry),
        2.0 * eta * k_b + 2.0 * rho * sigma * c,
        2.0 * sigma * eta * c,
    ];
    (vol_sq, grad)
}

#[inline]
fn moneyness(strike: f64, p0_expiry: f64, p0_maturity: f64, sig: f64) -> f64 {
    (p0_maturity / (strike * p0_expiry)).ln() / sig + 0.5 * sig
}

/// European call on the zero-coupon bond `P(expiry, maturity)`, struck at
/// `strike`, given today's discount factors to expiry and maturity:
///
/// `ZBC = P(0,S) Phi(h) - K P(0,T) Phi(h - Sigma)`.
pub fn zbc_price(
    params: &G2Parameters,
    expiry: f64,
    maturity: f64,
    strike: f64,
    p0_expiry: f64,
    p0_maturity: f64,
) -> f64 {
    let sig = bond_option_vol_sq(params, expiry, maturity).sqrt();
    if sig <= 0.0 {
        return (p0_maturity - strike * p0_expiry).max(0.0);
    }
    let h = moneyness(strike, p0_expiry, p0_maturity, sig);
    p0_maturity * norm_cdf(h) - strike * p0_expiry * norm_cdf(h - sig)
}

/// European put on the zero-coupon bond `P(expiry, maturity)`:
///
/// `ZBP = K P(0,T) Phi(-h + Sigma) - P(0,S) Phi(-h)`.
///
/// Put-call parity `ZBC - ZBP = P(0,S) - K P(0,T)` holds to floating-point
/// rounding because the normal CDF satisfies `Phi(x) + Phi(-x) == 1`
/// exactly.
pub fn zbp_price(
    params: &G2Parameters,
    expiry: f64,
    maturity: f64,
    strike: f64,
    p0_expiry: f64,
    p0_maturity: f64,
) -> f64 {
    let sig = bond_option_vol_sq(params, expiry, maturity).sqrt();
    if sig <= 0.0 {
        return (strike * p0_expiry - p0_maturity).max(0.0);
    }
    let h = moneyness(strike, p0_expiry, p0_maturity, sig);
    strike * p0_expiry * norm_cdf(-h + sig) - p0_maturity * norm_cdf(-h)
}

/// [`zbp_price`] plus the analytic gradient with respect to
/// `[a, sigma, b, eta, rho]`, written into `grad`.
///
/// The parameters enter only through `Sigma`, and
/// `dZBP/dSigma = P(0,S) phi(h)` (the bond-option vega), so each component
/// is `P(0,S) phi(h) dSigma^2/dtheta / (2 Sigma)`.
pub fn zbp_price_gradient(
    params: &G2Parameters,
    expiry: f64,
    maturity: f64,
    strike: f64,
    p0_expiry: f64,
    p0_maturity: f64,
    grad: &mut [f64; 5],
) -> f64 {
    let (vol_sq, vol_sq_grad) = bond_option_vol_sq_gradient(params, expiry, maturity);
    let sig = vol_sq.sqrt();
    if sig <= 0.0 {
        *grad = [0.0; 5];
        return (strike * p0_expiry - p0_maturity).max(0.0);
    }

    let h = moneyness(strike, p0_expiry, p0_maturity, sig);
    let vega = p0_maturity * norm_pdf(h);
    for (g, dv) in grad.iter_mut().zip(vol_sq_grad) {
        *g = vega * dv / (2.0 * sig);
    }
    strike * p0_expiry * norm_cdf(-h + sig) - p0_maturity * norm_cdf(-h)
}

/// [`zbc_price`] plus its analytic gradient.
///
/// The parity term `P(0,S) - K P(0,T)` carries no parameters, so the call
/// gradient equals the put gradient.
pub fn zbc_price_gradient(
    params: &G2Parameters,
    expiry: f64,
    maturity: f64,
    strike: f64,
    p0_expiry: f64,
    p0_maturity: f64,
    grad: &mut [f64; 5],
) -> f64 {
    let put = zbp_price_gradient(params, expiry, maturity, strike, p0_expiry, p0_maturity, grad);
    put + p0_maturity - strike * p0_expiry
}

/// `1 + K tau`, the factor linking caplet and bond-put quotes.
#[inline]
fn gross_rate(caplet: &Caplet) -> f64 {
    1.0 + caplet.strike() * caplet.accrual()
}

/// Model price of a caplet: a scaled put on the zero-coupon bond spanning
/// the accrual period,
/// `N (1 + K tau) ZBP(T, S, 1 / (1 + K tau))`.
///
/// # Errors
///
/// `PricingError::Instrument` when discount factors were never attached.
pub fn caplet_price(params: &G2Parameters, caplet: &Caplet) -> Result<f64, PricingError> {
    let (p_reset, p_payment) = caplet.discounts()?;
    let gross = gross_rate(caplet);
    Ok(caplet.notional()
        * gross
        * zbp_price(
            params,
            caplet.reset(),
            caplet.payment(),
            1.0 / gross,
            p_reset,
            p_payment,
        ))
}

/// [`caplet_price`] plus the analytic parameter gradient.
///
/// # Errors
///
/// `PricingError::Instrument` when discount factors were never attached.
pub fn caplet_price_gradient(
    params: &G2Parameters,
    caplet: &Caplet,
    grad: &mut [f64; 5],
) -> Result<f64, PricingError> {
    let (p_reset, p_payment) = caplet.discounts()?;
    let gross = gross_rate(caplet);
    let scale = caplet.notional() * gross;
    let put = zbp_price_gradient(
        params,
        caplet.reset(),
        caplet.payment(),
        1.0 / gross,
        p_reset,
        p_payment,
        grad,
    );
    for g in grad.iter_mut() {
        *g *= scale;
    }
    Ok(scale * put)
}

/// Model price of a cap: the sum of its caplet prices.
///
/// # Errors
///
/// `PricingError::Instrument` when any caplet lacks discount factors.
pub fn cap_price(params: &G2Parameters, cap: &Cap) -> Result<f64, PricingError> {
    let mut total = 0.0;
    for caplet in cap.caplets() {
        total += caplet_price(params, caplet)?;
    }
    Ok(total)
}

/// [`cap_price`] plus the elementwise sum of the caplet gradients.
///
/// # Errors
///
/// `PricingError::Instrument` when any caplet lacks discount factors.
pub fn cap_price_gradient(
    params: &G2Parameters,
    cap: &Cap,
    grad: &mut [f64; 5],
) -> Result<f64, PricingError> {
    *grad = [0.0; 5];
    let mut total = 0.0;
    let mut caplet_grad = [0.0; 5];
    for caplet in cap.caplets() {
        total += caplet_price_gradient(params, caplet, &mut caplet_grad)?;
        for (g, cg) in grad.iter_mut().zip(caplet_grad) {
            *g += cg;
        }
    }
    Ok(total)
}

/// The deterministic shift `phi(t)` that fits the model to the initial
/// curve:
///
/// ```text
/// phi(t) = f(0,t) + sigma^2/(2a^2) (1-e^{-at})^2
///                 + eta^2/(2b^2) (1-e^{-bt})^2
///                 + rho sigma eta/(a b) (1-e^{-at})(1-e^{-bt})
/// ```
///
/// # Errors
///
/// Curve query failures propagate as `PricingError::MarketData`.
pub fn shift(curve: &ZeroCurve, params: &G2Parameters, t: f64) -> Result<f64, PricingError> {
    let G2Parameters {
        a,
        sigma,
        b,
        eta,
        rho,
    } = *params;
    let forward = curve.instantaneous_forward(t)?;
    let u_a = 1.0 - (-a * t).exp();
    let u_b = 1.0 - (-b * t).exp();
    Ok(forward
        + sigma * sigma / (2.0 * a * a) * u_a * u_a
        + eta * eta / (2.0 * b * b) * u_b * u_b
        + rho * sigma * eta / (a * b) * u_a * u_b)
}
