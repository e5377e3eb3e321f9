//! Black-76 caplet and cap pricing with implied-volatility inversion.

use g2cap_core::market_data::ZeroCurve;
use g2cap_core::math::solvers::{BisectionSolver, SolverConfig};

use crate::instruments::{Cap, Caplet};
use crate::PricingError;

use super::distributions::norm_cdf;

/// Bracket used for implied-volatility inversion.
const VOL_LO: f64 = 1e-4;
const VOL_HI: f64 = 2.0;

/// Black-76 price of a caplet at flat volatility `vol`.
///
/// Prices off the simple forward rate
/// `F = (P(0,T) / P(0,S) - 1) / tau` over the accrual `[T, S]`:
/// `N * tau * P(0,S) * (F * Phi(d1) - K * Phi(d2))`.
///
/// Queries the curve directly, so it works before discount factors have
/// been attached to the caplet. A caplet with zero time to reset or
/// non-positive volatility is worth its intrinsic value.
///
/// # Errors
///
/// Curve query failures propagate as `PricingError::MarketData`.
pub fn black_caplet_price(
    curve: &ZeroCurve,
    caplet: &Caplet,
    vol: f64,
) -> Result<f64, PricingError> {
    let p_reset = curve.discount_factor(caplet.reset())?;
    let p_payment = curve.discount_factor(caplet.payment())?;

    let tau = caplet.accrual();
    let forward = (p_reset / p_payment - 1.0) / tau;
    let strike = caplet.strike();
    let scale = caplet.notional() * tau * p_payment;

    let expiry = caplet.reset();
    if expiry <= 0.0 || vol <= 0.0 {
        return Ok(scale * (forward - strike).max(0.0));
    }

    let stdev = vol * expiry.sqrt();
    let d1 = ((forward / strike).ln() + 0.5 * stdev * stdev) / stdev;
    let d2 = d1 - stdev;

    Ok(scale * (forward * norm_cdf(d1) - strike * norm_cdf(d2)))
}

/// Black-76 price of a cap: the sum of its caplet prices at one flat
/// volatility.
///
/// # Errors
///
/// Curve query failures propagate as `PricingError::MarketData`.
pub fn black_cap_price(curve: &ZeroCurve, cap: &Cap, vol: f64) -> Result<f64, PricingError> {
    let mut total = 0.0;
    for caplet in cap.caplets() {
        total += black_caplet_price(curve, caplet, vol)?;
    }
    Ok(total)
}

/// Flat volatility that reprices `target_price` under Black-76.
///
/// Bisects the monotone price-volatility map over `[1e-4, 2.0]`.
///
/// # Errors
///
/// `PricingError::Solver` when the target is outside the bracket's price
/// range or the iteration budget runs out.
pub fn black_cap_implied_vol(
    curve: &ZeroCurve,
    cap: &Cap,
    target_price: f64,
) -> Result<f64, PricingError> {
    // Curve failures would already have surfaced when the target was priced;
    // inside the solve they collapse to a non-bracketing objective.
    let objective =
        |vol: f64| black_cap_price(curve, cap, vol).map_or(f64::NAN, |p| p - target_price);
    let solver = BisectionSolver::new(SolverConfig::new(1e-10, 200));
    Ok(solver.find_root(objective, VOL_LO, VOL_HI)?)
}

/// Flat volatility that reprices a single caplet under Black-76.
///
/// # Errors
///
/// Same failure modes as [`black_cap_implied_vol`].
pub fn black_caplet_implied_vol(
    curve: &ZeroCurve,
    caplet: &Caplet,
    target_price: f64,
) -> Result<f64, PricingError> {
    let objective =
        |vol: f64| black_caplet_price(curve, caplet, vol).map_or(f64::NAN, |p| p - target_price);
    let solver = BisectionSolver::new(SolverConfig::new(1e-10, 200));
    Ok(solver.find_root(objective, VOL_LO, VOL_HI)?)
}
