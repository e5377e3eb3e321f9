//! The calibration objective.

use g2cap_models::instruments::Cap;
use g2cap_models::models::g2pp::cap_price;
use g2cap_models::models::G2Parameters;

use crate::CalibrationError;

/// Relative sum-of-squares pricing error over a cap set:
/// `sum_i ((market_i - model_i) / market_i)^2`.
///
/// Pure in `params`; the caps are read-only targets.
///
/// # Errors
///
/// - `CalibrationError::UnpricedCap` when a cap has no market price
/// - model pricing failures propagate as `CalibrationError::Pricing`
pub fn relative_sse(caps: &[Cap], params: &G2Parameters) -> Result<f64, CalibrationError> {
    let mut total = 0.0;
    for cap in caps {
        let market = cap
            .market_price()
            .ok_or(CalibrationError::UnpricedCap {
                maturity_years: cap.maturity_years(),
            })?;
        let model = cap_price(params, cap)?;
        let error = (market - model) / market;
        total += error * error;
    }
    Ok(total)
}
