//! Calibration errors.

use g2cap_models::PricingError;
use thiserror::Error;

/// Errors surfaced while evaluating the calibration objective.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    /// A calibration target has no market price recorded.
    #[error("cap with maturity {maturity_years}y has no market price")]
    UnpricedCap {
        /// Maturity of the offending cap in whole years.
        maturity_years: usize,
    },

    /// Model pricing failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}
