//! Pricing errors.

use g2cap_core::market_data::MarketDataError;
use g2cap_core::types::SolverError;
use thiserror::Error;

use crate::instruments::InstrumentError;

/// Errors surfaced by the pricing layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// The instrument is not in a priceable state.
    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    /// A curve query failed.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    /// Implied-volatility inversion did not converge.
    #[error("implied volatility solve failed: {0}")]
    Solver(#[from] SolverError),
}
