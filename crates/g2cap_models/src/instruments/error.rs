//! Instrument construction and state errors.

use g2cap_core::market_data::MarketDataError;
use thiserror::Error;

/// Errors from instrument construction and state transitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstrumentError {
    /// The accrual period is empty or starts before today.
    #[error("invalid accrual period: reset {reset}, payment {payment}")]
    InvalidAccrual {
        /// Reset (expiry) date in year fractions.
        reset: f64,
        /// Payment date in year fractions.
        payment: f64,
    },

    /// Discount factors were attached twice.
    #[error("discount factors already attached")]
    DiscountsAlreadySet,

    /// A pricing operation needs discount factors that were never attached.
    #[error("discount factors not attached")]
    DiscountsNotSet,

    /// A cap needs at least two payment dates to form one caplet.
    #[error("payment schedule has {got} dates, need at least 2")]
    EmptySchedule {
        /// Number of dates supplied.
        got: usize,
    },

    /// Payment dates must be strictly increasing.
    #[error("payment schedule not strictly increasing at index {index}")]
    NonIncreasingSchedule {
        /// Index of the first offending date.
        index: usize,
    },

    /// The market price was set twice.
    #[error("market price already set")]
    PriceAlreadySet,

    /// A curve query failed while attaching discount factors.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}
