//! Market data: the zero-coupon yield curve.

mod curves;
mod error;

pub use curves::ZeroCurve;
pub use error::MarketDataError;
