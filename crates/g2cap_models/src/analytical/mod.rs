//! Analytical pricing: distribution helpers and Black-76.

pub mod black;
pub mod distributions;

pub use black::{
    black_cap_implied_vol, black_cap_price, black_caplet_implied_vol, black_caplet_price,
};
pub use distributions::{norm_cdf, norm_pdf};
