//! Instruments and pricing models for interest-rate cap calibration.
//!
//! Three layers:
//! - [`instruments`]: caplet and cap definitions with their payment
//!   schedules, attached discount factors, and market quotes.
//! - [`analytical`]: normal distribution helpers and Black-76 pricing with
//!   implied-volatility inversion.
//! - [`models`]: the two-factor additive Gaussian (G2++) short-rate model
//!   with closed-form zero-bond option prices and analytic parameter
//!   gradients.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod analytical;
pub mod instruments;
pub mod models;

mod error;

pub use error::PricingError;
