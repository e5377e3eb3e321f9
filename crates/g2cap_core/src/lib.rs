//! # g2cap_core: foundation layer for the g2cap calibration workspace
//!
//! This crate provides the numerical plumbing the pricing and calibration
//! layers are built on:
//! - Natural cubic spline interpolation with analytic derivatives
//!   (`math::interpolators`)
//! - Bracketing root finding for implied-volatility inversion
//!   (`math::solvers`)
//! - The zero-coupon yield curve: discount factors and instantaneous
//!   forward rates from a discrete zero-yield term structure
//!   (`market_data`)
//! - Shared error types (`types`)
//!
//! The crate has no dependency on the other g2cap crates and only minimal
//! external dependencies (`num-traits` for generic numerics, `thiserror`
//! for structured errors).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;
