//! Root-finding solvers.
//!
//! The Black implied-volatility inversion runs on [`BisectionSolver`]: the
//! price-to-volatility mapping is monotone, so a plain bracketing method is
//! both sufficient and unconditionally convergent. Non-convergence is
//! reported through [`crate::types::SolverError`] rather than returned as a
//! poisoned number.

mod bisection;
mod config;

pub use bisection::BisectionSolver;
pub use config::SolverConfig;
