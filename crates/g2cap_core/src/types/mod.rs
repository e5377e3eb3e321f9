//! Shared foundation types.

mod error;

pub use error::{InterpolationError, SolverError};
