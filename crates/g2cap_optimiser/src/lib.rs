//! Calibration of the G2++ model to market cap prices.
//!
//! The pipeline has three pieces:
//! - [`objective`]: the relative sum-of-squares pricing error over a cap
//!   set.
//! - [`annealing`]: a single seeded simulated-annealing trial over bounded
//!   parameter space.
//! - [`calibration`]: the multi-round meta-loop that launches batches of
//!   trials, keeps the ones beating the score threshold, narrows the search
//!   bounds around the survivors, and tightens the threshold until at most a
//!   handful of parameter sets remain.
//!
//! With the `parallel` feature (default) the trials of a round run on a
//! rayon pool; per-trial seeds keep the results identical to the sequential
//! build.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod annealing;
pub mod calibration;
pub mod objective;

mod error;

pub use error::CalibrationError;
