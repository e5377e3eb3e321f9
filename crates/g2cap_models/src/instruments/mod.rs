//! Interest-rate cap instruments.

mod cap;
mod caplet;
mod error;

pub use cap::{atm_swap_rate, standard_cap_schedule, Cap};
pub use caplet::Caplet;
pub use error::InstrumentError;
