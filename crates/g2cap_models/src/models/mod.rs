//! Short-rate models.

pub mod g2pp;

pub use g2pp::G2Parameters;
