//! Statistics over the tidy table.

pub mod correlation;

pub use correlation::*;
