//! Console reporting: data preview, country list, correlation grid, run summary.

pub mod format;

pub use format::*;
