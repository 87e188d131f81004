//! Input/output helpers.
//!
//! - tidy table + correlation matrix CSV exports (`export`)
//! - tidy CSV reload for offline reports (`ingest`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
