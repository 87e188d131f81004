//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the fixed indicator set (`Indicator`) and run configuration (`AnalysisConfig`)
//! - raw provider rows (`RawObservation`) and tidy rows (`Observation`)
//! - the immutable tidy table (`TidyTable`)

pub mod table;
pub mod types;

pub use table::*;
pub use types::*;
