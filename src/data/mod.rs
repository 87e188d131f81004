//! Data sources.
//!
//! The pipeline only needs raw indicator rows; where they come from sits behind
//! [`ObservationSource`] so the rest of the run can be exercised offline.

use crate::domain::{AnalysisConfig, RawObservation};
use crate::error::AppError;

pub mod worldbank;

pub use worldbank::WorldBankClient;

/// Anything that can produce raw indicator rows for a run.
pub trait ObservationSource {
    fn fetch(&self, config: &AnalysisConfig) -> Result<Vec<RawObservation>, AppError>;
}

/// A fixed set of rows, useful for replays and tests.
impl ObservationSource for Vec<RawObservation> {
    fn fetch(&self, _config: &AnalysisConfig) -> Result<Vec<RawObservation>, AppError> {
        Ok(self.clone())
    }
}
