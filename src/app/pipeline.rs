//! Shared run logic used by the `run`, `tui` and `report` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> clean -> correlate -> present -> persist
//!
//! The commands then differ only in where the table comes from.

use std::path::PathBuf;

use tracing::info;

use crate::clean::clean;
use crate::data::ObservationSource;
use crate::domain::{AnalysisConfig, TidyTable};
use crate::error::AppError;
use crate::math::CorrelationMatrix;
use crate::report::{RunSummary, format_correlation, format_countries, format_preview};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub raw_rows: usize,
    pub table: TidyTable,
    pub correlation: CorrelationMatrix,
}

impl RunOutput {
    pub fn summary(&self, files: Vec<PathBuf>) -> RunSummary {
        RunSummary {
            raw_rows: self.raw_rows,
            tidy_rows: self.table.len(),
            countries: self.table.countries().len(),
            files,
        }
    }
}

/// Fetch raw rows from `source`, clean them, and compute correlations.
pub fn run_analysis(config: &AnalysisConfig, source: &dyn ObservationSource) -> Result<RunOutput, AppError> {
    info!(
        countries = %config.countries.join(","),
        start = config.start_year,
        end = config.end_year,
        "Downloading data from World Bank..."
    );
    let raw = source.fetch(config)?;
    info!(rows = raw.len(), "download complete");

    let table = clean(&raw)?;
    info!(rows = table.len(), countries = table.countries().len(), "cleaned and sorted data");

    Ok(analyze_table(raw.len(), table))
}

/// Compute correlations for an already-clean table.
pub fn analyze_table(raw_rows: usize, table: TidyTable) -> RunOutput {
    let correlation = CorrelationMatrix::from_table(&table);
    RunOutput {
        raw_rows,
        table,
        correlation,
    }
}

/// Print the console report, render charts, and open the viewer if asked.
///
/// Returns the chart files written.
pub fn present(run: &RunOutput, config: &AnalysisConfig) -> Result<Vec<PathBuf>, AppError> {
    println!("{}", format_preview(&run.table, config.preview_rows));
    println!("{}", format_countries(&run.table));
    println!();
    println!("{}", format_correlation(&run.correlation));

    let charts = if config.charts {
        crate::plot::render_static_charts(&run.table, &run.correlation, config)?
    } else {
        Vec::new()
    };

    if config.interactive {
        crate::tui::run(&run.table, &run.correlation, &config.year_span_label())?;
    }

    Ok(charts)
}

/// Write the tidy table and the correlation matrix.
pub fn persist(run: &RunOutput, config: &AnalysisConfig) -> Result<Vec<PathBuf>, AppError> {
    crate::io::write_tidy_csv(&config.data_csv, &run.table)?;
    crate::io::write_correlation_csv(&config.corr_csv, &run.correlation)?;
    Ok(vec![config.data_csv.clone(), config.corr_csv.clone()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Indicator, RawObservation};

    fn raw(country: &str, period: &str, indicator: Indicator, value: Option<f64>) -> RawObservation {
        RawObservation {
            country: country.to_string(),
            country_code: country.to_string(),
            period: period.to_string(),
            indicator,
            value,
        }
    }

    #[test]
    fn run_analysis_from_fixed_rows() {
        let rows = vec![
            raw("US", "2000", Indicator::Inflation, Some(2.0)),
            raw("US", "2001", Indicator::Inflation, Some(3.0)),
            raw("DE", "2001", Indicator::Inflation, Some(1.5)),
            raw("US", "2000", Indicator::Gdp, Some(10.0)),
            raw("US", "2001", Indicator::Gdp, Some(11.0)),
        ];
        let run = run_analysis(&AnalysisConfig::default(), &rows).unwrap();

        assert_eq!(run.raw_rows, 5);
        assert_eq!(run.table.len(), 3);
        assert!((run.correlation.get(Indicator::Inflation, Indicator::Gdp) - 1.0).abs() < 1e-12);
        assert!(run.correlation.get(Indicator::Unemployment, Indicator::Unemployment).is_nan());

        let summary = run.summary(Vec::new());
        assert_eq!(summary.tidy_rows, 3);
        assert_eq!(summary.countries, 2);
    }

    #[test]
    fn persist_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            data_csv: dir.path().join("data.csv"),
            corr_csv: dir.path().join("corr.csv"),
            ..AnalysisConfig::default()
        };
        let run = analyze_table(0, TidyTable::empty());

        let files = persist(&run, &config).unwrap();
        assert_eq!(files.len(), 2);
        assert!(config.data_csv.exists());
        assert!(config.corr_csv.exists());
    }
}
