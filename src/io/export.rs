//! Export the tidy table and the correlation matrix to CSV.
//!
//! Both files are meant to be easy to consume in spreadsheets or downstream
//! scripts: nulls and undefined coefficients are empty fields, dates are ISO.

use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::domain::{COUNTRY_COLUMN, Indicator, TidyTable, YEAR_COLUMN};
use crate::error::AppError;
use crate::math::CorrelationMatrix;

/// Header of the tidy CSV, in column order.
pub fn tidy_header() -> Vec<&'static str> {
    let mut header = vec![COUNTRY_COLUMN, YEAR_COLUMN];
    header.extend(Indicator::ALL.iter().map(|i| i.column_label()));
    header
}

/// Write the tidy table (no index column).
pub fn write_tidy_csv(path: &Path, table: &TidyTable) -> Result<(), AppError> {
    let mut writer = Writer::from_path(path)
        .map_err(|e| AppError::usage(format!("Failed to create data CSV '{}': {e}", path.display())))?;

    writer
        .write_record(tidy_header())
        .map_err(|e| AppError::usage(format!("Failed to write data CSV header: {e}")))?;

    for row in table.rows() {
        let mut record = vec![row.country.clone(), row.year.format("%Y-%m-%d").to_string()];
        record.extend(Indicator::ALL.iter().map(|&i| fmt_cell(row.value(i))));
        writer
            .write_record(&record)
            .map_err(|e| AppError::usage(format!("Failed to write data CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::usage(format!("Failed to flush data CSV '{}': {e}", path.display())))?;

    info!(path = %path.display(), rows = table.len(), "wrote tidy data");
    Ok(())
}

/// Write the correlation matrix with row labels.
pub fn write_correlation_csv(path: &Path, matrix: &CorrelationMatrix) -> Result<(), AppError> {
    let mut writer = Writer::from_path(path)
        .map_err(|e| AppError::usage(format!("Failed to create correlation CSV '{}': {e}", path.display())))?;

    let mut header = vec![String::new()];
    header.extend(matrix.labels().iter().map(|l| l.column_label().to_string()));
    writer
        .write_record(&header)
        .map_err(|e| AppError::usage(format!("Failed to write correlation CSV header: {e}")))?;

    for (i, label) in matrix.labels().iter().enumerate() {
        let mut record = vec![label.column_label().to_string()];
        for j in 0..matrix.dim() {
            let v = matrix.at(i, j);
            record.push(fmt_cell(if v.is_nan() { None } else { Some(v) }));
        }
        writer
            .write_record(&record)
            .map_err(|e| AppError::usage(format!("Failed to write correlation CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::usage(format!("Failed to flush correlation CSV '{}': {e}", path.display())))?;

    info!(path = %path.display(), "wrote correlation matrix");
    Ok(())
}

/// Whole numbers keep a `.0` (`1.0`, `1000000000000.0`) so readers see a float column.
fn fmt_cell(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.is_finite() && v.fract() == 0.0 => format!("{v:.1}"),
        Some(v) => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;
    use chrono::NaiveDate;

    #[test]
    fn tidy_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let table = TidyTable::new(vec![Observation {
            inflation: Some(2.5),
            gdp: Some(1.0e12),
            ..Observation::new("United States", NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
        }])
        .unwrap();

        write_tidy_csv(&path, &table).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("country,Year,Inflation (%),Unemployment (%),GDP (current US$)")
        );
        assert_eq!(lines.next(), Some("United States,2000-01-01,2.5,,1000000000000.0"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn correlation_csv_has_row_labels_and_blank_nan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corr.csv");
        let columns = vec![
            vec![Some(1.0), Some(2.0), Some(3.0)],
            vec![None, None, None],
            vec![Some(3.0), Some(2.0), Some(1.0)],
        ];
        let matrix = CorrelationMatrix::from_columns(Indicator::ALL.to_vec(), &columns);

        write_correlation_csv(&path, &matrix).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ",Inflation (%),Unemployment (%),GDP (current US$)");
        assert_eq!(lines[1], "Inflation (%),1.0,,-1.0");
        assert_eq!(lines[2], "Unemployment (%),,,");
        assert_eq!(lines[3], "GDP (current US$),-1.0,,1.0");
    }

    #[test]
    fn cells_keep_float_form() {
        assert_eq!(fmt_cell(None), "");
        assert_eq!(fmt_cell(Some(1.0)), "1.0");
        assert_eq!(fmt_cell(Some(-3.0)), "-3.0");
        assert_eq!(fmt_cell(Some(1.0e12)), "1000000000000.0");
        assert_eq!(fmt_cell(Some(2.83)), "2.83");
        assert_eq!(fmt_cell(Some(0.1 + 0.2)), "0.30000000000000004");
    }
}
