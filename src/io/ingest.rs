//! Read a tidy CSV written by [`write_tidy_csv`](crate::io::write_tidy_csv).
//!
//! This lets `report` re-render charts and correlations from a saved run
//! without touching the network.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{COUNTRY_COLUMN, Indicator, Observation, TidyTable, YEAR_COLUMN};
use crate::error::AppError;

/// Load a tidy CSV back into a table.
pub fn read_tidy_csv(path: &Path) -> Result<TidyTable, AppError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| AppError::usage(format!("Failed to open data CSV '{}': {e}", path.display())))?;

    let headers = reader
        .headers()
        .map_err(|e| AppError::usage(format!("Failed to read data CSV header: {e}")))?
        .clone();
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    let country_idx = column_index(&header_map, COUNTRY_COLUMN)?;
    let year_idx = column_index(&header_map, YEAR_COLUMN)?;
    let mut indicator_idx = Vec::with_capacity(Indicator::ALL.len());
    for indicator in Indicator::ALL {
        indicator_idx.push((indicator, column_index(&header_map, indicator.column_label())?));
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        // Line 1 is the header.
        let line = i + 2;
        let record = record.map_err(|e| AppError::usage(format!("Failed to read data CSV line {line}: {e}")))?;

        let country = get(&record, country_idx)
            .ok_or_else(|| AppError::usage(format!("Line {line}: missing `{COUNTRY_COLUMN}`.")))?;
        let year = get(&record, year_idx)
            .ok_or_else(|| AppError::usage(format!("Line {line}: missing `{YEAR_COLUMN}`.")))
            .and_then(|s| parse_year_cell(s).map_err(|e| AppError::usage(format!("Line {line}: {e}"))))?;

        let mut obs = Observation::new(country, year);
        for &(indicator, idx) in &indicator_idx {
            let value = match get(&record, idx) {
                None => None,
                Some(s) => Some(parse_value(s).map_err(|e| AppError::usage(format!("Line {line}: {e}")))?),
            };
            obs.set_value(indicator, value);
        }
        rows.push(obs);
    }

    TidyTable::new(rows)
}

fn column_index(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(name)
        .copied()
        .ok_or_else(|| AppError::usage(format!("Missing required column: `{name}`")))
}

fn get(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_year_cell(s: &str) -> Result<NaiveDate, String> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    crate::clean::parse_year(s).map_err(|_| format!("Invalid year '{s}'. Expected YYYY-MM-DD or YYYY."))
}

fn parse_value(s: &str) -> Result<f64, String> {
    let v = s.parse::<f64>().map_err(|e| format!("Invalid number '{s}': {e}"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite number '{s}'."))
    }
}
