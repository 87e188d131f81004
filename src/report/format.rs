//! Formatted terminal output.
//!
//! We keep formatting code in one place so the pipeline code stays free of
//! layout details and output changes are localized.

use std::path::PathBuf;

use crate::domain::{COUNTRY_COLUMN, Indicator, Observation, TidyTable, YEAR_COLUMN};
use crate::math::CorrelationMatrix;

const COUNTRY_WIDTH: usize = 20;
const YEAR_WIDTH: usize = 10;
const VALUE_WIDTH: usize = 18;

/// Counts and file paths describing a finished run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub raw_rows: usize,
    pub tidy_rows: usize,
    pub countries: usize,
    pub files: Vec<PathBuf>,
}

/// First `n` rows as a fixed-width table, nulls shown as `NaN`.
pub fn format_preview(table: &TidyTable, n: usize) -> String {
    let mut out = String::new();
    out.push_str("Data sample:\n");

    let mut header = format!("{:<COUNTRY_WIDTH$} {:<YEAR_WIDTH$}", COUNTRY_COLUMN, YEAR_COLUMN);
    for ind in Indicator::ALL {
        header.push_str(&format!(" {:>VALUE_WIDTH$}", ind.column_label()));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    let rows = table.head(n);
    if rows.is_empty() {
        out.push_str("(no rows)\n");
        return out;
    }
    for row in rows {
        out.push_str(format_row(row).trim_end());
        out.push('\n');
    }
    out
}

fn format_row(row: &Observation) -> String {
    let mut line = format!(
        "{:<COUNTRY_WIDTH$} {:<YEAR_WIDTH$}",
        truncate(&row.country, COUNTRY_WIDTH),
        row.year.format("%Y-%m-%d").to_string()
    );
    for ind in Indicator::ALL {
        line.push_str(&format!(" {:>VALUE_WIDTH$}", fmt_value(row.value(ind))));
    }
    line
}

/// `Available countries: [Brazil, China]`
pub fn format_countries(table: &TidyTable) -> String {
    format!("Available countries: [{}]", table.countries().join(", "))
}

/// Labelled correlation grid.
pub fn format_correlation(matrix: &CorrelationMatrix) -> String {
    let mut out = String::new();
    out.push_str("Correlation matrix:\n");

    let mut header = format!("{:<VALUE_WIDTH$}", "");
    for label in matrix.labels() {
        header.push_str(&format!(" {:>VALUE_WIDTH$}", label.column_label()));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for (i, label) in matrix.labels().iter().enumerate() {
        let mut line = format!("{:<VALUE_WIDTH$}", label.column_label());
        for j in 0..matrix.dim() {
            line.push_str(&format!(" {:>VALUE_WIDTH$}", fmt_coef(matrix.at(i, j))));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str("=== macro-report ===\n");
    out.push_str(&format!(
        "Rows: raw={} | tidy={} | countries={}\n",
        summary.raw_rows, summary.tidy_rows, summary.countries
    ));
    for path in &summary.files {
        out.push_str(&format!("Saved '{}'\n", path.display()));
    }
    out
}

fn fmt_value(v: Option<f64>) -> String {
    match v {
        None => "NaN".to_string(),
        Some(v) if v.abs() >= 1e7 => format!("{v:.6e}"),
        Some(v) => format!("{v:.6}"),
    }
}

fn fmt_coef(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.6}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
