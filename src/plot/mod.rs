//! Static chart rendering (SVG files).
//!
//! One trend chart per indicator plus the correlation heatmap. The drawing
//! functions are backend-generic so the terminal viewer reuses them.

use std::collections::HashSet;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::info;

use crate::domain::{AnalysisConfig, Indicator, TidyTable};
use crate::error::AppError;
use crate::math::CorrelationMatrix;

pub mod heatmap;
pub mod lines;
pub mod palette;

pub use heatmap::{HEATMAP_TITLE, draw_heatmap};
pub use lines::{ChartTheme, LineChartData, draw_line_chart, line_chart_data};

const TREND_SIZE: (u32, u32) = (700, 400);
const HEATMAP_SIZE: (u32, u32) = (600, 500);

/// File name for an indicator's trend chart.
pub fn trend_file_name(indicator: Indicator) -> String {
    format!("{}_trends.svg", indicator.display_name().to_lowercase())
}

pub const HEATMAP_FILE: &str = "correlation_heatmap.svg";

/// Render one indicator's trend chart to an SVG file.
pub fn render_indicator_chart(
    table: &TidyTable,
    indicator: Indicator,
    year_span: &str,
    path: &Path,
) -> Result<(), AppError> {
    let data = line_chart_data(table, indicator, year_span, &HashSet::new());
    let root = SVGBackend::new(path, TREND_SIZE).into_drawing_area();
    draw_line_chart(&root, &data, &ChartTheme::file())
        .map_err(|e| AppError::data(format!("Failed to render chart '{}': {e}", path.display())))
}

/// Render the correlation heatmap to an SVG file.
pub fn render_heatmap(matrix: &CorrelationMatrix, path: &Path) -> Result<(), AppError> {
    let root = SVGBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    draw_heatmap(&root, matrix)
        .map_err(|e| AppError::data(format!("Failed to render heatmap '{}': {e}", path.display())))
}

/// Render every static chart into `config.chart_dir` and return the paths.
pub fn render_static_charts(
    table: &TidyTable,
    matrix: &CorrelationMatrix,
    config: &AnalysisConfig,
) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(&config.chart_dir).map_err(|e| {
        AppError::usage(format!(
            "Failed to create chart directory '{}': {e}",
            config.chart_dir.display()
        ))
    })?;

    let span = config.year_span_label();
    let mut written = Vec::with_capacity(Indicator::ALL.len() + 1);
    for indicator in Indicator::ALL {
        let path = config.chart_dir.join(trend_file_name(indicator));
        render_indicator_chart(table, indicator, &span, &path)?;
        info!(path = %path.display(), "rendered {} chart", indicator.display_name());
        written.push(path);
    }

    let path = config.chart_dir.join(HEATMAP_FILE);
    render_heatmap(matrix, &path)?;
    info!(path = %path.display(), "rendered correlation heatmap");
    written.push(path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_file_names() {
        assert_eq!(trend_file_name(Indicator::Inflation), "inflation_trends.svg");
        assert_eq!(trend_file_name(Indicator::Gdp), "gdp_trends.svg");
    }

    #[test]
    fn renders_all_charts_for_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            chart_dir: dir.path().join("charts"),
            ..AnalysisConfig::default()
        };
        let table = TidyTable::empty();
        let matrix = CorrelationMatrix::from_table(&table);

        let written = render_static_charts(&table, &matrix, &config).unwrap();
        assert_eq!(written.len(), 4);
        for path in &written {
            let body = std::fs::read_to_string(path).unwrap();
            assert!(body.contains("<svg"), "{}", path.display());
        }
    }
}
