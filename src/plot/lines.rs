//! Per-indicator trend charts: one line per country over the years.
//!
//! Data prep (`LineChartData`) is separate from drawing so the same series
//! can be drawn into an SVG file or into the terminal viewer.

use std::collections::HashSet;

use chrono::Datelike;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::{Indicator, TidyTable};
use crate::plot::palette::series_color;

/// One country's line, split into segments at missing years.
#[derive(Debug, Clone)]
pub struct CountrySeries {
    pub country: String,
    pub color: RGBColor,
    pub segments: Vec<Vec<(f64, f64)>>,
}

/// Everything needed to draw a trend chart.
#[derive(Debug, Clone)]
pub struct LineChartData {
    pub title: String,
    pub y_label: &'static str,
    pub series: Vec<CountrySeries>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

/// Visual knobs that differ between file output and the terminal.
#[derive(Debug, Clone, Copy)]
pub struct ChartTheme {
    pub caption: bool,
    pub font_size: u32,
    pub foreground: RGBColor,
    pub background: Option<RGBColor>,
    pub line_width: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
    pub legend: bool,
    pub margin: u32,
    pub mesh: bool,
}

impl ChartTheme {
    pub fn file() -> Self {
        Self {
            caption: true,
            font_size: 14,
            foreground: BLACK,
            background: Some(WHITE),
            line_width: 2,
            x_label_area: 40,
            y_label_area: 80,
            legend: true,
            margin: 10,
            mesh: true,
        }
    }
}

/// Build chart series for one indicator.
///
/// Countries whose subset is empty, or whose values are all null, get no line.
/// `hidden` countries are left out but keep their colour slot so colours stay
/// stable when toggling.
pub fn line_chart_data(
    table: &TidyTable,
    indicator: Indicator,
    year_span: &str,
    hidden: &HashSet<String>,
) -> LineChartData {
    let mut series = Vec::new();
    for (idx, country) in table.countries().into_iter().enumerate() {
        if hidden.contains(country) {
            continue;
        }
        let subset = table.subset(country);
        if subset.is_empty() {
            continue;
        }

        let mut segments: Vec<Vec<(f64, f64)>> = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        for row in subset {
            match row.value(indicator) {
                Some(v) => current.push((row.year.year() as f64, v)),
                None => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        if segments.is_empty() {
            continue;
        }

        series.push(CountrySeries {
            country: country.to_string(),
            color: series_color(idx),
            segments,
        });
    }

    let x_bounds = table
        .year_range()
        .map(|(a, b)| [a.year() as f64, b.year() as f64])
        .filter(|[a, b]| b > a)
        .unwrap_or_else(|| year_span_bounds(year_span));

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for s in &series {
        for &(_, y) in s.segments.iter().flatten() {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }
    if y_max <= y_min {
        let half = (y_min.abs() * 0.5).max(0.5);
        y_min -= half;
        y_max += half;
    }
    let pad = ((y_max - y_min) * 0.05).max(1e-12);

    LineChartData {
        title: format!("{} Trends ({year_span})", indicator.display_name()),
        y_label: indicator.axis_label(),
        series,
        x_bounds,
        y_bounds: [y_min - pad, y_max + pad],
    }
}

/// `"2000–2024"` → `[2000, 2024]`, falling back to a unit span.
fn year_span_bounds(span: &str) -> [f64; 2] {
    let mut parts = span.split('–').map(|p| p.trim().parse::<f64>());
    match (parts.next(), parts.next()) {
        (Some(Ok(a)), Some(Ok(b))) if b > a => [a, b],
        (Some(Ok(a)), _) => [a - 0.5, a + 0.5],
        _ => [0.0, 1.0],
    }
}

/// Draw a trend chart onto any Plotters drawing area.
pub fn draw_line_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    data: &LineChartData,
    theme: &ChartTheme,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    if let Some(bg) = theme.background {
        root.fill(&bg)?;
    }

    let [x0, x1] = data.x_bounds;
    let [y0, y1] = data.y_bounds;
    let fg = theme.foreground;
    let font = ("sans-serif", theme.font_size);

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(theme.margin)
        .x_label_area_size(theme.x_label_area)
        .y_label_area_size(theme.y_label_area);
    if theme.caption {
        builder.caption(&data.title, ("sans-serif", theme.font_size + 6).into_font().color(&fg));
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    let large = y0.abs().max(y1.abs()) >= 1e6;
    let fmt_y = |v: &f64| if large { format!("{v:.1e}") } else { format!("{v:.1}") };
    let fmt_x = |v: &f64| format!("{v:.0}");

    let mut mesh = chart.configure_mesh();
    if !theme.mesh {
        mesh.disable_x_mesh().disable_y_mesh();
    }
    mesh.x_desc("Year")
        .y_desc(data.y_label)
        .x_labels(8)
        .y_labels(6)
        .x_label_formatter(&fmt_x)
        .y_label_formatter(&fmt_y)
        .label_style(font.into_font().color(&fg))
        .axis_desc_style(font.into_font().color(&fg))
        .axis_style(fg)
        .light_line_style(fg.mix(0.08))
        .bold_line_style(fg.mix(0.2))
        .draw()?;

    let mut labelled = 0usize;
    for s in &data.series {
        let style = s.color.stroke_width(theme.line_width);
        for (i, segment) in s.segments.iter().enumerate() {
            let drawn = chart.draw_series(LineSeries::new(segment.iter().copied(), style))?;
            if i == 0 {
                let color = s.color;
                drawn
                    .label(s.country.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
                labelled += 1;
            }
        }
    }

    if theme.legend && labelled > 0 {
        let mut legend = chart.configure_series_labels();
        legend
            .label_font(font.into_font().color(&fg))
            .border_style(fg)
            .position(SeriesLabelPosition::UpperRight);
        if let Some(bg) = theme.background {
            legend.background_style(bg.mix(0.8));
        }
        legend.draw()?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;
    use chrono::NaiveDate;

    fn row(country: &str, year: i32, inflation: Option<f64>) -> Observation {
        Observation {
            inflation,
            ..Observation::new(country, NaiveDate::from_ymd_opt(year, 1, 1).unwrap())
        }
    }

    fn table() -> TidyTable {
        TidyTable::new(vec![
            row("Brazil", 2000, Some(7.0)),
            row("Brazil", 2001, None),
            row("Brazil", 2002, Some(8.4)),
            row("Brazil", 2003, Some(14.7)),
            row("China", 2000, None),
            row("China", 2001, None),
            row("India", 2000, Some(4.0)),
        ])
        .unwrap()
    }

    #[test]
    fn splits_segments_at_gaps_and_skips_empty_countries() {
        let data = line_chart_data(&table(), Indicator::Inflation, "2000–2024", &HashSet::new());

        assert_eq!(data.title, "Inflation Trends (2000–2024)");
        assert_eq!(data.series.len(), 2);
        let brazil = &data.series[0];
        assert_eq!(brazil.country, "Brazil");
        assert_eq!(brazil.segments, vec![vec![(2000.0, 7.0)], vec![(2002.0, 8.4), (2003.0, 14.7)]]);
        // India keeps its colour slot after the skipped country.
        assert_eq!(data.series[1].country, "India");
        assert_eq!(data.series[1].color, series_color(2));

        assert_eq!(data.x_bounds, [2000.0, 2003.0]);
        assert!(data.y_bounds[0] < 4.0 && data.y_bounds[1] > 14.7);
    }

    #[test]
    fn hidden_countries_are_left_out() {
        let hidden: HashSet<String> = ["Brazil".to_string()].into_iter().collect();
        let data = line_chart_data(&table(), Indicator::Inflation, "2000–2024", &hidden);
        assert_eq!(data.series.len(), 1);
        assert_eq!(data.series[0].country, "India");
    }

    #[test]
    fn empty_table_uses_span_bounds() {
        let data = line_chart_data(&TidyTable::empty(), Indicator::Gdp, "2000–2024", &HashSet::new());
        assert!(data.series.is_empty());
        assert_eq!(data.x_bounds, [2000.0, 2024.0]);
        assert_eq!(data.y_label, "GDP (US$)");
        assert!(data.y_bounds[1] > data.y_bounds[0]);
    }

    #[test]
    fn draws_svg_with_legend() {
        let data = line_chart_data(&table(), Indicator::Inflation, "2000–2024", &HashSet::new());
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (700, 400)).into_drawing_area();
            draw_line_chart(&root, &data, &ChartTheme::file()).unwrap();
        }
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Inflation Trends"));
        assert!(svg.contains("Brazil"));
        assert!(svg.contains("India"));
        assert!(!svg.contains("China"));
    }
}
