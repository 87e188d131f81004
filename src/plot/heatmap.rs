//! Annotated correlation heatmap.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::math::CorrelationMatrix;
use crate::plot::palette::coolwarm;

pub const HEATMAP_TITLE: &str = "Correlation Heatmap: Inflation, Unemployment, GDP";

const LEFT_LABELS: i32 = 150;
const TOP: i32 = 50;
const BOTTOM_LABELS: i32 = 60;
const COLORBAR: i32 = 70;

/// Cell annotation, two decimals like the console report's short form.
pub fn annotate(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else {
        format!("{v:.2}")
    }
}

/// Draw the heatmap onto any Plotters drawing area.
pub fn draw_heatmap<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    matrix: &CorrelationMatrix,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let (width, height) = root.dim_in_pixel();
    let (width, height) = (width as i32, height as i32);

    let title_style = ("sans-serif", 18)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    root.draw(&Text::new(HEATMAP_TITLE, (width / 2, TOP / 2), title_style))?;

    let k = matrix.dim() as i32;
    if k == 0 {
        root.present()?;
        return Ok(());
    }

    let grid_w = (width - LEFT_LABELS - COLORBAR - 10).max(k);
    let grid_h = (height - TOP - BOTTOM_LABELS).max(k);
    let cell_w = grid_w / k;
    let cell_h = grid_h / k;

    let centered = ("sans-serif", 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let right_aligned = ("sans-serif", 13)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));

    for (i, row_label) in matrix.labels().iter().enumerate() {
        let y0 = TOP + i as i32 * cell_h;
        root.draw(&Text::new(
            row_label.column_label(),
            (LEFT_LABELS - 8, y0 + cell_h / 2),
            right_aligned.clone(),
        ))?;

        for j in 0..matrix.dim() {
            let x0 = LEFT_LABELS + j as i32 * cell_w;
            let v = matrix.at(i, j);
            root.draw(&Rectangle::new([(x0, y0), (x0 + cell_w, y0 + cell_h)], coolwarm(v).filled()))?;
            root.draw(&Rectangle::new([(x0, y0), (x0 + cell_w, y0 + cell_h)], WHITE.stroke_width(1)))?;
            root.draw(&Text::new(annotate(v), (x0 + cell_w / 2, y0 + cell_h / 2), centered.clone()))?;
        }
    }

    let label_y = TOP + k * cell_h + BOTTOM_LABELS / 3;
    for (j, col_label) in matrix.labels().iter().enumerate() {
        let x = LEFT_LABELS + j as i32 * cell_w + cell_w / 2;
        root.draw(&Text::new(col_label.column_label(), (x, label_y), centered.clone()))?;
    }

    // Colour bar from +1 (top) to -1 (bottom).
    let bar_x = LEFT_LABELS + k * cell_w + 15;
    let bar_h = k * cell_h;
    for step in 0..bar_h {
        let v = 1.0 - 2.0 * step as f64 / (bar_h - 1).max(1) as f64;
        root.draw(&Rectangle::new([(bar_x, TOP + step), (bar_x + 15, TOP + step + 1)], coolwarm(v).filled()))?;
    }
    let tick_style = ("sans-serif", 12)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for (v, y) in [(1.0, TOP), (0.0, TOP + bar_h / 2), (-1.0, TOP + bar_h)] {
        root.draw(&Text::new(format!("{v:.1}"), (bar_x + 20, y), tick_style.clone()))?;
    }

    root.present()?;
    Ok(())
}
