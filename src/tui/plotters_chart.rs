//! Plotters-powered trend chart widget for Ratatui.
//!
//! The same `draw_line_chart` used for the SVG files draws into the terminal
//! buffer through `plotters-ratatui-backend`; only the theme differs.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::{ChartTheme, LineChartData, draw_line_chart};

/// Terminal theme: no caption or legend (the viewer draws those as widgets).
pub fn terminal_theme() -> ChartTheme {
    ChartTheme {
        caption: false,
        font_size: 10,
        foreground: WHITE,
        background: None,
        line_width: 1,
        x_label_area: 3,
        y_label_area: 8,
        legend: false,
        margin: 1,
        mesh: false,
    }
}

/// A render-only chart over precomputed series.
pub struct TrendChart<'a> {
    pub data: &'a LineChartData,
}

impl<'a> Widget for TrendChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.data.x_bounds;
        let [y0, y1] = self.data.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let data = self.data;
        let theme = terminal_theme();
        let widget = widget_fn(move |root| {
            draw_line_chart(&root, data, &theme)?;
            Ok(())
        });

        widget.render(area, buf);
    }
}
