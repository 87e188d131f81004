//! Ratatui-based interactive viewer.
//!
//! Shows one trend chart per indicator plus the correlation matrix. Countries
//! can be highlighted and hidden; nothing is refetched while the viewer is open.

use std::collections::HashSet;
use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Tabs},
};

use crate::domain::{Indicator, TidyTable};
use crate::error::AppError;
use crate::math::CorrelationMatrix;
use crate::plot::palette::{coolwarm, series_color};
use crate::plot::{HEATMAP_TITLE, line_chart_data};

mod plotters_chart;

use plotters_chart::TrendChart;

/// Start the viewer and block until the user quits.
pub fn run(table: &TidyTable, matrix: &CorrelationMatrix, year_span: &str) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::data(format!("Failed to initialize terminal: {e}")))?;

    let mut viewer = Viewer::new(table, matrix, year_span);
    viewer.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::data(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::data(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Which tab is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Trend(Indicator),
    Correlation,
}

impl View {
    const ALL: [View; 4] = [
        View::Trend(Indicator::Inflation),
        View::Trend(Indicator::Unemployment),
        View::Trend(Indicator::Gdp),
        View::Correlation,
    ];

    fn title(self) -> &'static str {
        match self {
            View::Trend(ind) => ind.display_name(),
            View::Correlation => "Correlation",
        }
    }
}

struct Viewer<'a> {
    table: &'a TidyTable,
    matrix: &'a CorrelationMatrix,
    year_span: &'a str,
    countries: Vec<String>,
    view: usize,
    selected: usize,
    hidden: HashSet<String>,
    status: String,
}

impl<'a> Viewer<'a> {
    fn new(table: &'a TidyTable, matrix: &'a CorrelationMatrix, year_span: &'a str) -> Self {
        let countries: Vec<String> = table.countries().into_iter().map(str::to_string).collect();
        let status = if countries.is_empty() {
            "No data to plot.".to_string()
        } else {
            format!("{} countries, {} rows", countries.len(), table.len())
        };
        Self {
            table,
            matrix,
            year_span,
            countries,
            view: 0,
            selected: 0,
            hidden: HashSet::new(),
            status,
        }
    }

    fn current_view(&self) -> View {
        View::ALL[self.view % View::ALL.len()]
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::data(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::data(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::data(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the viewer should close.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Right | KeyCode::Tab => {
                self.view = (self.view + 1) % View::ALL.len();
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.view = (self.view + View::ALL.len() - 1) % View::ALL.len();
            }
            KeyCode::Char(c @ '1'..='4') => {
                self.view = (c as usize) - ('1' as usize);
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected + 1 < self.countries.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('a') => {
                self.hidden.clear();
                self.status = "Showing all countries.".to_string();
            }
            _ => {}
        }
        false
    }

    fn toggle_selected(&mut self) {
        let Some(country) = self.countries.get(self.selected) else {
            return;
        };
        if self.hidden.remove(country) {
            self.status = format!("Showing {country}.");
        } else {
            self.hidden.insert(country.clone());
            self.status = format!("Hid {country}.");
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_tabs(frame, chunks[0]);
        match self.current_view() {
            View::Trend(indicator) => self.draw_trend(frame, chunks[1], indicator),
            View::Correlation => self.draw_correlation(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<Line> = View::ALL.iter().map(|v| Line::from(v.title())).collect();
        let tabs = Tabs::new(titles)
            .select(self.view % View::ALL.len())
            .block(Block::default().borders(Borders::ALL).title(format!("macro-report ({})", self.year_span)))
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_trend(&self, frame: &mut ratatui::Frame<'_>, area: Rect, indicator: Indicator) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(28)])
            .split(area);

        let data = line_chart_data(self.table, indicator, self.year_span, &self.hidden);
        let block = Block::default()
            .title(format!("Interactive {}", data.title))
            .borders(Borders::ALL);
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);
        frame.render_widget(Clear, inner);

        if data.series.is_empty() {
            let msg = Paragraph::new("No values to plot for this indicator.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
        } else {
            frame.render_widget(TrendChart { data: &data }, inner);
        }

        self.draw_countries(frame, chunks[1]);
    }

    fn draw_countries(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .countries
            .iter()
            .enumerate()
            .map(|(idx, country)| {
                let c = series_color(idx);
                let shown = !self.hidden.contains(country);
                let marker = if shown { "■ " } else { "□ " };
                let style = if shown {
                    Style::default().fg(Color::Rgb(c.0, c.1, c.2))
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(Line::from(vec![Span::styled(marker, style), Span::raw(country.as_str())]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Countries").borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        if !self.countries.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_correlation(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let header = Row::new(
            std::iter::once(Cell::from(""))
                .chain(self.matrix.labels().iter().map(|l| Cell::from(l.column_label())))
                .collect::<Vec<_>>(),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .matrix
            .labels()
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let mut cells = vec![Cell::from(label.column_label()).style(Style::default().add_modifier(Modifier::BOLD))];
                for j in 0..self.matrix.dim() {
                    let v = self.matrix.at(i, j);
                    let c = coolwarm(v);
                    cells.push(
                        Cell::from(crate::plot::heatmap::annotate(v))
                            .style(Style::default().fg(Color::Black).bg(Color::Rgb(c.0, c.1, c.2))),
                    );
                }
                Row::new(cells).height(2)
            })
            .collect();

        let mut widths = vec![Constraint::Length(20)];
        widths.extend(std::iter::repeat(Constraint::Length(20)).take(self.matrix.dim()));

        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .block(Block::default().title(HEATMAP_TITLE).borders(Borders::ALL));
        frame.render_widget(table, area);

        let note = Text::from(Line::from(Span::styled(
            "nan = fewer than two paired observations or a constant column",
            Style::default().fg(Color::Gray),
        )));
        let note_area = Rect {
            x: area.x + 2,
            y: area.y + area.height.saturating_sub(2),
            width: area.width.saturating_sub(4),
            height: 1,
        };
        if area.height > 12 {
            frame.render_widget(Paragraph::new(note), note_area);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ view  ↑/↓ select  space show/hide  a all  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(self.status.as_str(), Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
