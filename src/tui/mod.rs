//! Ratatui-based terminal UI.
//!
//! The TUI loads the table once, then lets you flip between segment panels
//! (plus an overlay of all segments) and re-smooth with a different window
//! without re-reading the input.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::{Color as _, RGBColor};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::pipeline::{RunOutput, load_table, run_pipeline_with_table};
use crate::domain::{RawTable, Rgb, RunConfig, SegmentView};
use crate::error::AppError;
use crate::render::panel::{Panel, Trace, rolling_xy, view_xy, x_bounds, y_bounds};
use crate::report::{format_segment_table, segment_stats};

mod plotters_chart;

use plotters_chart::SegmentChart;

/// Start the TUI.
pub fn run(config: RunConfig) -> Result<(), AppError> {
    // Load before touching the terminal so input errors print normally.
    let table = load_table(&config.input)?;
    let mut app = App::new(config, table)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
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

struct App {
    config: RunConfig,
    table: RawTable,
    run: RunOutput,
    /// Index into the segments; `segments.len()` is the "all segments" overlay.
    selected: usize,
    status: String,
}

impl App {
    fn new(config: RunConfig, table: RawTable) -> Result<Self, AppError> {
        let run = run_pipeline_with_table(&config, &table)?;
        let status = format!(
            "{} rows used, {} dropped",
            run.assembled.rows_used(),
            run.assembled.dropped.len()
        );
        let selected = config.chart.segments.len();
        Ok(Self {
            config,
            table,
            run,
            selected,
            status,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
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

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let panels = self.config.chart.segments.len() + 1;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Right | KeyCode::Tab => {
                self.selected = (self.selected + 1) % panels;
                self.status = format!("panel: {}", self.panel_name());
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.selected = (self.selected + panels - 1) % panels;
                self.status = format!("panel: {}", self.panel_name());
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.set_window(step_window(self.config.window, true));
            }
            KeyCode::Char('-') => {
                self.set_window(step_window(self.config.window, false));
            }
            KeyCode::Char('r') => {
                self.set_window(crate::domain::DEFAULT_WINDOW);
            }
            _ => {}
        }
        false
    }

    fn set_window(&mut self, window: usize) {
        if window == self.config.window {
            return;
        }
        let previous = self.config.window;
        self.config.window = window;
        match run_pipeline_with_table(&self.config, &self.table) {
            Ok(run) => {
                self.run = run;
                self.status = format!("window: {window}");
            }
            Err(err) => {
                self.config.window = previous;
                self.status = format!("Re-smoothing failed: {err}");
            }
        }
    }

    fn panel_name(&self) -> &str {
        self.config
            .chart
            .segments
            .get(self.selected)
            .map_or("all segments", |s| s.label.as_str())
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        let views = self.run.views(&self.config);
        self.draw_header(frame, chunks[0], &views);
        self.draw_body(frame, chunks[1], &views);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect, views: &[SegmentView<'_>]) {
        let assembled = &self.run.assembled;
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("exrate", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" - {} rolling mean", assembled.column)),
        ]));

        let range = match (assembled.series.first_date(), assembled.series.last_date()) {
            (Some(first), Some(last)) => format!("{first} .. {last}"),
            _ => "-".to_string(),
        };
        lines.push(Line::from(Span::styled(
            format!(
                "window: {} | policy: {:?} | rows: {} used / {} dropped | range: {range}",
                self.config.window,
                self.config.policy,
                assembled.rows_used(),
                assembled.dropped.len(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let mut legend = vec![Span::raw("segments: ")];
        for (i, view) in views.iter().enumerate() {
            let mut style = Style::default().fg(term_color(view.segment.color));
            if i == self.selected {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            legend.push(Span::styled(view.segment.legend_label().to_string(), style));
            legend.push(Span::raw("  "));
        }
        lines.push(Line::from(legend));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect, views: &[SegmentView<'_>]) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(views.len() as u16 + 4)])
            .split(area);

        self.draw_chart(frame, chunks[0], views);
        self.draw_stats(frame, chunks[1], views);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, views: &[SegmentView<'_>]) {
        let title = match views.get(self.selected) {
            Some(view) => match segment_stats(view) {
                Some(s) => format!(
                    "{} | mean {:.4} | {:+.2}%",
                    view.segment.label,
                    s.mean,
                    s.change_pct()
                ),
                None => format!("{} | no rolling values", view.segment.label),
            },
            None => "All segments".to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let base = rolling_xy(&self.run.smoothed);
        if base.is_empty() {
            let msg = Paragraph::new("No rolling values (window longer than the series?)")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        }

        let style = &self.config.chart.style;
        let x_range = x_bounds(&self.run.smoothed);
        let y_range = y_bounds(&base, 0.0..1.0);
        let traces = chart_traces(views, self.selected);

        let widget = SegmentChart {
            panel: Panel {
                title: None,
                x_range,
                y_range,
                base: Some((
                    base.as_slice(),
                    RGBColor::from(style.base_color).mix(style.base_opacity),
                )),
                traces,
                boundaries: crate::render::panel::boundaries(views),
                x_ticks: Vec::new(),
                y_ticks: Vec::new(),
                show_y_labels: true,
                legend: false,
                foreground: RGBColor(255, 255, 255),
                font_size: 10,
                margin: 1,
                label_area: (7, 2),
            },
        };
        frame.render_widget(widget, inner);
    }

    fn draw_stats(&self, frame: &mut ratatui::Frame<'_>, area: Rect, views: &[SegmentView<'_>]) {
        let table = format_segment_table(views);
        let lines: Vec<Line> = table
            .lines()
            .enumerate()
            .map(|(i, line)| {
                // Two header lines precede the segment rows.
                let style = if i >= 2 && i - 2 == self.selected {
                    Style::default().fg(Color::Black).bg(Color::White)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(line.to_string(), style))
            })
            .collect();

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Segments").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ panel  +/- window  r reset window  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Traces for the selected panel: one segment, or all of them.
fn chart_traces<'a>(views: &'a [SegmentView<'a>], selected: usize) -> Vec<Trace<'a>> {
    let trace = |view: &'a SegmentView<'a>| Trace {
        points: view_xy(view),
        color: view.segment.color.into(),
        width: 1,
        label: Some(view.segment.legend_label()),
    };
    match views.get(selected) {
        Some(view) => vec![trace(view)],
        None => views.iter().map(trace).collect(),
    }
}

/// Next window length: steps of 1 up to 10, then steps of 5. Never below 1.
fn step_window(window: usize, up: bool) -> usize {
    let step = if window > 10 || (up && window == 10) { 5 } else { 1 };
    if up {
        window.saturating_add(step)
    } else {
        window.saturating_sub(step).max(1)
    }
}

fn term_color(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SampleConfig, generate_sample};
    use crate::domain::{ChartConfig, CoercionPolicy, InputSource};
    use chrono::NaiveDate;

    fn app() -> App {
        let start = NaiveDate::from_ymd_opt(2008, 1, 7).unwrap();
        let config = RunConfig {
            input: InputSource::Sample { seed: 7, start, days: 365 * 10 },
            currency: "us_dollar".to_string(),
            window: 10,
            policy: CoercionPolicy::Lenient,
            chart: ChartConfig::default(),
        };
        let table = generate_sample(&SampleConfig {
            seed: 7,
            start,
            days: 365 * 10,
            ..SampleConfig::default()
        })
        .unwrap();
        App::new(config, table).unwrap()
    }

    #[test]
    fn starts_on_overlay_and_cycles_both_ways() {
        let mut app = app();
        assert_eq!(app.panel_name(), "all segments");
        assert!(!app.handle_key(KeyCode::Right));
        assert_eq!(app.selected, 0);
        assert!(!app.handle_key(KeyCode::Left));
        assert!(!app.handle_key(KeyCode::Left));
        assert_eq!(app.selected, 2);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn window_keys_resmooth() {
        let mut app = app();
        let before = app.run.smoothed.rolling().count();
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.config.window, 15);
        assert_eq!(app.run.smoothed.window(), 15);
        assert_eq!(app.run.smoothed.rolling().count(), before - 5);

        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.run.smoothed.window(), crate::domain::DEFAULT_WINDOW);
    }

    #[test]
    fn window_steps() {
        assert_eq!(step_window(1, false), 1);
        assert_eq!(step_window(3, true), 4);
        assert_eq!(step_window(10, true), 15);
        assert_eq!(step_window(15, false), 10);
        assert_eq!(step_window(10, false), 9);
    }

    #[test]
    fn overlay_traces_every_segment() {
        let app = app();
        let views = app.run.views(&app.config);
        assert_eq!(chart_traces(&views, views.len()).len(), views.len());
        let one = chart_traces(&views, 1);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].label, Some(views[1].segment.legend_label()));
    }
}
