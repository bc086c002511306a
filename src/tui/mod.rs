//! Ratatui-based terminal UI.
//!
//! The TUI is the rendering host for the report views: one tab per report,
//! a selector menu on the left and the active bar series on the right. State
//! changes go through `ReportView::select` and `ReportView::set_axis_policy`,
//! so the chart, axis range and title always move together.

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
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs},
};

use crate::app::pipeline::{Dashboard, run_dashboard};
use crate::chart::ReportView;
use crate::domain::{AxisPolicy, DashboardConfig, Rgb};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::BarPlottersChart;

/// Start the TUI.
pub fn run(config: DashboardConfig) -> Result<(), AppError> {
    // Build before touching the terminal so report errors print normally.
    let mut app = App::new(config)?;

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
    config: DashboardConfig,
    dashboard: Dashboard,
    tab: usize,
    status: String,
}

impl App {
    fn new(config: DashboardConfig) -> Result<Self, AppError> {
        let dashboard = run_dashboard(&config)?;
        let status = load_status(&dashboard);
        Ok(Self {
            config,
            dashboard,
            tab: 0,
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
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
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

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::Right => self.switch_tab(1),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(-1),
            KeyCode::Up => self.step_selection(-1),
            KeyCode::Down => self.step_selection(1),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.select(index);
            }
            KeyCode::Char('a') => self.toggle_axis_policy(),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
        false
    }

    fn current(&self) -> &ReportView {
        &self.dashboard.reports[self.tab]
    }

    fn switch_tab(&mut self, delta: isize) {
        let n = self.dashboard.reports.len();
        if n == 0 {
            return;
        }
        self.tab = (self.tab as isize + delta).rem_euclid(n as isize) as usize;
        self.status = format!("tab: {}", self.current().name());
    }

    fn step_selection(&mut self, delta: isize) {
        let view = self.current();
        let n = view.selectors().len() as isize;
        if n == 0 {
            return;
        }
        let next = (view.active_index() as isize + delta).rem_euclid(n) as usize;
        self.select(next);
    }

    fn select(&mut self, index: usize) {
        let view = &mut self.dashboard.reports[self.tab];
        self.status = match view.select(index) {
            Ok(_) => format!("showing: {}", view.title()),
            Err(err) => err.to_string(),
        };
    }

    /// Flip the y-range policy on the loaded views; the data is not re-read.
    fn toggle_axis_policy(&mut self) {
        self.config.axis_policy = match self.config.axis_policy {
            AxisPolicy::PerSeries => AxisPolicy::Shared,
            AxisPolicy::Shared => AxisPolicy::PerSeries,
        };
        for view in &mut self.dashboard.reports {
            view.set_axis_policy(self.config.axis_policy);
        }
        self.status = format!("axis: {:?}", self.config.axis_policy);
    }

    /// Rebuild from the data source, keeping the tab and each report's selection.
    fn reload(&mut self) {
        let previous: Vec<usize> = self.dashboard.reports.iter().map(|v| v.active_index()).collect();
        match run_dashboard(&self.config) {
            Ok(mut dashboard) => {
                for (view, index) in dashboard.reports.iter_mut().zip(previous) {
                    let _ = view.select(index);
                }
                self.status = load_status(&dashboard);
                self.dashboard = dashboard;
                self.tab = self.tab.min(self.dashboard.reports.len().saturating_sub(1));
            }
            Err(err) => {
                self.status = format!("Reload failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(Span::styled(
            " University Growth & Dept. Enrollment Dashboard ",
            Style::default().fg(Color::Cyan),
        ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let titles: Vec<String> = self
            .dashboard
            .reports
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{} {}", i + 1, v.name()))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.tab)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, rows[0]);

        let info = Line::from(Span::styled(
            format!(
                "source: {} | rows: {}/{} | axis: {:?}",
                self.dashboard.source,
                self.dashboard.rows_used,
                self.dashboard.rows_read,
                self.config.axis_policy,
            ),
            Style::default().fg(Color::Gray),
        ));
        frame.render_widget(Paragraph::new(info), rows[1]);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(area);

        self.draw_selectors(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
    }

    fn draw_selectors(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let view = self.current();
        let items: Vec<ListItem> = view
            .selectors()
            .iter()
            .map(|e| ListItem::new(format!("{} {}", e.target + 1, e.label)))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Select").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(view.active_index()));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let view = self.current();
        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", view.title()),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(2)])
            .split(inner);

        let bars = &view.active_series().bars;
        let range = view.axis_range();
        let widget = BarPlottersChart {
            bars,
            y_bounds: [range.min, range.max],
            y_label: "Percent",
            fmt_y: fmt_axis_y_pct,
        };
        frame.render_widget(widget, rows[0]);

        let mut legend: Vec<Span> = Vec::new();
        for bar in bars {
            legend.push(Span::styled("■ ", Style::default().fg(term_color(bar.color))));
            legend.push(Span::raw(format!("{} {}   ", bar.x_label, bar.text)));
        }
        let text = Text::from(vec![
            Line::from(legend),
            Line::from(Span::styled(
                format!("y: [{:.1}, {:.1}]", range.min, range.max),
                Style::default().fg(Color::Gray),
            )),
        ]);
        frame.render_widget(Paragraph::new(text), rows[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab/←/→ report  ↑/↓ or 1-9 select  a axis  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn load_status(dashboard: &Dashboard) -> String {
    if dashboard.row_errors.is_empty() {
        format!("Loaded {}", dashboard.source)
    } else {
        format!(
            "Loaded {} ({} rows skipped, first at line {})",
            dashboard.source,
            dashboard.row_errors.len(),
            dashboard.row_errors[0].line
        )
    }
}

fn term_color(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

fn fmt_axis_y_pct(v: f64) -> String {
    format!("{v:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(DashboardConfig::default()).unwrap()
    }

    #[test]
    fn arrows_cycle_selection_within_tab() {
        let mut app = app();
        app.handle_key(KeyCode::Up);
        assert_eq!(app.current().active_index(), 2);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.current().active_index(), 0);
    }

    #[test]
    fn tabs_keep_independent_state() {
        let mut app = app();
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Char('4'));
        assert_eq!(app.current().title(), "Science: Enrollment % Changes");
        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.current().active_index(), 0);
        assert_eq!(app.dashboard.reports[1].active_index(), 3);
    }

    #[test]
    fn out_of_range_digit_reports_error() {
        let mut app = app();
        app.handle_key(KeyCode::Char('9'));
        assert!(app.status.contains("out of range"));
        assert_eq!(app.current().active_index(), 0);
    }

    #[test]
    fn axis_toggle_keeps_selection() {
        let mut app = app();
        app.handle_key(KeyCode::Char('2'));
        app.handle_key(KeyCode::Char('a'));
        assert_eq!(app.config.axis_policy, AxisPolicy::Shared);
        assert_eq!(app.current().active_index(), 1);
    }

    #[test]
    fn axis_toggle_works_after_source_disappears() {
        let path = std::env::temp_dir().join(format!("dash-tui-axis-{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "Year,Applications,Admissions,Enrollments,Arts Enrolled,Science Enrolled\n\
             2023,100,50,200,100,100\n\
             2024,110,55,193,106,87\n",
        )
        .unwrap();
        let mut app = App::new(DashboardConfig {
            csv_path: Some(path.clone()),
            ..DashboardConfig::default()
        })
        .unwrap();
        std::fs::remove_file(&path).unwrap();

        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Char('a'));
        assert_eq!(app.config.axis_policy, AxisPolicy::Shared);
        for view in &app.dashboard.reports {
            assert_eq!(view.axis_policy(), AxisPolicy::Shared);
            assert_eq!(view.axis_range(), view.chart().axis_range(AxisPolicy::Shared));
        }
        // Arts grows, but the shared range still reaches down to Science.
        assert_eq!(app.current().active_index(), 0);
        assert!(app.current().axis_range().min < -13.0);

        app.handle_key(KeyCode::Char('r'));
        assert!(app.status.starts_with("Reload failed"));
        assert_eq!(app.config.axis_policy, AxisPolicy::Shared);
        assert!(app.dashboard.reports.iter().all(|v| v.axis_policy() == AxisPolicy::Shared));
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Esc));
    }
}
