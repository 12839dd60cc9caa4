//! Terminal front end. Same tabs and runtime as the egui app.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Tabs},
    Frame, Terminal,
};
use strum::IntoEnumIterator;

use silicon_synth::views::{date_to_x, AxisTick, PriceAction, TrendSignal, OVERVIEW_NOTE};
use silicon_synth::ViewSet;

use crate::app::{fmt_metric, fmt_pct, AppRuntime, AppState, Tab, UiEvent, TITLE};
use crate::debug_hooks;

const POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Quit,
    Ui(UiEvent),
}

/// Key bindings: q quits, arrows and 1-4 switch tabs, r regenerates.
pub fn map_key(code: KeyCode, current: Tab) -> Option<KeyAction> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Right => Some(KeyAction::Ui(UiEvent::TabSelected { tab: current.next() })),
        KeyCode::Left => Some(KeyAction::Ui(UiEvent::TabSelected { tab: current.prev() })),
        KeyCode::Char('r') => Some(KeyAction::Ui(UiEvent::RegenerateRequested)),
        KeyCode::Char(c @ '1'..='4') => c
            .to_digit(10)
            .and_then(|d| Tab::from_index(d as usize - 1))
            .map(|tab| KeyAction::Ui(UiEvent::TabSelected { tab })),
        _ => None,
    }
}

pub fn run(runtime: &mut AppRuntime) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = ui_loop(&mut terminal, runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn ui_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    runtime: &mut AppRuntime,
) -> Result<()> {
    let mut frame: u64 = 0;
    loop {
        runtime.poll_worker();

        frame += 1;
        debug_hooks::log_frame(frame, &runtime.state.selected_tab.to_string());
        terminal.draw(|f| draw(f, &runtime.state))?;

        if !event::poll(POLL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match map_key(key.code, runtime.state.selected_tab) {
            Some(KeyAction::Quit) => break,
            Some(KeyAction::Ui(ev)) => runtime.handle_ui_events([ev]),
            None => {}
        }
    }

    Ok(())
}

fn titled(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
}

fn draw(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    let titles: Vec<String> = Tab::iter()
        .enumerate()
        .map(|(i, t)| format!("{} {t}", i + 1))
        .collect();
    let tabs = Tabs::new(titles)
        .block(titled(TITLE))
        .select(state.selected_tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[0]);

    let body = chunks[1];
    match state.views.as_deref() {
        None => f.render_widget(
            Paragraph::new("Generating synthetic data...").block(titled("Loading")),
            body,
        ),
        Some(views) => match state.selected_tab {
            Tab::Overview => draw_overview(f, body, views),
            Tab::PriceAction => draw_price(f, body, &views.price_action, state.candle_days),
            Tab::MacroCorrelation => draw_correlation(f, body, views),
            Tab::Prediction => draw_prediction(f, body, views),
        },
    }

    let status_style = if state.last_error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    f.render_widget(
        Paragraph::new(format!("{}  [q]uit [r]egenerate ←/→ 1-4", state.status_line()))
            .style(status_style),
        chunks[2],
    );
}

fn draw_overview(f: &mut Frame, area: Rect, views: &ViewSet) {
    let ov = &views.overview;
    let lines = vec![
        Line::from(vec![
            Span::raw(format!("{:<22}", "Latest Silicon Price")),
            Span::styled(fmt_metric(ov.latest_close), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::raw(format!("{:<22}", "US VIX")),
            Span::styled(fmt_metric(ov.latest_vix), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::raw(format!("{:<22}", "DXY")),
            Span::styled(fmt_metric(ov.latest_dxy), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::raw(""),
        Line::raw(OVERVIEW_NOTE),
        Line::styled(
            format!("As of {}", ov.as_of),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    f.render_widget(Paragraph::new(lines).block(titled("Overview")), area);
}

/// At most `max` of the year ticks inside `[lo, hi]`, evenly thinned.
fn year_labels(ticks: &[AxisTick], lo: f64, hi: f64, max: usize) -> Vec<Span<'static>> {
    let inside: Vec<&AxisTick> = ticks.iter().filter(|t| t.x >= lo && t.x <= hi).collect();
    if inside.is_empty() || max == 0 {
        return Vec::new();
    }
    let step = inside.len().div_ceil(max);
    inside
        .iter()
        .step_by(step)
        .map(|t| Span::raw(t.label.clone()))
        .collect()
}

fn draw_price(f: &mut Frame, area: Rect, pa: &PriceAction, days: usize) {
    let visible = pa.visible(days);
    let (Some(first), Some(last), Some((lo, hi))) = (
        visible.first(),
        visible.last(),
        PriceAction::value_bounds(visible),
    ) else {
        f.render_widget(titled("10-Year Daily Candlestick"), area);
        return;
    };

    let close: Vec<(f64, f64)> = visible
        .iter()
        .map(|c| {
            let v = if c.is_up() { c.body_high } else { c.body_low };
            (c.x, v)
        })
        .collect();
    let highs: Vec<(f64, f64)> = visible.iter().map(|c| (c.x, c.wick_high)).collect();
    let lows: Vec<(f64, f64)> = visible.iter().map(|c| (c.x, c.wick_low)).collect();

    let datasets = vec![
        Dataset::default()
            .name("High")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&highs),
        Dataset::default()
            .name("Low")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&lows),
        Dataset::default()
            .name("Close")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::White))
            .data(&close),
    ];

    let x_labels = year_labels(&pa.year_ticks, first.x, last.x, 6);
    let chart = Chart::new(datasets)
        .block(titled("10-Year Daily Candlestick"))
        .x_axis(Axis::default().bounds([first.x, last.x]).labels(x_labels))
        .y_axis(
            Axis::default()
                .bounds([lo, hi])
                .labels(vec![Span::raw(fmt_metric(lo)), Span::raw(fmt_metric(hi))]),
        );
    f.render_widget(chart, area);
}

fn error_panel(f: &mut Frame, area: Rect, title: &str, msg: String) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::Red))
            .block(titled(title)),
        area,
    );
}

fn draw_correlation(f: &mut Frame, area: Rect, views: &ViewSet) {
    let title = "Rolling Correlation (90D)";
    let series = match &views.correlation {
        Ok(s) => s,
        Err(err) => {
            debug_hooks::log_view_error("macro_correlation", err);
            return error_panel(f, area, title, format!("Correlation unavailable: {err}"));
        }
    };

    let segments: Vec<Vec<(f64, f64)>> = series
        .segments()
        .into_iter()
        .map(|seg| seg.into_iter().map(|(d, v)| (date_to_x(d), v)).collect())
        .collect();
    let name = series.name();
    let datasets: Vec<Dataset> = segments
        .iter()
        .enumerate()
        .map(|(i, seg)| {
            let ds = Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(seg);
            if i == 0 {
                ds.name(name.clone())
            } else {
                ds
            }
        })
        .collect();

    let (x0, x1) = match (series.points.first(), series.points.last()) {
        (Some((a, _)), Some((b, _))) => (date_to_x(*a), date_to_x(*b)),
        _ => (0.0, 1.0),
    };
    let latest = series
        .latest()
        .map(|v| format!("{title}  latest {v:+.3}"))
        .unwrap_or_else(|| title.to_string());

    let chart = Chart::new(datasets)
        .block(titled(&latest))
        .x_axis(Axis::default().bounds([x0, x1]))
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .labels(vec![Span::raw("-1"), Span::raw("0"), Span::raw("1")]),
        );
    f.render_widget(chart, area);
}

fn draw_prediction(f: &mut Frame, area: Rect, views: &ViewSet) {
    let title = "Simple Trend Prediction (30D)";
    let p = match &views.prediction {
        Ok(p) => p,
        Err(err) => {
            debug_hooks::log_view_error("prediction", err);
            return error_panel(f, area, title, format!("Prediction unavailable: {err}"));
        }
    };

    let color = match p.signal {
        TrendSignal::Up => Color::Green,
        TrendSignal::Down => Color::Red,
    };
    let lines = vec![
        Line::from(vec![
            Span::raw("Predicted Trend: "),
            Span::styled(
                p.signal.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::raw(format!(
            "{}-day change to {}: {}",
            p.horizon,
            p.as_of,
            fmt_pct(p.pct_change)
        )),
    ];
    f.render_widget(Paragraph::new(lines).block(titled(title)), area);
}
