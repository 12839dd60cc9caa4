use std::ops::RangeInclusive;

use eframe::egui;
use egui::{Color32, RichText, Stroke};
use egui_plot::{GridInput, GridMark, HLine, Legend, Line, Plot, PlotPoints, Polygon};
use strum::IntoEnumIterator;

use chrono::Datelike;
use silicon_synth::views::{
    date_to_x, x_to_date, AxisTick, CandleGeometry, CorrelationSeries, Overview, PriceAction,
    TrendPrediction, TrendSignal, OVERVIEW_NOTE,
};
use silicon_synth::ViewSet;

use super::event::UiEvent;
use super::state::*;
use crate::debug_hooks;

const UP_COLOR: Color32 = Color32::from_rgb(38, 166, 91);
const DOWN_COLOR: Color32 = Color32::from_rgb(214, 48, 49);
const DAYS_PER_YEAR: f64 = 365.25;

/// Draws one frame and collects what the user did.
pub fn render(ctx: &egui::Context, state: &AppState, events: &mut Vec<UiEvent>) {
    egui::TopBottomPanel::top("top_panel").show(ctx, |ui| top_bar(ui, state, events));

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if state.loading {
                ui.spinner();
            }
            match &state.last_error {
                Some(_) => ui.colored_label(DOWN_COLOR, state.status_line()),
                None => ui.label(state.status_line()),
            };
        });
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading(TITLE);
        ui.separator();

        let Some(views) = state.views.as_deref() else {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Generating synthetic data...");
            });
            return;
        };

        match state.selected_tab {
            Tab::Overview => ui_overview(ui, &views.overview),
            Tab::PriceAction => ui_price_action(ui, state, &views.price_action, events),
            Tab::MacroCorrelation => ui_correlation(ui, views),
            Tab::Prediction => ui_prediction(ui, views),
        }
    });
}

fn top_bar(ui: &mut egui::Ui, state: &AppState, events: &mut Vec<UiEvent>) {
    ui.horizontal(|ui| {
        for tab in Tab::iter() {
            if ui
                .selectable_label(state.selected_tab == tab, tab.to_string())
                .clicked()
                && tab != state.selected_tab
            {
                events.push(UiEvent::TabSelected { tab });
            }
        }

        ui.separator();
        if ui
            .add_enabled(!state.loading, egui::Button::new("Regenerate"))
            .on_hover_text("Rebuild the dataset from the fixed seed")
            .clicked()
        {
            events.push(UiEvent::RegenerateRequested);
        }
    });
}

fn metric(ui: &mut egui::Ui, label: &str, value: f64) {
    ui.group(|ui| {
        ui.vertical(|ui| {
            ui.label(label);
            ui.label(RichText::new(fmt_metric(value)).size(28.0).strong());
        });
    });
}

fn ui_overview(ui: &mut egui::Ui, ov: &Overview) {
    ui.horizontal(|ui| {
        metric(ui, "Latest Silicon Price", ov.latest_close);
        metric(ui, "US VIX", ov.latest_vix);
        metric(ui, "DXY", ov.latest_dxy);
    });
    ui.add_space(8.0);
    ui.label(OVERVIEW_NOTE);
    ui.weak(format!("As of {}", ov.as_of));
}

fn ui_price_action(
    ui: &mut egui::Ui,
    state: &AppState,
    pa: &PriceAction,
    events: &mut Vec<UiEvent>,
) {
    ui.label(RichText::new("10-Year Daily Candlestick").heading());

    let total = pa.candles.len();
    let mut days = state.candle_days.min(total);
    ui.horizontal(|ui| {
        ui.label("History (days, 0 = all):");
        ui.add(egui::Slider::new(&mut days, 0..=total));
        if ui.button("All").clicked() {
            days = 0;
        }
        if ui.button("1Y").clicked() {
            days = 365;
        }
    });
    if days != state.candle_days.min(total) {
        events.push(UiEvent::CandleDaysChanged { days });
    }

    let visible = pa.visible(state.candle_days);
    let ticks = pa.year_ticks.clone();

    Plot::new("candles_plot")
        .height(ui.available_height())
        .allow_boxed_zoom(false)
        .x_grid_spacer(move |input| year_marks(&ticks, input))
        .x_axis_formatter(date_axis_label)
        .show(ui, |plot_ui| {
            for c in visible {
                draw_candle(plot_ui, c);
            }
        });
}

fn candle_color(c: &CandleGeometry) -> Color32 {
    if c.is_up() {
        UP_COLOR
    } else {
        DOWN_COLOR
    }
}

fn draw_candle(plot_ui: &mut egui_plot::PlotUi, c: &CandleGeometry) {
    let color = candle_color(c);

    let wick: PlotPoints = vec![[c.x, c.wick_low], [c.x, c.wick_high]].into();
    plot_ui.line(Line::new(wick).color(color).width(1.0));

    let (left, right) = (c.body_left, c.body_right());
    let (bot, top) = (c.body_low, c.display_top());
    let body: PlotPoints = vec![[left, bot], [right, bot], [right, top], [left, top]].into();
    plot_ui.polygon(
        Polygon::new(body)
            .fill_color(color)
            .stroke(Stroke::new(1.0, color)),
    );
}

/// Grid lines on 1 January; falls back to the default spacer when zoomed in
/// past a single year.
fn year_marks(ticks: &[AxisTick], input: GridInput) -> Vec<GridMark> {
    let (lo, hi) = input.bounds;
    let marks: Vec<GridMark> = ticks
        .iter()
        .filter(|t| t.x >= lo && t.x <= hi)
        .map(|t| GridMark {
            value: t.x,
            step_size: DAYS_PER_YEAR,
        })
        .collect();

    if marks.len() >= 2 {
        marks
    } else {
        egui_plot::log_grid_spacer(10)(input)
    }
}

fn date_axis_label(mark: GridMark, _max_chars: usize, _range: &RangeInclusive<f64>) -> String {
    match x_to_date(mark.value) {
        Some(d) if d.month() == 1 && d.day() == 1 => d.format("%Y").to_string(),
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

fn ui_correlation(ui: &mut egui::Ui, views: &ViewSet) {
    ui.label(RichText::new("Rolling Correlation (90D)").heading());

    let series: &CorrelationSeries = match &views.correlation {
        Ok(s) => s,
        Err(err) => {
            debug_hooks::log_view_error("macro_correlation", err);
            ui.colored_label(DOWN_COLOR, format!("Correlation unavailable: {err}"));
            return;
        }
    };

    match series.latest() {
        Some(v) => ui.label(format!("Latest: {v:+.3}")),
        None => ui.weak("Latest: n/a"),
    };

    let name = series.name();
    let segments = series.segments();
    Plot::new("correlation_plot")
        .height(ui.available_height())
        .include_y(-1.0)
        .include_y(1.0)
        .legend(Legend::default())
        .x_axis_formatter(date_axis_label)
        .show(ui, |plot_ui| {
            for seg in segments {
                let pts: PlotPoints = seg
                    .into_iter()
                    .map(|(d, v)| [date_to_x(d), v])
                    .collect::<Vec<_>>()
                    .into();
                plot_ui.line(Line::new(pts).name(&name));
            }
            plot_ui.hline(HLine::new(0.0).color(Color32::GRAY));
        });
}

fn ui_prediction(ui: &mut egui::Ui, views: &ViewSet) {
    ui.label(RichText::new("Simple Trend Prediction (30D)").heading());

    let p: &TrendPrediction = match &views.prediction {
        Ok(p) => p,
        Err(err) => {
            debug_hooks::log_view_error("prediction", err);
            ui.colored_label(DOWN_COLOR, format!("Prediction unavailable: {err}"));
            return;
        }
    };

    let color = match p.signal {
        TrendSignal::Up => UP_COLOR,
        TrendSignal::Down => DOWN_COLOR,
    };
    ui.horizontal(|ui| {
        ui.label(RichText::new("Predicted Trend:").size(20.0));
        ui.label(RichText::new(p.signal.to_string()).size(20.0).strong().color(color));
    });
    ui.label(format!(
        "{}-day change to {}: {}",
        p.horizon,
        p.as_of,
        fmt_pct(p.pct_change)
    ));

    let pts: PlotPoints = views
        .price_action
        .candles
        .iter()
        .zip(&p.history)
        .filter_map(|(c, v)| v.map(|v| [c.x, v * 100.0]))
        .collect::<Vec<_>>()
        .into();
    let label = format!("{}D return (%)", p.horizon);
    Plot::new("return_plot")
        .height(ui.available_height())
        .legend(Legend::default())
        .x_axis_formatter(date_axis_label)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(pts).name(label));
            plot_ui.hline(HLine::new(0.0).color(Color32::GRAY));
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn axis_labels_use_year_on_new_year() {
        let jan1 = date_to_x(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        let mark = GridMark {
            value: jan1,
            step_size: DAYS_PER_YEAR,
        };
        assert_eq!(date_axis_label(mark, 10, &(0.0..=1.0)), "2020");

        let mid = GridMark {
            value: jan1 + 45.0,
            step_size: 10.0,
        };
        assert_eq!(date_axis_label(mid, 10, &(0.0..=1.0)), "2020-02-15");
    }

    #[test]
    fn year_marks_cover_visible_ticks() {
        let ticks: Vec<AxisTick> = (2016..=2020)
            .map(|y| {
                let d = NaiveDate::from_ymd_opt(y, 1, 1).unwrap();
                AxisTick {
                    x: date_to_x(d),
                    label: y.to_string(),
                }
            })
            .collect();
        let input = GridInput {
            bounds: (ticks[1].x - 1.0, ticks[3].x + 1.0),
            base_step_size: 1.0,
        };
        let marks = year_marks(&ticks, input);
        assert_eq!(marks.len(), 3);
        assert_eq!(marks[0].value, ticks[1].x);
    }
}
