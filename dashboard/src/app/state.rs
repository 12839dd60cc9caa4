use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use silicon_synth::{TimeSeriesDataset, ViewSet};

use crate::config::DashboardConfig;

pub const TITLE: &str = "Silicon Commodity – Risk & Predictive Analytics";

/// Dashboard tabs, in display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    #[strum(serialize = "Overview")]
    Overview,
    #[strum(serialize = "Price Action")]
    PriceAction,
    #[strum(serialize = "Macro Correlation")]
    MacroCorrelation,
    #[strum(serialize = "Prediction")]
    Prediction,
}

impl Tab {
    pub fn index(self) -> usize {
        Tab::iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Tab::iter().nth(idx)
    }

    pub fn next(self) -> Self {
        Tab::from_index(self.index() + 1).unwrap_or(Tab::Overview)
    }

    pub fn prev(self) -> Self {
        match self.index() {
            0 => Tab::Prediction,
            i => Tab::from_index(i - 1).unwrap_or(Tab::Overview),
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub selected_tab: Tab,
    /// Trailing days of candles to draw; 0 draws the whole history.
    pub candle_days: usize,

    pub dataset: Option<Arc<TimeSeriesDataset>>,
    pub views: Option<Box<ViewSet>>,
    pub generation: u64,
    pub last_elapsed_ms: Option<u64>,

    pub loading: bool,
    pub status: String,
    pub last_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            selected_tab: Tab::Overview,
            candle_days: 0,

            dataset: None,
            views: None,
            generation: 0,
            last_elapsed_ms: None,

            loading: false,
            status: "Starting...".to_string(),
            last_error: None,
        }
    }
}

impl AppState {
    pub fn from_config(cfg: &DashboardConfig) -> Self {
        Self {
            selected_tab: cfg.initial_tab,
            candle_days: cfg.candle_days,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> usize {
        self.dataset.as_ref().map(|d| d.len()).unwrap_or(0)
    }

    pub fn status_line(&self) -> String {
        let mut line = match &self.dataset {
            Some(ds) => format!(
                "gen #{} | {} days {} → {} | {}",
                self.generation,
                ds.len(),
                ds.first_date(),
                ds.last_date(),
                self.status
            ),
            None => self.status.clone(),
        };
        if let Some(err) = &self.last_error {
            line.push_str(&format!(" | error: {err}"));
        }
        line
    }
}

pub fn fmt_metric(v: f64) -> String {
    format!("{v:.2}")
}

/// Fraction rendered as a signed percentage.
pub fn fmt_pct(v: f64) -> String {
    format!("{:+.2}%", v * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_keep_fixed_order() {
        let labels: Vec<String> = Tab::iter().map(|t| t.to_string()).collect();
        assert_eq!(
            labels,
            vec!["Overview", "Price Action", "Macro Correlation", "Prediction"]
        );
        assert_eq!(Tab::MacroCorrelation.index(), 2);
        assert_eq!(Tab::from_index(3), Some(Tab::Prediction));
        assert_eq!(Tab::from_index(4), None);
    }

    #[test]
    fn tab_cycling_wraps() {
        assert_eq!(Tab::Prediction.next(), Tab::Overview);
        assert_eq!(Tab::Overview.prev(), Tab::Prediction);
        assert_eq!(Tab::PriceAction.next(), Tab::MacroCorrelation);
        assert_eq!(Tab::PriceAction.prev(), Tab::Overview);
    }

    #[test]
    fn formatting() {
        assert_eq!(fmt_metric(2412.3456), "2412.35");
        assert_eq!(fmt_pct(0.0345), "+3.45%");
        assert_eq!(fmt_pct(-0.1), "-10.00%");
    }

    #[test]
    fn status_line_without_data() {
        let mut st = AppState::default();
        st.last_error = Some("boom".into());
        assert_eq!(st.status_line(), "Starting... | error: boom");
        assert_eq!(st.rows(), 0);
    }
}
