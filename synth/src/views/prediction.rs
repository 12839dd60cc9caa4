use chrono::NaiveDate;
use strum::Display;

use crate::dataset::TimeSeriesDataset;
use crate::error::SynthError;
use crate::stats;

pub const TREND_HORIZON: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TrendSignal {
    #[strum(serialize = "UP")]
    Up,
    #[strum(serialize = "DOWN")]
    Down,
}

impl TrendSignal {
    /// Strictly positive change is `Up`; zero and NaN are `Down`.
    pub fn from_change(pct: f64) -> Self {
        if pct > 0.0 {
            TrendSignal::Up
        } else {
            TrendSignal::Down
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPrediction {
    pub signal: TrendSignal,
    pub as_of: NaiveDate,
    pub horizon: usize,
    /// Fractional Close change over `horizon` days ending at `as_of`.
    pub pct_change: f64,
    /// Full `pct_change(horizon)` series aligned to the dataset index.
    pub history: Vec<Option<f64>>,
}

pub fn predict_trend(ds: &TimeSeriesDataset, horizon: usize) -> Result<TrendPrediction, SynthError> {
    let close = ds.close();
    if close.len() <= horizon {
        return Err(SynthError::InsufficientHistory {
            horizon,
            available: close.len(),
        });
    }

    let last = close.len() - 1;
    let base = close[last - horizon];
    let pct = (close[last] - base) / base;

    Ok(TrendPrediction {
        signal: TrendSignal::from_change(pct),
        as_of: ds.last_date(),
        horizon,
        pct_change: pct,
        history: stats::pct_change(close, horizon),
    })
}
