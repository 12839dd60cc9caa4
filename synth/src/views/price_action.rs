use chrono::{Datelike, Duration, NaiveDate};

use crate::dataset::TimeSeriesDataset;

/// Body extends this far either side of the day's x position.
pub const BODY_HALF_WIDTH: f64 = 0.3;
/// Added on top of every body so flat candles stay visible.
pub const BODY_MIN_HEIGHT: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleDirection {
    Up,
    Down,
}

/// Chart-ready shape of one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleGeometry {
    pub date: NaiveDate,
    /// Days since 1970-01-01.
    pub x: f64,
    pub body_left: f64,
    pub body_width: f64,
    pub body_low: f64,
    pub body_high: f64,
    pub wick_low: f64,
    pub wick_high: f64,
    pub direction: CandleDirection,
}

impl CandleGeometry {
    pub fn body_right(&self) -> f64 {
        self.body_left + self.body_width
    }

    /// Top edge to draw, including the minimum body height.
    pub fn display_top(&self) -> f64 {
        self.body_high + BODY_MIN_HEIGHT
    }

    pub fn is_up(&self) -> bool {
        self.direction == CandleDirection::Up
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceAction {
    pub candles: Vec<CandleGeometry>,
    /// One tick per 1 January inside the dataset range.
    pub year_ticks: Vec<AxisTick>,
}

impl PriceAction {
    /// Trailing `days` candles; everything when `days` is zero or too large.
    pub fn visible(&self, days: usize) -> &[CandleGeometry] {
        if days == 0 || days >= self.candles.len() {
            &self.candles
        } else {
            &self.candles[self.candles.len() - days..]
        }
    }

    /// Lowest wick and highest body top over `candles`.
    pub fn value_bounds(candles: &[CandleGeometry]) -> Option<(f64, f64)> {
        if candles.is_empty() {
            return None;
        }
        let lo = candles.iter().map(|c| c.wick_low).fold(f64::MAX, f64::min);
        let hi = candles
            .iter()
            .map(|c| c.wick_high.max(c.display_top()))
            .fold(f64::MIN, f64::max);
        Some((lo, hi))
    }
}

fn unix_epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Chart x coordinate for a day.
pub fn date_to_x(date: NaiveDate) -> f64 {
    (date - unix_epoch_date()).num_days() as f64
}

/// Day containing chart coordinate `x`.
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() {
        return None;
    }
    unix_epoch_date().checked_add_signed(Duration::try_days(x.floor() as i64)?)
}

fn year_ticks(first: NaiveDate, last: NaiveDate) -> Vec<AxisTick> {
    (first.year()..=last.year())
        .filter_map(|y| NaiveDate::from_ymd_opt(y, 1, 1))
        .filter(|d| *d >= first && *d <= last)
        .map(|d| AxisTick {
            x: date_to_x(d),
            label: d.format("%Y").to_string(),
        })
        .collect()
}

pub fn price_action(ds: &TimeSeriesDataset) -> PriceAction {
    let candles = ds
        .rows()
        .map(|r| {
            let x = date_to_x(r.date);
            CandleGeometry {
                date: r.date,
                x,
                body_left: x - BODY_HALF_WIDTH,
                body_width: 2.0 * BODY_HALF_WIDTH,
                body_low: r.open.min(r.close),
                body_high: r.open.max(r.close),
                wick_low: r.low,
                wick_high: r.high,
                direction: if r.close >= r.open {
                    CandleDirection::Up
                } else {
                    CandleDirection::Down
                },
            }
        })
        .collect();

    PriceAction {
        candles,
        year_ticks: year_ticks(ds.first_date(), ds.last_date()),
    }
}
