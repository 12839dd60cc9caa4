//! Deterministic synthetic market generator.
//!
//! Every call to [`SyntheticMarket::generate`] builds a fresh `StdRng` from the
//! configured seed, so regenerating always yields the same dataset. Values are
//! drawn from the stream in a fixed order:
//!
//! 1. the Close random walk (`N - 1` normal draws),
//! 2. one uniform per row for the High wick,
//! 3. one uniform per row for the Low wick,
//! 4. one standard normal per row for each macro series, in the order
//!    VIX, DXY, Gold, Silver, Copper.
//!
//! Changing that order changes every value after the reordered block.

use std::time::Instant;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, StandardNormal};

use crate::dataset::{Columns, Field, TimeSeriesDataset};
use crate::error::SynthError;

pub const DEFAULT_SEED: u64 = 0;
pub const INITIAL_CLOSE: f64 = 2000.0;
pub const DAILY_DRIFT: f64 = 0.0002;
pub const DAILY_VOLATILITY: f64 = 0.01;
/// Upper bound of the uniform wick extension, as a fraction of the body edge.
pub const WICK_SCALE: f64 = 0.01;

/// Mean and spread of one independent macro noise series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroSpec {
    pub field: Field,
    pub mean: f64,
    pub std_dev: f64,
}

/// VIX, DXY, Gold, Silver, Copper, in draw order.
pub const MACRO_SERIES: [MacroSpec; 5] = [
    MacroSpec { field: Field::Vix, mean: 15.0, std_dev: 3.0 },
    MacroSpec { field: Field::Dxy, mean: 100.0, std_dev: 2.0 },
    MacroSpec { field: Field::Gold, mean: 1800.0, std_dev: 10.0 },
    MacroSpec { field: Field::Silver, mean: 22.0, std_dev: 0.3 },
    MacroSpec { field: Field::Copper, mean: 4.0, std_dev: 0.05 },
];

pub fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2016, 1, 1).unwrap_or_default()
}

pub fn default_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// First day, inclusive.
    pub start: NaiveDate,
    /// Last day, inclusive.
    pub end: NaiveDate,
    pub initial_close: f64,
    pub drift: f64,
    pub volatility: f64,
    pub wick_scale: f64,
    pub macros: [MacroSpec; 5],
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            start: default_start(),
            end: default_end(),
            initial_close: INITIAL_CLOSE,
            drift: DAILY_DRIFT,
            volatility: DAILY_VOLATILITY,
            wick_scale: WICK_SCALE,
            macros: MACRO_SERIES,
        }
    }
}

impl GeneratorConfig {
    /// Default parameters over a different inclusive date range.
    pub fn with_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    /// Number of calendar days in `[start, end]`.
    pub fn day_count(&self) -> usize {
        let days = (self.end - self.start).num_days();
        if days < 0 {
            0
        } else {
            days as usize + 1
        }
    }

    /// Rejects spreads that are negative or non-finite, and macro specs that
    /// point at a price column.
    pub fn validate(&self) -> Result<(), SynthError> {
        check_spread("volatility", self.volatility)?;
        check_spread("wick_scale", self.wick_scale)?;
        for spec in &self.macros {
            if !spec.field.is_macro() {
                return Err(SynthError::PriceColumnMacro {
                    field: spec.field.into(),
                });
            }
            check_spread(spec.field.into(), spec.std_dev)?;
        }
        Ok(())
    }
}

fn check_spread(name: &'static str, value: f64) -> Result<(), SynthError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SynthError::InvalidParameter { name, value })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyntheticMarket {
    config: GeneratorConfig,
}

impl SyntheticMarket {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate(&self) -> Result<TimeSeriesDataset, SynthError> {
        let cfg = &self.config;
        if cfg.end < cfg.start {
            return Err(SynthError::EmptyRange {
                start: cfg.start,
                end: cfg.end,
            });
        }
        cfg.validate().inspect_err(|e| log::warn!("rejected generator config: {e}"))?;

        let started = Instant::now();
        let dates: Vec<NaiveDate> = cfg
            .start
            .iter_days()
            .take_while(|d| *d <= cfg.end)
            .collect();
        let n = dates.len();

        log::debug!(
            "generating {n} rows {}..={} seed={}",
            cfg.start,
            cfg.end,
            cfg.seed
        );

        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let step = Normal::new(cfg.drift, cfg.volatility)?;

        let mut close = Vec::with_capacity(n);
        let mut px = cfg.initial_close;
        close.push(px);
        for _ in 1..n {
            let eps: f64 = step.sample(&mut rng);
            px *= 1.0 + eps;
            close.push(px);
        }

        let open: Vec<f64> = std::iter::once(close[0])
            .chain(close[..n - 1].iter().copied())
            .collect();

        let high: Vec<f64> = open
            .iter()
            .zip(&close)
            .map(|(o, c)| o.max(*c) * (1.0 + rng.random::<f64>() * cfg.wick_scale))
            .collect();
        let low: Vec<f64> = open
            .iter()
            .zip(&close)
            .map(|(o, c)| o.min(*c) * (1.0 - rng.random::<f64>() * cfg.wick_scale))
            .collect();

        let mut columns = Columns {
            close,
            open,
            high,
            low,
            ..Columns::default()
        };

        for spec in &cfg.macros {
            let series: Vec<f64> = (0..n)
                .map(|_| {
                    let z: f64 = rng.sample(StandardNormal);
                    spec.mean + spec.std_dev * z
                })
                .collect();
            match spec.field {
                Field::Vix => columns.vix = series,
                Field::Dxy => columns.dxy = series,
                Field::Gold => columns.gold = series,
                Field::Silver => columns.silver = series,
                Field::Copper => columns.copper = series,
                other => {
                    return Err(SynthError::PriceColumnMacro {
                        field: other.into(),
                    })
                }
            }
        }

        let ds = TimeSeriesDataset::new(dates, columns)?;
        record_generation(n, started);
        Ok(ds)
    }
}

/// Dataset for the fixed default range and seed.
pub fn generate() -> Result<TimeSeriesDataset, SynthError> {
    SyntheticMarket::default().generate()
}

#[cfg(feature = "telemetry")]
fn record_generation(rows: usize, started: Instant) {
    metrics::counter!("silicon_synth_generate_total").increment(1);
    metrics::gauge!("silicon_synth_dataset_rows").set(rows as f64);
    metrics::histogram!("silicon_synth_generate_seconds").record(started.elapsed().as_secs_f64());
}

#[cfg(not(feature = "telemetry"))]
fn record_generation(rows: usize, started: Instant) {
    log::trace!("generated {rows} rows in {:?}", started.elapsed());
}
