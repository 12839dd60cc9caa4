use chrono::NaiveDate;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::error::SynthError;

/// One numeric column of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum Field {
    Close,
    Open,
    High,
    Low,
    #[strum(serialize = "VIX_US")]
    Vix,
    #[strum(serialize = "DXY")]
    Dxy,
    Gold,
    Silver,
    Copper,
}

impl Field {
    /// True for the independent macro series, false for OHLC prices.
    pub fn is_macro(self) -> bool {
        !matches!(self, Field::Close | Field::Open | Field::High | Field::Low)
    }
}

/// Raw column vectors used to assemble a [`TimeSeriesDataset`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns {
    pub close: Vec<f64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub vix: Vec<f64>,
    pub dxy: Vec<f64>,
    pub gold: Vec<f64>,
    pub silver: Vec<f64>,
    pub copper: Vec<f64>,
}

impl Columns {
    fn get(&self, field: Field) -> &[f64] {
        match field {
            Field::Close => &self.close,
            Field::Open => &self.open,
            Field::High => &self.high,
            Field::Low => &self.low,
            Field::Vix => &self.vix,
            Field::Dxy => &self.dxy,
            Field::Gold => &self.gold,
            Field::Silver => &self.silver,
            Field::Copper => &self.copper,
        }
    }

    fn truncated(&self, len: usize) -> Self {
        let head = |v: &Vec<f64>| v[..len.min(v.len())].to_vec();
        Self {
            close: head(&self.close),
            open: head(&self.open),
            high: head(&self.high),
            low: head(&self.low),
            vix: head(&self.vix),
            dxy: head(&self.dxy),
            gold: head(&self.gold),
            silver: head(&self.silver),
            copper: head(&self.copper),
        }
    }
}

/// A single timestamp's worth of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub vix: f64,
    pub dxy: f64,
    pub gold: f64,
    pub silver: f64,
    pub copper: f64,
}

/// Daily commodity prices plus macro reference series.
///
/// Columnar and immutable: there is no `&mut` access once built, so a dataset
/// can be shared between threads behind an `Arc` without locking. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesDataset {
    dates: Vec<NaiveDate>,
    columns: Columns,
}

impl TimeSeriesDataset {
    /// Validates lengths and daily spacing.
    pub fn new(dates: Vec<NaiveDate>, columns: Columns) -> Result<Self, SynthError> {
        if dates.is_empty() {
            return Err(SynthError::EmptyDataset);
        }

        for pair in dates.windows(2) {
            if pair[0].succ_opt() != Some(pair[1]) {
                return Err(SynthError::NonDailyIndex {
                    prev: pair[0],
                    next: pair[1],
                });
            }
        }

        for field in Field::iter() {
            let actual = columns.get(field).len();
            if actual != dates.len() {
                log::warn!(
                    "rejecting dataset: column {field} has {actual} rows, index has {}",
                    dates.len()
                );
                return Err(SynthError::ColumnLength {
                    field: field.into(),
                    expected: dates.len(),
                    actual,
                });
            }
        }

        Ok(Self { dates, columns })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Never true; datasets are non-empty.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn column(&self, field: Field) -> &[f64] {
        self.columns.get(field)
    }

    pub fn close(&self) -> &[f64] {
        &self.columns.close
    }

    pub fn open(&self) -> &[f64] {
        &self.columns.open
    }

    pub fn high(&self) -> &[f64] {
        &self.columns.high
    }

    pub fn low(&self) -> &[f64] {
        &self.columns.low
    }

    pub fn first_date(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// Last value of `field`. Datasets are never empty, so this cannot fail.
    pub fn latest(&self, field: Field) -> f64 {
        let col = self.columns.get(field);
        col[col.len() - 1]
    }

    pub fn row(&self, idx: usize) -> Option<MarketRow> {
        let date = *self.dates.get(idx)?;
        let c = &self.columns;
        Some(MarketRow {
            date,
            open: c.open[idx],
            high: c.high[idx],
            low: c.low[idx],
            close: c.close[idx],
            vix: c.vix[idx],
            dxy: c.dxy[idx],
            gold: c.gold[idx],
            silver: c.silver[idx],
            copper: c.copper[idx],
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = MarketRow> + '_ {
        (0..self.len()).filter_map(|i| self.row(i))
    }

    /// The first `len` rows as a new dataset.
    pub fn truncated(&self, len: usize) -> Result<Self, SynthError> {
        let len = len.min(self.len());
        Self::new(self.dates[..len].to_vec(), self.columns.truncated(len))
    }

    pub fn into_columns(self) -> (Vec<NaiveDate>, Columns) {
        (self.dates, self.columns)
    }
}
