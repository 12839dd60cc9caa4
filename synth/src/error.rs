use chrono::NaiveDate;
use thiserror::Error;

/// Errors produced while generating a dataset or deriving a view from it.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("date range is empty: {start} is after {end}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid distribution parameters: {0}")]
    Distribution(#[from] rand_distr::NormalError),

    #[error("invalid parameter {name}: {value} (must be finite and non-negative)")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("macro series cannot target price column {field}")]
    PriceColumnMacro { field: &'static str },

    #[error("column {field} has {actual} values, expected {expected}")]
    ColumnLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("dataset must contain at least one timestamp")]
    EmptyDataset,

    #[error("timestamps must be consecutive days; {prev} is followed by {next}")]
    NonDailyIndex { prev: NaiveDate, next: NaiveDate },

    #[error("rolling window must be at least 1, got {0}")]
    InvalidWindow(usize),

    #[error("insufficient history: horizon {horizon} needs more than {horizon} observations, have {available}")]
    InsufficientHistory { horizon: usize, available: usize },
}
