//! Synthetic commodity market data and the analytics behind the Silicon
//! commodity risk dashboard.
//!
//! [`generate`] builds a reproducible [`TimeSeriesDataset`]; the [`views`]
//! module turns it into the four dashboard projections.

pub mod cache;
pub mod dataset;
pub mod error;
pub mod generator;
pub mod stats;
pub mod views;

pub use cache::DatasetCache;
pub use dataset::{Columns, Field, MarketRow, TimeSeriesDataset};
pub use error::SynthError;
pub use generator::{generate, GeneratorConfig, MacroSpec, SyntheticMarket};
pub use views::ViewSet;
