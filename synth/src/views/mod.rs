//! Read-only projections of a [`TimeSeriesDataset`] for the dashboard tabs.
//!
//! Views never mutate the dataset and do not depend on each other.

pub mod correlation;
pub mod overview;
pub mod prediction;
pub mod price_action;

pub use correlation::{macro_correlation, CorrelationSeries, CORRELATION_WINDOW};
pub use overview::{overview, Overview, OVERVIEW_NOTE};
pub use prediction::{predict_trend, TrendPrediction, TrendSignal, TREND_HORIZON};
pub use price_action::{
    date_to_x, price_action, x_to_date, AxisTick, CandleDirection, CandleGeometry, PriceAction,
    BODY_HALF_WIDTH, BODY_MIN_HEIGHT,
};

use crate::dataset::TimeSeriesDataset;
use crate::error::SynthError;

/// Output of all four views for one dataset.
///
/// Fallible views keep their own `Result` so one failure never hides the rest.
#[derive(Debug)]
pub struct ViewSet {
    pub overview: Overview,
    pub price_action: PriceAction,
    pub correlation: Result<CorrelationSeries, SynthError>,
    pub prediction: Result<TrendPrediction, SynthError>,
}

impl ViewSet {
    /// Computes every view with the default window and horizon.
    pub fn compute(ds: &TimeSeriesDataset) -> Self {
        let correlation = macro_correlation(ds, CORRELATION_WINDOW);
        if let Err(e) = &correlation {
            log::warn!("correlation view failed: {e}");
        }
        let prediction = predict_trend(ds, TREND_HORIZON);
        if let Err(e) = &prediction {
            log::warn!("prediction view failed: {e}");
        }

        Self {
            overview: overview(ds),
            price_action: price_action(ds),
            correlation,
            prediction,
        }
    }
}
