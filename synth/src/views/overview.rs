use chrono::NaiveDate;

use crate::dataset::{Field, TimeSeriesDataset};

pub const OVERVIEW_NOTE: &str = "This is a fully offline demo using synthetic data.";

/// Latest-value metrics for the headline cards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overview {
    pub as_of: NaiveDate,
    pub latest_close: f64,
    pub latest_vix: f64,
    pub latest_dxy: f64,
}

pub fn overview(ds: &TimeSeriesDataset) -> Overview {
    Overview {
        as_of: ds.last_date(),
        latest_close: ds.latest(Field::Close),
        latest_vix: ds.latest(Field::Vix),
        latest_dxy: ds.latest(Field::Dxy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorConfig, SyntheticMarket};

    #[test]
    fn picks_last_row() {
        let start = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 6, 20).unwrap();
        let ds = SyntheticMarket::new(GeneratorConfig::with_range(start, end))
            .generate()
            .unwrap();

        let ov = overview(&ds);
        let last = ds.row(ds.len() - 1).unwrap();
        assert_eq!(ov.as_of, end);
        assert_eq!(ov.latest_close, last.close);
        assert_eq!(ov.latest_vix, last.vix);
        assert_eq!(ov.latest_dxy, last.dxy);
    }
}
