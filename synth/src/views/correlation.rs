use chrono::NaiveDate;

use crate::dataset::{Field, TimeSeriesDataset};
use crate::error::SynthError;
use crate::stats;

pub const CORRELATION_WINDOW: usize = 90;

/// Rolling correlation of two columns, aligned to the dataset index.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationSeries {
    pub left: Field,
    pub right: Field,
    pub window: usize,
    /// `None` where the window is incomplete or either side is flat.
    pub points: Vec<(NaiveDate, Option<f64>)>,
}

impl CorrelationSeries {
    pub fn name(&self) -> String {
        format!("{} vs {} ({}D)", self.left, self.right, self.window)
    }

    pub fn defined(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points.iter().filter_map(|(d, v)| v.map(|v| (*d, v)))
    }

    /// Runs of consecutive defined points, for drawing a line with gaps.
    pub fn segments(&self) -> Vec<Vec<(NaiveDate, f64)>> {
        let mut out = Vec::new();
        let mut cur = Vec::new();
        for (d, v) in &self.points {
            match v {
                Some(v) => cur.push((*d, *v)),
                None if !cur.is_empty() => out.push(std::mem::take(&mut cur)),
                None => {}
            }
        }
        if !cur.is_empty() {
            out.push(cur);
        }
        out
    }

    pub fn latest(&self) -> Option<f64> {
        self.points.last().and_then(|(_, v)| *v)
    }
}

pub fn rolling_correlation(
    ds: &TimeSeriesDataset,
    left: Field,
    right: Field,
    window: usize,
) -> Result<CorrelationSeries, SynthError> {
    let values = stats::rolling_correlation(ds.column(left), ds.column(right), window)?;
    Ok(CorrelationSeries {
        left,
        right,
        window,
        points: ds.dates().iter().copied().zip(values).collect(),
    })
}

/// Close vs Copper over a trailing `window`.
pub fn macro_correlation(
    ds: &TimeSeriesDataset,
    window: usize,
) -> Result<CorrelationSeries, SynthError> {
    rolling_correlation(ds, Field::Close, Field::Copper, window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Columns;
    use crate::generator::generate;

    #[test]
    fn default_window_shape() {
        let ds = generate().unwrap();
        let series = macro_correlation(&ds, CORRELATION_WINDOW).unwrap();

        assert_eq!(series.points.len(), ds.len());
        let leading = series.points.iter().take_while(|(_, v)| v.is_none()).count();
        assert_eq!(leading, CORRELATION_WINDOW - 1);
        assert!(series.points[CORRELATION_WINDOW - 1..]
            .iter()
            .all(|(_, v)| v.is_some()));
        assert!(series
            .defined()
            .all(|(_, v)| (-1.0 - 1e-9..=1.0 + 1e-9).contains(&v)));
        assert_eq!(series.segments().len(), 1);
        assert_eq!(series.name(), "Close vs Copper (90D)");
    }

    #[test]
    fn segments_split_on_gaps() {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let n = 8;
        let close = vec![1.0, 2.0, 3.0, 3.0, 3.0, 4.0, 6.0, 5.0];
        let copper = vec![2.0, 1.0, 4.0, 3.0, 5.0, 4.0, 7.0, 6.0];
        let cols = Columns {
            close,
            open: vec![1.0; n],
            high: vec![10.0; n],
            low: vec![0.5; n],
            vix: vec![0.0; n],
            dxy: vec![0.0; n],
            gold: vec![0.0; n],
            silver: vec![0.0; n],
            copper,
        };
        let ds = TimeSeriesDataset::new(start.iter_days().take(n).collect(), cols).unwrap();
        let series = macro_correlation(&ds, 3).unwrap();

        let defined: Vec<bool> = series.points.iter().map(|(_, v)| v.is_some()).collect();
        // window ending at index 4 holds 3.0, 3.0, 3.0
        assert_eq!(
            defined,
            vec![false, false, true, true, false, true, true, true]
        );
        let segs = series.segments();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].len(), 2);
        assert_eq!(segs[1].len(), 3);
        assert_eq!(series.latest(), series.points[7].1);
    }

    #[test]
    fn zero_window_is_rejected() {
        let ds = generate().unwrap().truncated(10).unwrap();
        assert!(matches!(
            macro_correlation(&ds, 0),
            Err(SynthError::InvalidWindow(0))
        ));
    }
}
