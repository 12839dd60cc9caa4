use chrono::NaiveDate;
use silicon_synth::views::{
    macro_correlation, overview, predict_trend, CORRELATION_WINDOW, TREND_HORIZON,
};
use silicon_synth::{
    generate, Field, GeneratorConfig, SynthError, SyntheticMarket, TimeSeriesDataset,
    ViewSet,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn generation_is_deterministic() {
    let a = generate().unwrap();
    let b = generate().unwrap();
    assert_eq!(a, b);

    let bits = |ds: &TimeSeriesDataset, f: Field| -> Vec<u64> {
        ds.column(f).iter().map(|v| v.to_bits()).collect()
    };
    assert_eq!(bits(&a, Field::Close), bits(&b, Field::Close));
    assert_eq!(bits(&a, Field::Copper), bits(&b, Field::Copper));
}

#[test]
fn full_range_length_and_spacing() {
    let ds = generate().unwrap();
    let cfg = GeneratorConfig::default();
    assert_eq!(ds.len(), cfg.day_count());
    assert_eq!(ds.len(), 3654);
    assert_eq!(ds.first_date(), ymd(2016, 1, 1));
    assert_eq!(ds.last_date(), ymd(2026, 1, 1));
    assert!(ds.dates().windows(2).all(|w| (w[1] - w[0]).num_days() == 1));
}

#[test]
fn ohlc_invariants_hold() {
    let ds = generate().unwrap();
    let (open, close, high, low) = (ds.open(), ds.close(), ds.high(), ds.low());

    assert_eq!(open[0], close[0]);
    assert_eq!(close[0], 2000.0);
    for t in 1..ds.len() {
        assert_eq!(open[t], close[t - 1], "open/close link broken at {t}");
    }
    for t in 0..ds.len() {
        assert!(high[t] >= open[t].max(close[t]), "high below body at {t}");
        assert!(low[t] <= open[t].min(close[t]), "low above body at {t}");
    }
}

#[test]
fn five_day_scenario() {
    let cfg = GeneratorConfig::with_range(ymd(2016, 1, 1), ymd(2016, 1, 5));
    assert_eq!(cfg.seed, 0);
    let ds = SyntheticMarket::new(cfg).generate().unwrap();

    assert_eq!(ds.len(), 5);
    assert_eq!(ds.open()[0], ds.close()[0]);
    assert_eq!(overview(&ds).latest_close, ds.close()[4]);

    // too short for either rolling view, yet the overview still renders
    let views = ViewSet::compute(&ds);
    assert_eq!(views.overview.latest_close, ds.close()[4]);
    assert_eq!(views.price_action.candles.len(), 5);
    assert!(matches!(
        views.prediction,
        Err(SynthError::InsufficientHistory { horizon: 30, available: 5 })
    ));
    let corr = views.correlation.unwrap();
    assert!(corr.points.iter().all(|(_, v)| v.is_none()));
}

#[test]
fn truncated_history_fails_prediction() {
    let ds = generate().unwrap();
    for len in [1, 2, 15, 29, 30] {
        let short = ds.truncated(len).unwrap();
        assert!(
            matches!(
                predict_trend(&short, TREND_HORIZON),
                Err(SynthError::InsufficientHistory { .. })
            ),
            "length {len} should be insufficient"
        );
    }
    assert!(predict_trend(&ds.truncated(31).unwrap(), TREND_HORIZON).is_ok());
}

#[test]
fn prediction_matches_thirty_day_change() {
    let ds = generate().unwrap();
    let p = predict_trend(&ds, TREND_HORIZON).unwrap();
    let close = ds.close();
    let n = close.len();
    let expected = (close[n - 1] - close[n - 31]) / close[n - 31];
    assert_eq!(p.pct_change, expected);
    assert_eq!(p.signal.to_string(), if expected > 0.0 { "UP" } else { "DOWN" });
}

#[test]
fn flat_close_window_has_no_correlation() {
    let base = generate().unwrap();
    let (dates, mut cols) = base.into_columns();

    // Close pinned for 90 days ending at index 299; Copper keeps varying.
    let flat = cols.close[210];
    for v in &mut cols.close[210..300] {
        *v = flat;
    }
    let ds = TimeSeriesDataset::new(dates, cols).unwrap();

    let corr = macro_correlation(&ds, CORRELATION_WINDOW).unwrap();
    assert_eq!(corr.points[299].1, None);
    assert!(corr.points[298].1.is_some());
    assert!(corr.points[300].1.is_some());

    let copper = ds.column(Field::Copper);
    assert!(copper[210..300].windows(2).any(|w| w[0] != w[1]));
}

#[test]
fn correlation_is_bounded() {
    let ds = generate().unwrap();
    let corr = macro_correlation(&ds, CORRELATION_WINDOW).unwrap();
    let leading = corr.points.iter().take_while(|(_, v)| v.is_none()).count();
    assert_eq!(leading, CORRELATION_WINDOW - 1);
    for (date, v) in corr.defined() {
        assert!(v.abs() <= 1.0 + 1e-9, "{date}: {v}");
    }
}
