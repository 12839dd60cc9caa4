//! Rolling-window statistics over aligned series.

use crate::error::SynthError;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Pearson correlation of two equally long slices.
///
/// `None` when the slices differ in length, hold fewer than two points, or
/// either side has zero spread. Constant input is detected exactly rather than
/// through the computed variance, which can come out as a tiny nonzero number.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 || is_constant(x) || is_constant(y) {
        return None;
    }

    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if r.is_finite() {
        Some(r.clamp(-1.0, 1.0))
    } else {
        None
    }
}

/// Trailing-window Pearson correlation aligned to the input index.
///
/// Entry `i` covers `x[i + 1 - window..=i]`; the first `window - 1` entries are
/// `None`. Series are compared over the shorter of the two lengths.
pub fn rolling_correlation(
    x: &[f64],
    y: &[f64],
    window: usize,
) -> Result<Vec<Option<f64>>, SynthError> {
    if window == 0 {
        return Err(SynthError::InvalidWindow(window));
    }

    let n = x.len().min(y.len());
    let out = (0..n)
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let lo = i + 1 - window;
            pearson(&x[lo..=i], &y[lo..=i])
        })
        .collect();
    Ok(out)
}

/// Fractional change over `periods` steps: `(v[i] - v[i-periods]) / v[i-periods]`.
///
/// `None` for the first `periods` entries and where the base value is zero.
pub fn pct_change(values: &[f64], periods: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if periods == 0 {
                return Some(0.0);
            }
            let base = values[i.checked_sub(periods)?];
            if base == 0.0 {
                None
            } else {
                Some((values[i] - base) / base)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_pearson_perfect() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        let r = pearson(&x, &y).unwrap();
        assert!((r - 1.0).abs() < 1e-12);

        let inv: Vec<f64> = y.iter().map(|v| -v).collect();
        let r = pearson(&x, &inv).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_known_value() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 3.0, 2.0, 4.0];
        // cov = 1.0 (sum 4 / n), var_x = var_y = 1.25
        let r = pearson(&x, &y).unwrap();
        assert!((r - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_side() {
        assert_eq!(pearson(&[3.3, 3.3, 3.3], &[1.0, 2.0, 4.0]), None);
        assert_eq!(pearson(&[1.0, 2.0, 4.0], &[0.7, 0.7, 0.7]), None);
        assert_eq!(pearson(&[1.0], &[2.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[2.0]), None);
    }

    #[test]
    fn test_rolling_leading_gaps() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..10).map(|i| (i * i) as f64).collect();
        let out = rolling_correlation(&x, &y, 4).unwrap();
        assert_eq!(out.len(), 10);
        assert!(out[..3].iter().all(Option::is_none));
        assert!(out[3..].iter().all(Option::is_some));
    }

    #[test]
    fn test_rolling_window_one_is_undefined() {
        let out = rolling_correlation(&[1.0, 2.0], &[3.0, 5.0], 1).unwrap();
        assert_eq!(out, vec![None, None]);
    }

    #[test]
    fn test_rolling_rejects_zero_window() {
        assert!(matches!(
            rolling_correlation(&[1.0], &[1.0], 0),
            Err(SynthError::InvalidWindow(0))
        ));
    }

    #[test]
    fn test_pct_change() {
        let out = pct_change(&[100.0, 110.0, 99.0, 0.0, 5.0], 1);
        assert_eq!(out[0], None);
        assert!((out[1].unwrap() - 0.1).abs() < 1e-12);
        assert!((out[2].unwrap() + 0.1).abs() < 1e-12);
        assert_eq!(out[3], Some(-1.0));
        assert_eq!(out[4], None);

        let lagged = pct_change(&[100.0, 1.0, 150.0], 2);
        assert_eq!(lagged, vec![None, None, Some(0.5)]);
    }
}
