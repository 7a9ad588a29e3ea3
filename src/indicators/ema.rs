// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   k     = 2 / (period + 1)
//   EMA_t = (close_t - EMA_{t-1}) * k + EMA_{t-1}
//
// The very first EMA value is seeded with the SMA of the first `period` closes.
// Each step only looks at the previous EMA and the current close.
// =============================================================================

use crate::types::{IndicatorSeries, PriceHistory};

use super::dated;

/// Compute the EMA series for `history` and look-back `period`.
///
/// The first entry sits on the date of sample `period - 1` and equals the
/// simple average of the first `period` closes.
///
/// # Edge cases
/// - `period == 0` => empty series
/// - fewer than `period` samples => empty series
/// - Non-finite closes are not filtered; they poison every later value.
pub fn calculate_ema(history: &PriceHistory, period: usize) -> IndicatorSeries {
    let values = ema_values(&history.closes(), period);
    if values.is_empty() {
        return IndicatorSeries::new();
    }
    dated(history, period - 1, values)
}

/// Raw EMA values aligned to `closes[period - 1..]`.
pub(crate) fn ema_values(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let k = 2.0 / (period + 1) as f64;

    // Seed: SMA of the first `period` values.
    let seed = closes[..period].iter().sum::<f64>() / period as f64;

    let mut result = Vec::with_capacity(closes.len() - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &close in &closes[period..] {
        let ema = (close - prev) * k + prev;
        result.push(ema);
        prev = ema;
    }

    result
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{ascending, day, history};

    // ---- ema_values ------------------------------------------------------

    #[test]
    fn ema_empty_input() {
        assert!(ema_values(&[], 5).is_empty());
    }

    #[test]
    fn ema_period_zero() {
        assert!(ema_values(&[1.0, 2.0, 3.0], 0).is_empty());
        assert!(calculate_ema(&history(&[1.0, 2.0, 3.0]), 0).is_empty());
    }

    #[test]
    fn ema_insufficient_data() {
        assert!(calculate_ema(&history(&[1.0, 2.0]), 5).is_empty());
    }

    #[test]
    fn ema_known_values() {
        // 5-period EMA of [1..=10]: seed = 3.0, k = 1/3.
        let closes = ascending(10);
        let ema = ema_values(&closes, 5);
        assert_eq!(ema.len(), 6);

        let k = 2.0 / 6.0;
        let mut expected = 3.0;
        let mut expected_vec = vec![expected];
        for &c in &closes[5..] {
            expected = (c - expected) * k + expected;
            expected_vec.push(expected);
        }
        for (a, b) in ema.iter().zip(expected_vec.iter()) {
            assert!((a - b).abs() < 1e-10, "got {a}, expected {b}");
        }
    }

    // ---- calculate_ema ---------------------------------------------------

    #[test]
    fn ema_seed_is_simple_average() {
        let closes = [4.0, 8.0, 6.0, 10.0, 12.0, 7.0];
        let series = calculate_ema(&history(&closes), 4);
        assert_eq!(series.len(), 3);
        assert!(!series.contains_key(&day(2)));
        assert!((series[&day(3)] - 7.0).abs() < 1e-10);
    }

    #[test]
    fn ema_recurrence_uses_previous_value() {
        let series = calculate_ema(&history(&[2.0, 4.0, 6.0, 12.0]), 3);
        // seed 4.0, k = 0.5 => (12 - 4) * 0.5 + 4 = 8
        assert!((series[&day(2)] - 4.0).abs() < 1e-10);
        assert!((series[&day(3)] - 8.0).abs() < 1e-10);
    }

    #[test]
    fn ema_constant_series() {
        let series = calculate_ema(&history(&[100.0; 40]), 12);
        assert_eq!(series.len(), 29);
        for &v in series.values() {
            assert!((v - 100.0).abs() < 1e-10);
        }
    }

    #[test]
    fn ema_propagates_nan() {
        let series = calculate_ema(&history(&[1.0, 2.0, 3.0, f64::NAN, 5.0]), 3);
        assert_eq!(series.len(), 3);
        assert!((series[&day(2)] - 2.0).abs() < 1e-10);
        assert!(series[&day(3)].is_nan());
        assert!(series[&day(4)].is_nan());
    }
}
