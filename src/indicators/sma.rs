// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// SMA_i = (close_{i-period+1} + ... + close_i) / period
//
// Each window is summed from scratch rather than maintained as a running sum,
// so every value is the exact mean of its window.
// =============================================================================

use crate::types::{IndicatorSeries, PriceHistory};

use super::dated;

/// Compute the SMA series, one entry per sample from index `period - 1`.
///
/// Returns an empty series when `period == 0` or the history is shorter than
/// `period`.
pub fn calculate_sma(history: &PriceHistory, period: usize) -> IndicatorSeries {
    let closes = history.closes();
    if period == 0 || closes.len() < period {
        return IndicatorSeries::new();
    }

    let values = closes
        .windows(period)
        .map(|window| window.iter().sum::<f64>() / period as f64)
        .collect();

    dated(history, period - 1, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{day, history};
    use crate::types::PriceSample;

    #[test]
    fn sma_known_values() {
        let series = calculate_sma(&history(&[10.0, 11.0, 12.0, 11.0, 13.0]), 3);
        assert_eq!(series.len(), 3);
        assert!(!series.contains_key(&day(1)));
        assert!((series[&day(2)] - 11.0).abs() < 1e-10);
        assert!((series[&day(3)] - 34.0 / 3.0).abs() < 1e-10);
        assert!((series[&day(4)] - 12.0).abs() < 1e-10);
    }

    #[test]
    fn sma_constant_series() {
        let series = calculate_sma(&history(&[42.5; 30]), 7);
        assert_eq!(series.len(), 24);
        for &v in series.values() {
            assert!((v - 42.5).abs() < 1e-10, "expected 42.5, got {v}");
        }
    }

    #[test]
    fn sma_insufficient_data() {
        assert!(calculate_sma(&history(&[1.0, 2.0]), 3).is_empty());
        assert!(calculate_sma(&history(&[]), 3).is_empty());
    }

    #[test]
    fn sma_period_zero() {
        assert!(calculate_sma(&history(&[1.0, 2.0, 3.0]), 0).is_empty());
    }

    #[test]
    fn sma_period_equals_length() {
        let series = calculate_sma(&history(&[2.0, 4.0, 6.0]), 3);
        assert_eq!(series.len(), 1);
        assert!((series[&day(2)] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn sma_ignores_input_order() {
        let sorted = history(&[10.0, 11.0, 12.0, 11.0, 13.0]);
        let mut shuffled: Vec<PriceSample> = sorted.samples().to_vec();
        shuffled.reverse();
        shuffled.swap(0, 2);
        let shuffled = PriceHistory::new(shuffled).unwrap();
        assert_eq!(calculate_sma(&sorted, 3), calculate_sma(&shuffled, 3));
    }

    #[test]
    fn sma_propagates_nan() {
        let series = calculate_sma(&history(&[1.0, f64::NAN, 3.0, 4.0, 5.0]), 2);
        assert!(series[&day(1)].is_nan());
        assert!(series[&day(2)].is_nan());
        assert!((series[&day(4)] - 4.5).abs() < 1e-10);
    }
}
