// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Seed average gain / average loss from the first `period` deltas
//          (closes 1..=period). Nothing is emitted for the seed region.
// Step 2 — For every later close apply Wilder's smoothing:
//            avg_gain = (avg_gain * (period - 1) + gain) / period
//            avg_loss = (avg_loss * (period - 1) + loss) / period
// Step 3 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// A zero average loss is left to IEEE-754: RS becomes +inf and RSI lands on
// exactly 100. Only the 0/0 case of a perfectly flat tape is special-cased.
// =============================================================================

use crate::types::{IndicatorSeries, PriceHistory};

use super::dated;

/// RSI reported when neither gains nor losses have been observed.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Compute the RSI series for `history` and `period`.
///
/// The first value sits on sample index `period + 1`.
///
/// # Edge cases
/// - `period == 0` => empty series
/// - fewer than `period + 1` samples => empty series (seed impossible)
/// - exactly `period + 1` samples => empty series (seed only)
/// - Non-finite closes propagate as NaN.
pub fn calculate_rsi(history: &PriceHistory, period: usize) -> IndicatorSeries {
    let values = rsi_values(&history.closes(), period);
    if values.is_empty() {
        return IndicatorSeries::new();
    }
    dated(history, period + 1, values)
}

/// Raw RSI values aligned to `closes[period + 1..]`.
fn rsi_values(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period + 1 {
        return Vec::new();
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    // --- Seed ----------------------------------------------------------------
    let (gains, losses) = deltas[..period].iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d >= 0.0 {
            (g + d, l)
        } else {
            (g, l - d)
        }
    });

    let period_f = period as f64;
    let mut avg_gain = gains / period_f;
    let mut avg_loss = losses / period_f;

    // --- Wilder's smoothing --------------------------------------------------
    let mut result = Vec::with_capacity(deltas.len() - period);
    for &delta in &deltas[period..] {
        if delta >= 0.0 {
            avg_gain = (avg_gain * (period_f - 1.0) + delta) / period_f;
            avg_loss = (avg_loss * (period_f - 1.0)) / period_f;
        } else {
            avg_gain = (avg_gain * (period_f - 1.0)) / period_f;
            avg_loss = (avg_loss * (period_f - 1.0) - delta) / period_f;
        }
        result.push(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain == 0.0 && avg_loss == 0.0 {
        return NEUTRAL_RSI;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
