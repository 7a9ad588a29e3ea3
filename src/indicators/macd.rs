// =============================================================================
// Moving Average Convergence/Divergence (MACD) line
// =============================================================================
//
//   MACD = EMA(fast) - EMA(slow)
//
// Defined on the slow EMA's domain, i.e. from sample index `slow - 1`. The
// signal line and histogram are left to downstream consumers.
// =============================================================================

use crate::types::{IndicatorSeries, PriceHistory};

use super::ema::ema_values;
use super::dated;

pub const MACD_FAST_PERIOD: usize = 12;
pub const MACD_SLOW_PERIOD: usize = 26;

/// MACD line with the standard 12/26 periods.
pub fn calculate_macd(history: &PriceHistory) -> IndicatorSeries {
    calculate_macd_with(history, MACD_FAST_PERIOD, MACD_SLOW_PERIOD)
}

/// MACD line for arbitrary periods.
///
/// Returns an empty series when `fast == 0`, `fast >= slow`, or the history is
/// shorter than `slow`.
pub fn calculate_macd_with(history: &PriceHistory, fast: usize, slow: usize) -> IndicatorSeries {
    if fast == 0 || fast >= slow {
        return IndicatorSeries::new();
    }

    let closes = history.closes();
    let slow_ema = ema_values(&closes, slow);
    if slow_ema.is_empty() {
        return IndicatorSeries::new();
    }
    let fast_ema = ema_values(&closes, fast);

    // fast_ema[j] belongs to close index j + fast - 1; realign to slow - 1.
    let values = fast_ema[slow - fast..]
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();

    dated(history, slow - 1, values)
}
