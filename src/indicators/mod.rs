// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators handed to the
// scoring step. Every function takes a sorted `PriceHistory` and returns a
// date-keyed `IndicatorSeries`. Insufficient history yields an empty (or
// partial) series rather than an error, so callers can report a single
// indicator as unavailable without failing the whole request.
// =============================================================================

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::calculate_ema;
pub use macd::{calculate_macd, calculate_macd_with, MACD_FAST_PERIOD, MACD_SLOW_PERIOD};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use crate::types::{IndicatorSeries, PriceHistory};

/// Attach `values` to the history's dates, starting at sample index `offset`.
fn dated(history: &PriceHistory, offset: usize, values: Vec<f64>) -> IndicatorSeries {
    history
        .samples()
        .iter()
        .skip(offset)
        .zip(values)
        .map(|(sample, value)| (sample.date, value))
        .collect()
}
