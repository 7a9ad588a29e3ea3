// =============================================================================
// Technical Analysis Bundle
// =============================================================================
//
// Computes the configured indicator set for one instrument in a single call
// and condenses it into the form the scoring step consumes: the last few
// values per indicator plus a handful of coarse signals.
//
// Each indicator degrades on its own. A history too short for the SMA still
// yields RSI and MACD when those have enough samples.
//
// Serialization is one-way: NaN values propagated from corrupt closes are
// written as JSON `null`, which cannot be read back as `f64`.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::indicators::{calculate_ema, calculate_macd, calculate_rsi, calculate_sma};
use crate::types::{IndicatorSeries, PriceHistory};

// =============================================================================
// Settings
// =============================================================================

fn default_sma_period() -> usize {
    40
}

fn default_rsi_period() -> usize {
    28
}

fn default_latest_window() -> usize {
    5
}

fn default_trend_ema_period() -> usize {
    50
}

fn default_overbought() -> f64 {
    70.0
}

fn default_oversold() -> f64 {
    30.0
}

/// Look-back periods and signal thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSettings {
    #[serde(default = "default_sma_period")]
    pub sma_period: usize,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// How many of the most recent values per indicator are forwarded.
    #[serde(default = "default_latest_window")]
    pub latest_window: usize,

    /// Long EMA the SMA is compared against for golden / death cross.
    #[serde(default = "default_trend_ema_period")]
    pub trend_ema_period: usize,

    /// RSI strictly above this is reported as overbought.
    #[serde(default = "default_overbought")]
    pub overbought: f64,

    /// RSI strictly below this is reported as oversold.
    #[serde(default = "default_oversold")]
    pub oversold: f64,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            sma_period: default_sma_period(),
            rsi_period: default_rsi_period(),
            latest_window: default_latest_window(),
            trend_ema_period: default_trend_ema_period(),
            overbought: default_overbought(),
            oversold: default_oversold(),
        }
    }
}

// =============================================================================
// Indicator bundle
// =============================================================================

/// One series per indicator kind. Serializes as
/// `{ "sma": {date: value}, "rsi": {...}, "macd": {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TechnicalIndicators {
    pub sma: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub macd: IndicatorSeries,
}

/// Compute SMA, RSI and the 12/26 MACD line for `history`.
pub fn compute_indicators(history: &PriceHistory, settings: &IndicatorSettings) -> TechnicalIndicators {
    let indicators = TechnicalIndicators {
        sma: calculate_sma(history, settings.sma_period),
        rsi: calculate_rsi(history, settings.rsi_period),
        macd: calculate_macd(history),
    };

    for (name, series) in indicators.named() {
        if series.is_empty() {
            warn!(
                indicator = name,
                samples = history.len(),
                "indicator unavailable: insufficient history"
            );
        }
    }

    debug!(
        samples = history.len(),
        sma = indicators.sma.len(),
        rsi = indicators.rsi.len(),
        macd = indicators.macd.len(),
        "indicators computed"
    );

    indicators
}

impl TechnicalIndicators {
    /// Every indicator empty; what a caller reports when no history could be
    /// obtained at all.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_unavailable(&self) -> bool {
        self.named().iter().all(|(_, s)| s.is_empty())
    }

    /// Keep only the `n` most recent values of each series.
    pub fn latest(&self, n: usize) -> Self {
        Self {
            sma: latest_values(&self.sma, n),
            rsi: latest_values(&self.rsi, n),
            macd: latest_values(&self.macd, n),
        }
    }

    /// The window forwarded to the scoring step: the last
    /// `settings.latest_window` values of each series.
    pub fn for_scoring(&self, settings: &IndicatorSettings) -> Self {
        self.latest(settings.latest_window)
    }

    /// Classify the most recent values into coarse signals.
    pub fn signals(&self, history: &PriceHistory, settings: &IndicatorSettings) -> SignalSnapshot {
        let rsi_zone = last_finite(&self.rsi).map(|rsi| {
            if rsi > settings.overbought {
                RsiZone::Overbought
            } else if rsi < settings.oversold {
                RsiZone::Oversold
            } else {
                RsiZone::Neutral
            }
        });

        let macd_bias = last_finite(&self.macd).map(|macd| {
            if macd > 0.0 {
                Bias::Bullish
            } else if macd < 0.0 {
                Bias::Bearish
            } else {
                Bias::Neutral
            }
        });

        let price_vs_sma = match (history.last_close(), last_finite(&self.sma)) {
            (Some(close), Some(sma)) if close.is_finite() => Some(if close > sma {
                PricePosition::Above
            } else if close < sma {
                PricePosition::Below
            } else {
                PricePosition::At
            }),
            _ => None,
        };

        let trend_ema = calculate_ema(history, settings.trend_ema_period);
        let cross = match (last_finite(&self.sma), last_finite(&trend_ema)) {
            (Some(sma), Some(ema)) => Some(if sma > ema {
                Cross::Golden
            } else if sma < ema {
                Cross::Death
            } else {
                Cross::Neutral
            }),
            _ => None,
        };

        let mut labels = Vec::new();
        match cross {
            Some(Cross::Golden) => labels.push("Golden Cross".to_string()),
            Some(Cross::Death) => labels.push("Death Cross".to_string()),
            _ => {}
        }
        match rsi_zone {
            Some(RsiZone::Overbought) => labels.push("Overbought".to_string()),
            Some(RsiZone::Oversold) => labels.push("Oversold".to_string()),
            _ => {}
        }
        match macd_bias {
            Some(Bias::Bullish) => labels.push("MACD Bullish".to_string()),
            Some(Bias::Bearish) => labels.push("MACD Bearish".to_string()),
            _ => {}
        }
        match price_vs_sma {
            Some(PricePosition::Above) => labels.push("Price Above SMA".to_string()),
            Some(PricePosition::Below) => labels.push("Price Below SMA".to_string()),
            _ => {}
        }

        SignalSnapshot {
            cross,
            rsi_zone,
            macd_bias,
            price_vs_sma,
            labels,
        }
    }

    fn named(&self) -> [(&'static str, &IndicatorSeries); 3] {
        [("sma", &self.sma), ("rsi", &self.rsi), ("macd", &self.macd)]
    }
}

/// The `n` most recent entries of `series`.
pub fn latest_values(series: &IndicatorSeries, n: usize) -> IndicatorSeries {
    series
        .iter()
        .rev()
        .take(n)
        .map(|(date, value)| (*date, *value))
        .collect()
}

fn last_finite(series: &IndicatorSeries) -> Option<f64> {
    series.values().next_back().copied().filter(|v| v.is_finite())
}

// =============================================================================
// Signals
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

/// Short SMA relative to the long trend EMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cross {
    Golden,
    Death,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricePosition {
    Above,
    Below,
    At,
}

impl std::fmt::Display for RsiZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overbought => write!(f, "OVERBOUGHT"),
            Self::Oversold => write!(f, "OVERSOLD"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Coarse reading of the latest indicator values. `None` fields mean the
/// underlying indicator was unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub cross: Option<Cross>,
    pub rsi_zone: Option<RsiZone>,
    pub macd_bias: Option<Bias>,
    pub price_vs_sma: Option<PricePosition>,
    pub labels: Vec<String>,
}
