// =============================================================================
// Stockbook Analysis — indicator engine and text chunker
// =============================================================================
//
// Two independent, stateless components:
//
// - `indicators` turns a sorted daily price history into date-keyed SMA, EMA,
//   RSI and MACD series; `analysis` bundles them for the scoring step.
// - `chunker` splits long text into bounded chunks for per-chunk processing.
//
// Everything here is synchronous and free of shared mutable state, so calls
// can run concurrently from any number of threads or tasks.
// =============================================================================

pub mod analysis;
pub mod chunker;
pub mod config;
pub mod error;
pub mod indicators;
pub mod types;

pub use analysis::{compute_indicators, IndicatorSettings, SignalSnapshot, TechnicalIndicators};
pub use chunker::{chunk_text, split_into_chunks, ChunkBudget};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, InvalidInput};
pub use types::{IndicatorSeries, PriceHistory, PriceRecord, PriceSample};
