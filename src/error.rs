// =============================================================================
// Error types
// =============================================================================
//
// Indicator and chunking routines never fail: insufficient history yields an
// empty series. Errors only arise while turning raw caller records into a
// `PriceHistory`.

use chrono::NaiveDate;
use thiserror::Error;

/// A caller handed the engine something that violates the input contract.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidInput {
    /// The date string is neither `YYYY-MM-DD` nor an RFC 3339 timestamp.
    #[error("unparseable date {0:?}")]
    UnparseableDate(String),

    /// Two samples share the same calendar date.
    #[error("duplicate sample for {0}")]
    DuplicateDate(NaiveDate),
}

/// The unified error type for the analysis crate.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("malformed price records")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
