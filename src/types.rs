// =============================================================================
// Shared types: price samples and the sorted history the indicators run on
// =============================================================================

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{InvalidInput, Result};

/// Date-keyed output of a single indicator. Serializes as
/// `{ "2024-01-15": 63.2, ... }`.
pub type IndicatorSeries = BTreeMap<NaiveDate, f64>;

/// One daily observation of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub date: NaiveDate,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PriceSample {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close,
            volume: None,
        }
    }
}

/// A price record as handed over by a market-data collaborator, before the
/// date has been validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: String,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

/// Samples sorted ascending by date with no duplicate dates.
///
/// Every indicator takes a `PriceHistory` so ordering is established once, at
/// construction, and the algorithms can work on plain indices afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceHistory {
    samples: Vec<PriceSample>,
}

impl PriceHistory {
    /// Sort `samples` by date. Fails if two samples share a date.
    pub fn new(mut samples: Vec<PriceSample>) -> std::result::Result<Self, InvalidInput> {
        samples.sort_by_key(|s| s.date);

        if let Some(pair) = samples.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(InvalidInput::DuplicateDate(pair[0].date));
        }

        Ok(Self { samples })
    }

    /// Validate raw records and build a history from them.
    pub fn from_records(records: Vec<PriceRecord>) -> std::result::Result<Self, InvalidInput> {
        let samples = records
            .into_iter()
            .map(|r| -> std::result::Result<PriceSample, InvalidInput> {
                Ok(PriceSample {
                    date: parse_date(&r.date)?,
                    close: r.close,
                    volume: r.volume,
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let history = Self::new(samples)?;
        debug!(
            samples = history.len(),
            first = ?history.first_date(),
            last = ?history.last_date(),
            "price history built"
        );
        Ok(history)
    }

    /// Parse a JSON array of `{date, close, volume?}` records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<PriceRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records)?)
    }

    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    pub fn closes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.close).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.samples.first().map(|s| s.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.samples.last().map(|s| s.date)
    }

    /// Close of the most recent sample.
    pub fn last_close(&self) -> Option<f64> {
        self.samples.last().map(|s| s.close)
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its calendar date is kept).
pub fn parse_date(raw: &str) -> std::result::Result<NaiveDate, InvalidInput> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| InvalidInput::UnparseableDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn history_sorts_by_date() {
        let history = PriceHistory::new(vec![
            PriceSample::new(d(3), 12.0),
            PriceSample::new(d(1), 10.0),
            PriceSample::new(d(2), 11.0),
        ])
        .unwrap();
        assert_eq!(history.closes(), vec![10.0, 11.0, 12.0]);
        assert_eq!(history.first_date(), Some(d(1)));
        assert_eq!(history.last_close(), Some(12.0));
    }

    #[test]
    fn history_rejects_duplicate_dates() {
        let err = PriceHistory::new(vec![
            PriceSample::new(d(2), 10.0),
            PriceSample::new(d(1), 10.0),
            PriceSample::new(d(2), 11.0),
        ])
        .unwrap_err();
        assert_eq!(err, InvalidInput::DuplicateDate(d(2)));
    }

    #[test]
    fn parse_date_formats() {
        assert_eq!(parse_date("2024-01-05").unwrap(), d(5));
        assert_eq!(parse_date("2024-01-05T00:00:00.000Z").unwrap(), d(5));
        assert_eq!(parse_date(" 2024-01-05 ").unwrap(), d(5));
        assert!(matches!(
            parse_date("05/01/2024"),
            Err(InvalidInput::UnparseableDate(_))
        ));
    }

    #[test]
    fn from_json_parses_records() {
        let json = r#"[
            {"date": "2024-01-02", "close": 11.5, "volume": 900},
            {"date": "2024-01-01", "close": 10.0}
        ]"#;
        let history = PriceHistory::from_json(json).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.samples()[0].volume, None);
        assert_eq!(history.samples()[1].volume, Some(900.0));
    }

    #[test]
    fn from_json_rejects_non_numeric_close() {
        let json = r#"[{"date": "2024-01-01", "close": "ten"}]"#;
        assert!(matches!(
            PriceHistory::from_json(json),
            Err(AnalysisError::Json(_))
        ));
    }

    #[test]
    fn from_json_rejects_bad_date() {
        let json = r#"[{"date": "yesterday", "close": 1.0}]"#;
        assert!(matches!(
            PriceHistory::from_json(json),
            Err(AnalysisError::InvalidInput(InvalidInput::UnparseableDate(_)))
        ));
    }

    #[test]
    fn empty_history() {
        let history = PriceHistory::new(Vec::new()).unwrap();
        assert!(history.is_empty());
        assert_eq!(history.last_close(), None);
    }
}
