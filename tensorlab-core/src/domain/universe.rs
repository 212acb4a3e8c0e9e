//! InstrumentUniverse — the immutable input universe, and its aligned form.
//!
//! `InstrumentUniverse` holds possibly-divergent per-instrument histories as
//! delivered by the ingestion layer. `AlignedUniverse` is produced by the
//! date aligner and witnesses the alignment invariant at the type level:
//! every series sits exactly on the common calendar.

use crate::domain::record::DailyRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while constructing a universe.
#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("reference instrument '{reference}' is not in the universe")]
    ReferenceNotFound { reference: String },

    #[error("universe is empty")]
    Empty,

    #[error("instrument '{instrument}' has out-of-order dates at position {position}")]
    OutOfOrderDates { instrument: String, position: usize },
}

/// Mapping from instrument identifier to its daily history, with one
/// identifier designated as the reference instrument.
///
/// Construction validates that the reference is present and every series is
/// strictly chronological. The universe is immutable after construction; the
/// aligner produces a new [`AlignedUniverse`] rather than mutating this one.
#[derive(Debug, Clone)]
pub struct InstrumentUniverse {
    reference: String,
    series: BTreeMap<String, Vec<DailyRecord>>,
}

impl InstrumentUniverse {
    pub fn new(
        reference: impl Into<String>,
        series: BTreeMap<String, Vec<DailyRecord>>,
    ) -> Result<Self, UniverseError> {
        let reference = reference.into();
        if series.is_empty() {
            return Err(UniverseError::Empty);
        }
        if !series.contains_key(&reference) {
            return Err(UniverseError::ReferenceNotFound { reference });
        }
        for (instrument, records) in &series {
            for (i, pair) in records.windows(2).enumerate() {
                if pair[1].date <= pair[0].date {
                    return Err(UniverseError::OutOfOrderDates {
                        instrument: instrument.clone(),
                        position: i + 1,
                    });
                }
            }
        }
        Ok(Self { reference, series })
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Instrument identifiers in deterministic (lexicographic) order.
    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|s| s.as_str())
    }

    pub fn instrument_count(&self) -> usize {
        self.series.len()
    }

    pub fn series(&self, instrument: &str) -> Option<&[DailyRecord]> {
        self.series.get(instrument).map(|v| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DailyRecord])> {
        self.series.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// A universe on a common calendar: every instrument has exactly one record
/// per calendar date, in calendar order.
///
/// Only the date aligner constructs this type, so holding one is proof the
/// alignment invariant holds.
#[derive(Debug, Clone)]
pub struct AlignedUniverse {
    reference: String,
    dates: Vec<NaiveDate>,
    series: BTreeMap<String, Vec<DailyRecord>>,
}

impl AlignedUniverse {
    /// Invariant: every series in `series` has the same length as `dates`
    /// and identical date sequence. Upheld by the aligner (crate-internal).
    pub(crate) fn from_parts(
        reference: String,
        dates: Vec<NaiveDate>,
        series: BTreeMap<String, Vec<DailyRecord>>,
    ) -> Self {
        debug_assert!(series
            .values()
            .all(|records| records.len() == dates.len()
                && records.iter().zip(&dates).all(|(r, d)| r.date == *d)));
        Self {
            reference,
            dates,
            series,
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// The common calendar, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of days in the common calendar.
    pub fn day_count(&self) -> usize {
        self.dates.len()
    }

    /// Instrument identifiers in deterministic (lexicographic) order.
    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|s| s.as_str())
    }

    pub fn instrument_count(&self) -> usize {
        self.series.len()
    }

    /// The full aligned history for one instrument.
    pub fn series(&self, instrument: &str) -> Option<&[DailyRecord]> {
        self.series.get(instrument).map(|v| v.as_slice())
    }

    /// Number of aligned records, across all instruments, with a NaN close
    /// or indicator value (warm-up rows from the upstream indicator
    /// pipeline). NaN flags encode to 0 silently, so callers should surface
    /// a nonzero count to the operator.
    pub fn gap_record_count(&self) -> usize {
        self.series
            .values()
            .flatten()
            .filter(|record| record.has_gaps())
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DailyRecord])> {
        self.series.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::IndicatorSet;

    fn record(date: &str, close: f64) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            close,
            indicators: IndicatorSet {
                sma: close,
                wma: close,
                momentum: 0.0,
                stoch_k: 50.0,
                stoch_d: 50.0,
                macd: 0.0,
                rsi: 50.0,
                williams_r: -50.0,
                cci: 0.0,
                ad: 0.0,
            },
        }
    }

    #[test]
    fn universe_requires_reference_key() {
        let mut series = BTreeMap::new();
        series.insert("SPX".to_string(), vec![record("2024-01-02", 100.0)]);

        let err = InstrumentUniverse::new("NDX", series).unwrap_err();
        assert!(matches!(err, UniverseError::ReferenceNotFound { .. }));
    }

    #[test]
    fn universe_rejects_empty() {
        let err = InstrumentUniverse::new("NDX", BTreeMap::new()).unwrap_err();
        assert!(matches!(err, UniverseError::Empty));
    }

    #[test]
    fn universe_rejects_unsorted_dates() {
        let mut series = BTreeMap::new();
        series.insert(
            "NDX".to_string(),
            vec![record("2024-01-03", 100.0), record("2024-01-02", 101.0)],
        );

        let err = InstrumentUniverse::new("NDX", series).unwrap_err();
        assert!(matches!(err, UniverseError::OutOfOrderDates { position: 1, .. }));
    }

    #[test]
    fn universe_rejects_duplicate_dates() {
        let mut series = BTreeMap::new();
        series.insert(
            "NDX".to_string(),
            vec![record("2024-01-02", 100.0), record("2024-01-02", 101.0)],
        );

        assert!(InstrumentUniverse::new("NDX", series).is_err());
    }

    #[test]
    fn gap_record_count_counts_nan_rows() {
        let mut warm_up = record("2024-01-02", 100.0);
        warm_up.indicators.sma = f64::NAN;
        let mut series = BTreeMap::new();
        series.insert(
            "NDX".to_string(),
            vec![warm_up, record("2024-01-03", 101.0)],
        );
        series.insert(
            "SPX".to_string(),
            vec![record("2024-01-02", 50.0), record("2024-01-03", 51.0)],
        );

        let universe = InstrumentUniverse::new("NDX", series).unwrap();
        let aligned = crate::data::align::align_universe(&universe).unwrap();
        assert_eq!(aligned.gap_record_count(), 1);
    }

    #[test]
    fn instruments_are_lexicographic() {
        let mut series = BTreeMap::new();
        series.insert("SPX".to_string(), vec![record("2024-01-02", 100.0)]);
        series.insert("DJI".to_string(), vec![record("2024-01-02", 200.0)]);
        series.insert("NDX".to_string(), vec![record("2024-01-02", 300.0)]);

        let universe = InstrumentUniverse::new("NDX", series).unwrap();
        let ids: Vec<&str> = universe.instruments().collect();
        assert_eq!(ids, vec!["DJI", "NDX", "SPX"]);
    }
}
