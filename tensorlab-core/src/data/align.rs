//! Multi-instrument date alignment.
//!
//! Given per-instrument histories with divergent coverage (holidays, late
//! listings, missing rows), reduce every series to the intersection of all
//! date sets. Dates are only dropped, never filled or interpolated.

use crate::domain::{AlignedUniverse, DailyRecord, InstrumentUniverse};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors raised during alignment.
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("no common dates across the {instrument_count} instruments in the universe")]
    EmptyCalendar { instrument_count: usize },
}

/// Align every instrument to the common calendar.
///
/// The intersection of all per-instrument date sets is computed up front as
/// an immutable set; each series is then filtered against it. The input
/// universe is never mutated.
pub fn align_universe(universe: &InstrumentUniverse) -> Result<AlignedUniverse, AlignError> {
    let mut common: Option<BTreeSet<NaiveDate>> = None;
    for (_, records) in universe.iter() {
        let dates: BTreeSet<NaiveDate> = records.iter().map(|r| r.date).collect();
        common = Some(match common {
            None => dates,
            Some(acc) => acc.intersection(&dates).copied().collect(),
        });
    }

    let common = common.unwrap_or_default();
    if common.is_empty() {
        return Err(AlignError::EmptyCalendar {
            instrument_count: universe.instrument_count(),
        });
    }

    let mut series: BTreeMap<String, Vec<DailyRecord>> = BTreeMap::new();
    for (instrument, records) in universe.iter() {
        let filtered: Vec<DailyRecord> = records
            .iter()
            .filter(|r| common.contains(&r.date))
            .cloned()
            .collect();
        series.insert(instrument.to_string(), filtered);
    }

    let dates: Vec<NaiveDate> = common.into_iter().collect();
    Ok(AlignedUniverse::from_parts(
        universe.reference().to_string(),
        dates,
        series,
    ))
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

    fn universe_of(entries: &[(&str, &[&str])], reference: &str) -> InstrumentUniverse {
        let mut series = BTreeMap::new();
        for (id, dates) in entries {
            let records: Vec<DailyRecord> =
                dates.iter().map(|d| record(d, 100.0)).collect();
            series.insert(id.to_string(), records);
        }
        InstrumentUniverse::new(reference, series).unwrap()
    }

    #[test]
    fn missing_date_is_dropped_from_every_instrument() {
        // B is missing 2005-07-04; the date must disappear from A and C too.
        let universe = universe_of(
            &[
                ("A", &["2005-07-01", "2005-07-04", "2005-07-05"]),
                ("B", &["2005-07-01", "2005-07-05"]),
                ("C", &["2005-07-01", "2005-07-04", "2005-07-05"]),
            ],
            "A",
        );

        let aligned = align_universe(&universe).unwrap();
        let expected = vec![
            NaiveDate::from_ymd_opt(2005, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2005, 7, 5).unwrap(),
        ];
        assert_eq!(aligned.dates(), expected.as_slice());
        for (_, records) in aligned.iter() {
            let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
            assert_eq!(dates, expected);
        }
    }

    #[test]
    fn all_series_share_the_same_date_sequence() {
        let universe = universe_of(
            &[
                ("A", &["2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"]),
                ("B", &["2024-01-03", "2024-01-04", "2024-01-05", "2024-01-08"]),
                ("C", &["2024-01-02", "2024-01-03", "2024-01-05", "2024-01-08"]),
            ],
            "B",
        );

        let aligned = align_universe(&universe).unwrap();
        let reference_dates: Vec<NaiveDate> = aligned.series("B").unwrap().iter().map(|r| r.date).collect();
        assert_eq!(aligned.dates(), reference_dates.as_slice());
        for (_, records) in aligned.iter() {
            assert_eq!(records.len(), aligned.day_count());
            for (r, d) in records.iter().zip(aligned.dates()) {
                assert_eq!(r.date, *d);
            }
        }
    }

    #[test]
    fn disjoint_coverage_is_fatal() {
        let universe = universe_of(
            &[("A", &["2024-01-02"]), ("B", &["2024-01-03"])],
            "A",
        );

        let err = align_universe(&universe).unwrap_err();
        assert!(matches!(err, AlignError::EmptyCalendar { instrument_count: 2 }));
    }

    #[test]
    fn already_aligned_universe_is_unchanged() {
        let dates: &[&str] = &["2024-01-02", "2024-01-03"];
        let universe = universe_of(&[("A", dates), ("B", dates)], "A");

        let aligned = align_universe(&universe).unwrap();
        assert_eq!(aligned.day_count(), 2);
        assert_eq!(aligned.series("A").unwrap().len(), 2);
        assert_eq!(aligned.series("B").unwrap().len(), 2);
    }
}
