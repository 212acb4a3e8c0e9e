//! Per-instrument CSV ingestion.
//!
//! The upstream indicator pipeline writes one CSV per instrument with columns
//! `Date`, `Close`, and the ten indicator columns (`SMA`, `WMA`, `MOM`,
//! `K %`, `D %`, `MACD`, `RSI`, `W %R`, `CCI`, `AD`). Extra price columns are
//! tolerated and ignored. Empty indicator cells (warm-up rows) become NaN.
//!
//! An instrument whose file is missing is simply absent from the universe;
//! nothing is repaired or substituted.

use crate::domain::{DailyRecord, IndicatorSet, InstrumentUniverse, UniverseError};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading instrument CSVs.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv parse error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("no instrument CSV files found in {dir}")]
    NoInstruments { dir: String },

    #[error(transparent)]
    Universe(#[from] UniverseError),
}

/// One CSV row as written by the indicator pipeline. Indicator cells may be
/// empty on warm-up rows.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "SMA")]
    sma: Option<f64>,
    #[serde(rename = "WMA")]
    wma: Option<f64>,
    #[serde(rename = "MOM")]
    momentum: Option<f64>,
    #[serde(rename = "K %")]
    stoch_k: Option<f64>,
    #[serde(rename = "D %")]
    stoch_d: Option<f64>,
    #[serde(rename = "MACD")]
    macd: Option<f64>,
    #[serde(rename = "RSI")]
    rsi: Option<f64>,
    #[serde(rename = "W %R")]
    williams_r: Option<f64>,
    #[serde(rename = "CCI")]
    cci: Option<f64>,
    #[serde(rename = "AD")]
    ad: Option<f64>,
}

impl From<CsvRow> for DailyRecord {
    fn from(row: CsvRow) -> Self {
        let nan = f64::NAN;
        DailyRecord {
            date: row.date,
            close: row.close,
            indicators: IndicatorSet {
                sma: row.sma.unwrap_or(nan),
                wma: row.wma.unwrap_or(nan),
                momentum: row.momentum.unwrap_or(nan),
                stoch_k: row.stoch_k.unwrap_or(nan),
                stoch_d: row.stoch_d.unwrap_or(nan),
                macd: row.macd.unwrap_or(nan),
                rsi: row.rsi.unwrap_or(nan),
                williams_r: row.williams_r.unwrap_or(nan),
                cci: row.cci.unwrap_or(nan),
                ad: row.ad.unwrap_or(nan),
            },
        }
    }
}

/// Load a single instrument's history from a CSV file.
pub fn load_series_csv(path: &Path) -> Result<Vec<DailyRecord>, IngestError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| IngestError::Csv {
        path: path.display().to_string(),
        source,
    })?;

    let mut records = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        let row = row.map_err(|source| IngestError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        records.push(DailyRecord::from(row));
    }
    Ok(records)
}

/// Load every `*.csv` in a directory as one universe.
///
/// The file stem is the instrument identifier. Chronological ordering is
/// validated by universe construction.
pub fn load_universe_from_dir(
    dir: &Path,
    reference: &str,
) -> Result<InstrumentUniverse, IngestError> {
    let entries = std::fs::read_dir(dir).map_err(|source| IngestError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut series = BTreeMap::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let Some(instrument) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let records = load_series_csv(&path)?;
        series.insert(instrument.to_string(), records);
    }

    if series.is_empty() {
        return Err(IngestError::NoInstruments {
            dir: dir.display().to_string(),
        });
    }

    Ok(InstrumentUniverse::new(reference, series)?)
}
