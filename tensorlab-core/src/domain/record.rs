//! DailyRecord — the fundamental per-instrument, per-day data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of technical indicators carried per day, and the length of every
/// signal vector. Fixed by the encoding rule set.
pub const INDICATOR_COUNT: usize = 10;

/// Raw technical-indicator values for one instrument on one day.
///
/// Field order matches the signal-vector axis: sma, wma, momentum, stoch_k,
/// stoch_d, macd, rsi, williams_r, cci, ad. Values are computed upstream by
/// the indicator pipeline; warm-up rows hold NaN.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub sma: f64,
    pub wma: f64,
    pub momentum: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
    pub macd: f64,
    pub rsi: f64,
    pub williams_r: f64,
    pub cci: f64,
    pub ad: f64,
}

/// One instrument-day: calendar date, closing price, and the ten raw
/// indicator values the encoder consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub indicators: IndicatorSet,
}

impl DailyRecord {
    /// Returns true if the close or any indicator value is NaN (warm-up row
    /// or upstream data gap).
    pub fn has_gaps(&self) -> bool {
        let ind = &self.indicators;
        self.close.is_nan()
            || ind.sma.is_nan()
            || ind.wma.is_nan()
            || ind.momentum.is_nan()
            || ind.stoch_k.is_nan()
            || ind.stoch_d.is_nan()
            || ind.macd.is_nan()
            || ind.rsi.is_nan()
            || ind.williams_r.is_nan()
            || ind.cci.is_nan()
            || ind.ad.is_nan()
    }
}
