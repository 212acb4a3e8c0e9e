//! Daily fractional returns derived from aligned closes.
//!
//! return(t) = (close(t) - close(t-1)) / close(t), with the current close as
//! denominator. This differs from the conventional prior-close definition and
//! is preserved deliberately; see DESIGN.md. A zero close produces a
//! non-finite value that propagates into correlation without special-casing.

use crate::domain::AlignedUniverse;
use std::collections::BTreeMap;

/// Per-instrument daily return series on the common calendar.
///
/// Each series has the same length as the calendar; entry 0 is NaN (no prior
/// day). Derived once from the immutable aligned universe.
#[derive(Debug, Clone)]
pub struct ReturnSeries {
    returns: BTreeMap<String, Vec<f64>>,
}

impl ReturnSeries {
    pub fn series(&self, instrument: &str) -> Option<&[f64]> {
        self.returns.get(instrument).map(|v| v.as_slice())
    }

    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.returns.keys().map(|s| s.as_str())
    }
}

/// Compute returns for every instrument in the aligned universe.
pub fn compute_returns(aligned: &AlignedUniverse) -> ReturnSeries {
    let mut returns = BTreeMap::new();
    for (instrument, records) in aligned.iter() {
        let mut series = vec![f64::NAN; records.len()];
        for t in 1..records.len() {
            let curr = records[t].close;
            let prev = records[t - 1].close;
            series[t] = (curr - prev) / curr;
        }
        returns.insert(instrument.to_string(), series);
    }
    ReturnSeries { returns }
}
