//! Per-day binary signal encoding.
//!
//! Converts one instrument's raw indicator values on one day into a fixed
//! ten-flag bullish(1)/bearish(0) vector. Pure function of that instrument's
//! own history; no cross-instrument dependency.
//!
//! Each flag starts at 0; the bullish condition is applied first, then the
//! bearish condition, which may overwrite. For RSI and CCI the two conditions
//! are not complementary: both can be false (flag stays 0) and both can be
//! true (the bearish branch wins). The CCI bearish branch keys off the RSI
//! slope, not CCI's own. This rule set is intentionally kept verbatim; see
//! DESIGN.md before changing any branch.

use crate::domain::{DailyRecord, INDICATOR_COUNT};

/// Fixed-length binary signal vector for one (instrument, day) pair.
pub type SignalVector = [u8; INDICATOR_COUNT];

/// Encode the signal vector for day `t` of one instrument's aligned series.
///
/// Requires `t >= 1`: the slope-based flags compare against day `t - 1`.
/// Config validation guarantees this for every day the builder visits.
pub fn encode_signals(series: &[DailyRecord], t: usize) -> SignalVector {
    assert!(t >= 1, "signal encoding needs a prior day (t = {t})");
    let curr = &series[t];
    let prev = &series[t - 1];
    let ind = &curr.indicators;
    let prior = &prev.indicators;

    let mut flags: SignalVector = [0; INDICATOR_COUNT];

    // 0: close above SMA
    if curr.close > ind.sma {
        flags[0] = 1;
    }
    if curr.close <= ind.sma {
        flags[0] = 0;
    }

    // 1: close above WMA
    if curr.close > ind.wma {
        flags[1] = 1;
    }
    if curr.close <= ind.wma {
        flags[1] = 0;
    }

    // 2: positive momentum
    if ind.momentum > 0.0 {
        flags[2] = 1;
    }
    if ind.momentum <= 0.0 {
        flags[2] = 0;
    }

    // 3: %K rising
    if ind.stoch_k > prior.stoch_k {
        flags[3] = 1;
    }
    if ind.stoch_k <= prior.stoch_k {
        flags[3] = 0;
    }

    // 4: %D rising
    if ind.stoch_d > prior.stoch_d {
        flags[4] = 1;
    }
    if ind.stoch_d <= prior.stoch_d {
        flags[4] = 0;
    }

    // 5: MACD rising
    if ind.macd > prior.macd {
        flags[5] = 1;
    }
    if ind.macd <= prior.macd {
        flags[5] = 0;
    }

    // 6: RSI oversold or rising / overbought or non-rising
    if ind.rsi <= 30.0 || ind.rsi > prior.rsi {
        flags[6] = 1;
    }
    if ind.rsi >= 70.0 || ind.rsi <= prior.rsi {
        flags[6] = 0;
    }

    // 7: Williams %R rising
    if ind.williams_r > prior.williams_r {
        flags[7] = 1;
    }
    if ind.williams_r <= prior.williams_r {
        flags[7] = 0;
    }

    // 8: CCI oversold or rising; bearish branch checks the RSI slope
    if ind.cci < -200.0 || ind.cci > prior.cci {
        flags[8] = 1;
    }
    if ind.cci > 200.0 || ind.rsi <= prior.rsi {
        flags[8] = 0;
    }

    // 9: AD rising
    if ind.ad > prior.ad {
        flags[9] = 1;
    }
    if ind.ad <= prior.ad {
        flags[9] = 0;
    }

    flags
}
