//! Rolling correlation-based instrument ranking.
//!
//! For an evaluation day, each instrument's return window is correlated
//! against the reference instrument's window and the universe is reordered
//! most-correlated-first. The ranking is recomputed independently per sample
//! day; instrument rank is not a stable identity across days.

use crate::data::ReturnSeries;

/// Rank all instruments by Pearson correlation to `reference` over the
/// return window `[day - lookback + 1, day]`, descending.
///
/// Ties break by identifier lexicographic ascending so the ordering is
/// reproducible. Non-finite correlations (e.g. from zero-close returns)
/// order via IEEE-754 total ordering and are not special-cased. The
/// reference correlates 1.0 with itself and comes first absent numerical
/// anomalies.
///
/// Caller guarantees `day >= lookback` so the window never includes the
/// undefined return at day 0 (enforced by config validation).
pub fn rank_by_correlation(
    returns: &ReturnSeries,
    reference: &str,
    day: usize,
    lookback: usize,
) -> Vec<String> {
    let window_start = day + 1 - lookback;
    let reference_window = &returns
        .series(reference)
        .expect("reference instrument missing from return series")[window_start..=day];

    let mut ranked: Vec<(String, f64)> = returns
        .instruments()
        .map(|instrument| {
            let window = &returns
                .series(instrument)
                .expect("return series missing an instrument")[window_start..=day];
            (instrument.to_string(), pearson(window, reference_window))
        })
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().map(|(instrument, _)| instrument).collect()
}

/// Pearson correlation coefficient of two equal-length windows.
///
/// Zero variance or NaN inputs yield NaN, which propagates into the sort.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len() as f64;

    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    cov / (var_x.sqrt() * var_y.sqrt())
}
