//! Next-day-direction labeling of the reference instrument.

use crate::domain::DailyRecord;

/// Label for sample day `day`: 1 ("buy") if the close rises into the next
/// day, else 0. Requires `day + 1 < series.len()`, which config validation
/// guarantees for every sample day — the last usable sample day is one day
/// before the end of the aligned calendar.
pub fn label_direction(series: &[DailyRecord], day: usize) -> u8 {
    assert!(
        day + 1 < series.len(),
        "labeling day {day} needs a lookahead day (series length {})",
        series.len()
    );
    if series[day].close < series[day + 1].close {
        1
    } else {
        0
    }
}
