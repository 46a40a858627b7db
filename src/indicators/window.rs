// =============================================================================
// Series Windowing
// =============================================================================
//
// Restricts a series to its most recent `days` and re-bases the time axis so
// that 0 is the start of the window and `days` is "now".
//
// The scan walks backward from the newest observation and stops at the first
// one older than the window. Input must be sorted ascending by timestamp.
// =============================================================================

use chrono::{DateTime, Utc};

use crate::types::{Observation, WindowedPoint};

/// Window `series` to the last `days` before `now`.
///
/// Output is ascending by `day_offset`, every offset lies in `[0, days]`.
///
/// # Edge cases
/// - empty series => empty vec
/// - `days` negative or NaN => empty vec
/// - `days == 0` => only observations stamped exactly `now`
/// - observations after `now` are skipped and the scan continues
pub fn window(series: &[Observation], days: f64, now: DateTime<Utc>) -> Vec<WindowedPoint> {
    if !(days >= 0.0) {
        return Vec::new();
    }

    let mut recent = Vec::new();
    for obs in series.iter().rev() {
        let distance = obs.days_before(now);
        if distance < 0.0 {
            continue;
        }
        if distance > days {
            break;
        }
        recent.push(WindowedPoint::new(days - distance, obs.price));
    }

    // Collected newest-first.
    recent.reverse();
    recent
}
