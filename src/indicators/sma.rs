// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// SMA_i = (price_{i-width+1} + ... + price_i) / width
//
// Each window is summed on its own, O(n * width), so rounding error from one
// window never reaches the next. The first `width - 1` prices have no average.
// The averaged series is then windowed to the most recent `days`.
// =============================================================================

use chrono::{DateTime, Utc};

use super::window::window;
use crate::types::{Observation, WindowedPoint};

/// Trailing simple moving average, one observation per index from
/// `width - 1` onward, stamped with that index's timestamp.
///
/// # Edge cases
/// - `width == 0` => empty vec
/// - `series.len() < width` => empty vec
pub fn trailing_average(series: &[Observation], width: usize) -> Vec<Observation> {
    if width == 0 || series.len() < width {
        return Vec::new();
    }

    let width_f = width as f64;
    series
        .windows(width)
        .map(|run| {
            let sum: f64 = run.iter().map(|o| o.price).sum();
            Observation::new(run[width - 1].timestamp, sum / width_f)
        })
        .collect()
}

/// Moving average of `width` windowed to the last `days` before `now`.
pub fn moving_average(
    series: &[Observation],
    width: usize,
    days: f64,
    now: DateTime<Utc>,
) -> Vec<WindowedPoint> {
    window(&trailing_average(series, width), days, now)
}
