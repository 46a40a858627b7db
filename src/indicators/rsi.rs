// =============================================================================
// Relative Strength Index (RSI): Wilder's Smoothing, one-sided variant
// =============================================================================
//
// Step 1: seed by summing gains and losses of the deltas at indices
//          1 .. sensitivity-1 (each price against its predecessor).
// Step 2: At index `sensitivity`:
//            avg_gain = sum_gains / sensitivity
//            avg_loss = sum_losses / sensitivity
//          The delta landing on this index is not folded in.
// Step 3: After that, only the side that moved is smoothed:
//            gain day: avg_gain = (avg_gain * (sensitivity - 1) + gain) / sensitivity
//            loss day: avg_loss = (avg_loss * (sensitivity - 1) + loss) / sensitivity
//          The other side carries forward unchanged. Textbook Wilder decays
//          both sides every period; this variant does not.
// Step 4: RS  = min(avg_gain / avg_loss, 100)
//          RSI = 100 - 100 / (1 + RS)
//
// The capped RS bounds RSI at 100 - 100/101 on a loss-free history.
// =============================================================================

use chrono::{DateTime, Utc};
use tracing::trace;

use super::window::window;
use crate::types::{Observation, WindowedPoint};

/// RS ceiling. Keeps RSI finite when the average loss is zero.
pub const MAX_RS: f64 = 100.0;

/// Compute the RSI series for `series`, one observation per index from
/// `sensitivity` onward, stamped with that index's timestamp.
///
/// # Edge cases
/// - `sensitivity == 0` => empty vec
/// - `series.len() <= sensitivity` => empty vec (cannot seed the averages)
pub fn calculate_rsi(series: &[Observation], sensitivity: usize) -> Vec<Observation> {
    if sensitivity == 0 || series.len() <= sensitivity {
        trace!(
            len = series.len(),
            sensitivity,
            "RSI: insufficient data"
        );
        return Vec::new();
    }

    let period_f = sensitivity as f64;
    let mut sum_gain = 0.0_f64;
    let mut sum_loss = 0.0_f64;
    let mut avg_gain = 0.0_f64;
    let mut avg_loss = 0.0_f64;

    let mut result = Vec::with_capacity(series.len() - sensitivity);

    for i in 1..series.len() {
        let prev = series[i - 1].price;
        let current = series[i].price;

        if i < sensitivity {
            if current > prev {
                sum_gain += current - prev;
            } else if current < prev {
                sum_loss += prev - current;
            }
            continue;
        }

        if i == sensitivity {
            avg_gain = sum_gain / period_f;
            avg_loss = sum_loss / period_f;
        } else if current > prev {
            avg_gain = (avg_gain * (period_f - 1.0) + (current - prev)) / period_f;
        } else if current < prev {
            avg_loss = (avg_loss * (period_f - 1.0) + (prev - current)) / period_f;
        }

        result.push(Observation::new(
            series[i].timestamp,
            rsi_from_averages(avg_gain, avg_loss),
        ));
    }

    result
}

/// RSI of `sensitivity` windowed to the last `days` before `now`.
pub fn rsi(
    series: &[Observation],
    sensitivity: usize,
    days: f64,
    now: DateTime<Utc>,
) -> Vec<WindowedPoint> {
    window(&calculate_rsi(series, sensitivity), days, now)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - If both averages are zero, RSI is 50.0 (no movement). This departs from
///   the plain "divide, then cap" rule: there `0 / 0` is NaN, `NaN.min(100)`
///   is 100, and a flat history would read as RSI ~99.01.
/// - A zero average loss alone gives the capped RS, so RSI stays just below 100.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain == 0.0 && avg_loss == 0.0 {
        return 50.0;
    }
    let rs = (avg_gain / avg_loss).min(MAX_RS);
    100.0 - 100.0 / (1.0 + rs)
}
