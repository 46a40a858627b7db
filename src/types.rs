// =============================================================================
// Shared value types used across the indicator engine
// =============================================================================

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds in one day, used for fractional day distances.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// A single dated price observation.
///
/// A series is a slice of observations sorted by non-decreasing `timestamp`.
/// Duplicate timestamps are allowed and kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Fractional number of days between `now` and this observation.
    /// Positive when the observation lies in the past.
    pub fn days_before(&self, now: DateTime<Utc>) -> f64 {
        (now - self.timestamp).num_milliseconds() as f64 / MS_PER_DAY
    }
}

/// A point re-based into "days into the requested window" space.
///
/// `day_offset == 0` means exactly `days` before now and `day_offset == days`
/// means now. Serialises as `{x, y}` so it can be plotted directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowedPoint {
    #[serde(rename = "x")]
    pub day_offset: f64,
    #[serde(rename = "y")]
    pub value: f64,
}

impl WindowedPoint {
    pub fn new(day_offset: f64, value: f64) -> Self {
        Self { day_offset, value }
    }

    /// Calendar time this offset stands for in a window of `days` ending at `now`.
    pub fn timestamp(&self, now: DateTime<Utc>, days: f64) -> DateTime<Utc> {
        offset_to_timestamp(now, days, self.day_offset)
    }
}

/// Convert a day offset back into a calendar time.
pub fn offset_to_timestamp(now: DateTime<Utc>, days: f64, day_offset: f64) -> DateTime<Utc> {
    let ms_before_now = ((days - day_offset) * MS_PER_DAY).round() as i64;
    now - Duration::milliseconds(ms_before_now)
}

/// Short axis label ("Mar 4") for a day offset.
pub fn label_for_offset(now: DateTime<Utc>, days: f64, day_offset: f64) -> String {
    offset_to_timestamp(now, days, day_offset)
        .format("%b %-d")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn days_before_is_fractional() {
        let obs = Observation::new(now() - Duration::hours(36), 1.0);
        assert!((obs.days_before(now()) - 1.5).abs() < 1e-10);
    }

    #[test]
    fn days_before_negative_for_future() {
        let obs = Observation::new(now() + Duration::hours(12), 1.0);
        assert!((obs.days_before(now()) + 0.5).abs() < 1e-10);
    }

    #[test]
    fn offset_roundtrips_to_timestamp() {
        let point = WindowedPoint::new(5.0, 3.0);
        assert_eq!(point.timestamp(now(), 7.0), now() - Duration::days(2));
        assert_eq!(point.timestamp(now(), 5.0), now());
    }

    #[test]
    fn label_uses_month_and_day() {
        assert_eq!(label_for_offset(now(), 7.0, 0.0), "Mar 3");
        assert_eq!(label_for_offset(now(), 7.0, 7.0), "Mar 10");
    }

    #[test]
    fn windowed_point_serialises_as_xy() {
        let json = serde_json::to_string(&WindowedPoint::new(1.5, 2.0)).unwrap();
        assert_eq!(json, r#"{"x":1.5,"y":2.0}"#);
    }
}
