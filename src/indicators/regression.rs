// =============================================================================
// Linear Regression: Ordinary Least Squares trend line
// =============================================================================
//
//   slope     = Σ((x-x̄)(y-ȳ)) / Σ((x-x̄)²)
//   intercept = ȳ - slope * x̄
//   r²        = 1 - SSE / SST
//
// Fewer than two points, or points sharing a single x, cannot define a line.
// Those fits fall back to a flat line through the mean y (0 when empty) so a
// projection downstream always has something to sample.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

use super::window::window;
use crate::types::{Observation, WindowedPoint};

/// Number of samples a projection aims for across the window.
pub const PROJECTION_SAMPLES: usize = 100;

/// Hard ceiling on projected samples, reached only when the first source
/// point lies far before the window start.
pub const MAX_PROJECTION_SAMPLES: usize = 10 * PROJECTION_SAMPLES;

/// A fitted line plus the points it was fitted on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    /// Exactly the points used for the fit, in input order.
    pub source_points: Vec<WindowedPoint>,
    /// Coefficient of determination of the fit.
    pub r_squared: f64,
}

impl RegressionResult {
    /// Evaluate the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Round slope and intercept to `decimals` places.
    pub fn rounded(mut self, decimals: u32) -> Self {
        let factor = 10f64.powi(decimals as i32);
        self.slope = (self.slope * factor).round() / factor;
        self.intercept = (self.intercept * factor).round() / factor;
        self
    }

    /// Sample the fitted line from the first source point up to, but not
    /// including, `days` in steps of `days / 100`.
    ///
    /// Returns an empty vec when there are no source points or `days` is not
    /// positive. At most [`MAX_PROJECTION_SAMPLES`] points are produced.
    pub fn project(&self, days: f64) -> Vec<WindowedPoint> {
        let Some(first) = self.source_points.first() else {
            return Vec::new();
        };
        if !(days > 0.0) || !first.day_offset.is_finite() {
            return Vec::new();
        }

        let step = days / PROJECTION_SAMPLES as f64;
        let start = first.day_offset;

        (0..MAX_PROJECTION_SAMPLES)
            .map(|k| start + k as f64 * step)
            .take_while(|&x| x < days)
            .map(|x| WindowedPoint::new(x, self.predict(x)))
            .collect()
    }
}

impl std::fmt::Display for RegressionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.intercept < 0.0 {
            write!(f, "y = {}x - {}", self.slope, -self.intercept)
        } else {
            write!(f, "y = {}x + {}", self.slope, self.intercept)
        }
    }
}

/// Least-squares fit over already-numeric points.
pub fn linear_regression(points: &[WindowedPoint]) -> RegressionResult {
    let source_points = points.to_vec();

    if points.len() < 2 {
        trace!(points = points.len(), "Regression: fewer than two points");
        let intercept = points.first().map(|p| p.value).unwrap_or(0.0);
        return RegressionResult {
            slope: 0.0,
            intercept,
            source_points,
            r_squared: 0.0,
        };
    }

    let n = points.len() as f64;
    let x_mean = points.iter().map(|p| p.day_offset).sum::<f64>() / n;
    let y_mean = points.iter().map(|p| p.value).sum::<f64>() / n;

    let mut numerator = 0.0_f64;
    let mut denominator = 0.0_f64;
    for p in points {
        let dx = p.day_offset - x_mean;
        numerator += dx * (p.value - y_mean);
        denominator += dx * dx;
    }

    let slope = if denominator.abs() < f64::EPSILON {
        trace!("Regression: degenerate fit (zero variance in x)");
        0.0
    } else {
        numerator / denominator
    };
    let intercept = y_mean - slope * x_mean;

    let mut result = RegressionResult {
        slope,
        intercept,
        source_points,
        r_squared: 0.0,
    };
    result.r_squared = determination(&result);
    result
}

/// Window `series` to the last `days` before `now`, then fit.
pub fn linear_regression_recent(
    series: &[Observation],
    days: f64,
    now: DateTime<Utc>,
) -> RegressionResult {
    linear_regression(&window(series, days, now))
}

/// r² of `fit` against its own source points.
///
/// A series with no variance in y is fitted exactly by a flat line, so it
/// scores 1.0 when the residuals vanish.
fn determination(fit: &RegressionResult) -> f64 {
    let n = fit.source_points.len() as f64;
    let y_mean = fit.source_points.iter().map(|p| p.value).sum::<f64>() / n;

    let (sse, sst) = fit.source_points.iter().fold((0.0_f64, 0.0_f64), |(sse, sst), p| {
        let residual = p.value - fit.predict(p.day_offset);
        (sse + residual * residual, sst + (p.value - y_mean).powi(2))
    });

    if sst < f64::EPSILON {
        return if sse < f64::EPSILON { 1.0 } else { 0.0 };
    }
    1.0 - sse / sst
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn points(xy: &[(f64, f64)]) -> Vec<WindowedPoint> {
        xy.iter().map(|&(x, y)| WindowedPoint::new(x, y)).collect()
    }

    #[test]
    fn regression_recovers_line() {
        let pts: Vec<WindowedPoint> = (0..20)
            .map(|i| {
                let x = i as f64 * 0.35;
                WindowedPoint::new(x, 2.0 * x + 1.0)
            })
            .collect();
        let fit = linear_regression(&pts);
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
        assert_eq!(fit.source_points, pts);
    }

    #[test]
    fn projection_reproduces_line() {
        let pts = points(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0), (3.0, 7.0)]);
        let fit = linear_regression(&pts);
        let line = fit.project(7.0);
        assert_eq!(line.len(), PROJECTION_SAMPLES);
        assert!((line[0].day_offset - 0.0).abs() < 1e-12);
        for p in &line {
            assert!(p.day_offset < 7.0);
            assert!((p.value - (2.0 * p.day_offset + 1.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn projection_starts_at_first_source_point() {
        let pts = points(&[(3.5, 1.0), (5.0, 2.0)]);
        let line = linear_regression(&pts).project(7.0);
        // 3.5 + k*0.07 < 7  =>  k in 0..50
        assert_eq!(line.len(), 50);
        assert!((line[0].day_offset - 3.5).abs() < 1e-12);
    }

    #[test]
    fn projection_from_far_before_window_is_capped() {
        let fit = linear_regression(&points(&[(-1e9, 1.0), (0.0, 2.0)]));
        let line = fit.project(7.0);
        assert_eq!(line.len(), MAX_PROJECTION_SAMPLES);
        assert!((line[0].day_offset + 1e9).abs() < 1e-3);
    }

    #[test]
    fn regression_empty_is_sentinel() {
        let fit = linear_regression(&[]);
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 0.0);
        assert!(fit.source_points.is_empty());
        assert!(fit.project(7.0).is_empty());
    }

    #[test]
    fn regression_single_point_is_flat() {
        let fit = linear_regression(&points(&[(2.0, 4.5)]));
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 4.5);
        let line = fit.project(7.0);
        assert!(!line.is_empty());
        assert!(line.iter().all(|p| (p.value - 4.5).abs() < 1e-12));
    }

    #[test]
    fn regression_shared_x_is_flat_at_mean() {
        let fit = linear_regression(&points(&[(1.0, 2.0), (1.0, 4.0)]));
        assert_eq!(fit.slope, 0.0);
        assert!((fit.intercept - 3.0).abs() < 1e-12);
    }

    #[test]
    fn regression_constant_series_fits_perfectly() {
        let fit = linear_regression(&points(&[(0.0, 5.0), (1.0, 5.0), (2.0, 5.0)]));
        assert!(fit.slope.abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn regression_noisy_fit_has_partial_r_squared() {
        let fit = linear_regression(&points(&[(0.0, 1.0), (1.0, 3.0), (2.0, 2.0), (3.0, 5.0)]));
        assert!(fit.slope > 0.0);
        assert!(fit.r_squared > 0.0 && fit.r_squared < 1.0);
    }

    #[test]
    fn projection_with_non_positive_days_is_empty() {
        let fit = linear_regression(&points(&[(0.0, 1.0), (1.0, 2.0)]));
        assert!(fit.project(0.0).is_empty());
        assert!(fit.project(-3.0).is_empty());
    }

    #[test]
    fn rounded_coefficients() {
        let fit = linear_regression(&points(&[(0.0, 0.0), (3.0, 1.0)])).rounded(2);
        assert!((fit.slope - 0.33).abs() < 1e-12);
        assert_eq!(fit.intercept, 0.0);
    }

    #[test]
    fn display_equation() {
        let fit = linear_regression(&points(&[(0.0, 1.0), (1.0, 3.0)]));
        assert_eq!(fit.to_string(), "y = 2x + 1");
        let fit = linear_regression(&points(&[(0.0, -1.0), (1.0, 1.0)]));
        assert_eq!(fit.to_string(), "y = 2x - 1");
    }

    #[test]
    fn regression_recent_windows_first() {
        let now = Utc.with_ymd_and_hms(2017, 6, 1, 0, 0, 0).unwrap();
        let series: Vec<Observation> = (0..30)
            .map(|i| Observation::new(now - Duration::days(29 - i), if i < 20 { 100.0 } else { i as f64 }))
            .collect();
        let fit = linear_regression_recent(&series, 7.0, now);
        // Only i = 22..=29 survive; prices equal i there, offsets 0..=7.
        assert_eq!(fit.source_points.len(), 8);
        assert!((fit.slope - 1.0).abs() < 1e-9);
        assert!((fit.intercept - 22.0).abs() < 1e-9);
    }
}
