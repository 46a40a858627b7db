// =============================================================================
// Indicator Engine: one raw series in, one bundle of chart series out
// =============================================================================
//
// Every sub-computation reads only the raw series and its own parameters, so
// they run one after another with no ordering constraints between them. "Now"
// is captured once per call so all series share the same time axis.
//
// Outputs:
//   pricingHistory   raw series windowed to `days`
//   maShort / maLong trailing simple moving averages, windowed
//   rsi              one-sided Wilder RSI, windowed
//   regressionAll    least-squares line over the windowed raw series
//   regressionHighs  ... over the windowed local maxima
//   regressionLows   ... over the windowed local minima
// =============================================================================

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::IndicatorError;
use crate::indicators::{
    linear_regression_recent, local_extrema, moving_average, rsi, window, ExtremumKind,
};
use crate::types::{Observation, WindowedPoint};

// =============================================================================
// Options
// =============================================================================

/// Upper bound of the derived short moving-average width.
pub const MAX_MA_WIDTH_SHORT: usize = 15;
/// Upper bound of the derived long moving-average width.
pub const MAX_MA_WIDTH_LONG: usize = 45;

fn default_rsi_sensitivity() -> usize {
    14
}

/// `min(ceil(days / 2), 15)`.
pub fn default_ma_width_short(days: f64) -> usize {
    ((days / 2.0).ceil() as usize).clamp(1, MAX_MA_WIDTH_SHORT)
}

/// `min(short * 3, 45)`.
pub fn default_ma_width_long(short: usize) -> usize {
    (short * 3).min(MAX_MA_WIDTH_LONG)
}

/// Per-call tuning of the engine. `None` widths are derived from `days`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorOptions {
    /// Short moving-average width.
    #[serde(default)]
    pub ma_width_short: Option<usize>,

    /// Long moving-average width.
    #[serde(default)]
    pub ma_width_long: Option<usize>,

    /// RSI smoothing period.
    #[serde(default = "default_rsi_sensitivity")]
    pub rsi_sensitivity: usize,

    /// Decimal places kept in fitted regression coefficients. `None` keeps
    /// full precision.
    #[serde(default)]
    pub regression_precision: Option<u32>,

    /// Reference "now" of the window. `None` uses the wall clock at call time.
    #[serde(skip)]
    pub now: Option<DateTime<Utc>>,
}

impl Default for IndicatorOptions {
    fn default() -> Self {
        Self {
            ma_width_short: None,
            ma_width_long: None,
            rsi_sensitivity: default_rsi_sensitivity(),
            regression_precision: None,
            now: None,
        }
    }
}

/// Concrete settings a bundle was computed with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedOptions {
    pub days: f64,
    pub ma_width_short: usize,
    pub ma_width_long: usize,
    pub rsi_sensitivity: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regression_precision: Option<u32>,
    pub now: DateTime<Utc>,
}

impl IndicatorOptions {
    /// Fix every derived default for a window of `days`.
    ///
    /// Fails on a non-positive or non-finite `days` and on zero widths or
    /// sensitivity. Nothing is clamped.
    pub fn resolve(&self, days: f64) -> Result<ResolvedOptions, IndicatorError> {
        if !days.is_finite() || days <= 0.0 {
            return Err(IndicatorError::invalid_parameter(
                "days",
                days,
                "must be a positive finite number",
            ));
        }

        let ma_width_short = self
            .ma_width_short
            .unwrap_or_else(|| default_ma_width_short(days));
        let ma_width_long = self
            .ma_width_long
            .unwrap_or_else(|| default_ma_width_long(ma_width_short));

        for (name, value) in [
            ("ma_width_short", ma_width_short),
            ("ma_width_long", ma_width_long),
            ("rsi_sensitivity", self.rsi_sensitivity),
        ] {
            if value == 0 {
                return Err(IndicatorError::invalid_parameter(
                    name,
                    value as f64,
                    "must be at least 1",
                ));
            }
        }

        Ok(ResolvedOptions {
            days,
            ma_width_short,
            ma_width_long,
            rsi_sensitivity: self.rsi_sensitivity,
            regression_precision: self.regression_precision,
            now: self.now.unwrap_or_else(Utc::now),
        })
    }

    /// Check the options against `days` without keeping the result.
    pub fn validate(&self, days: f64) -> Result<(), IndicatorError> {
        self.resolve(days).map(|_| ())
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// Names of the series in an [`IndicatorBundle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    MaShort,
    MaLong,
    RegressionAll,
    RegressionHighs,
    RegressionLows,
    Rsi,
    PricingHistory,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 7] = [
        Self::MaShort,
        Self::MaLong,
        Self::RegressionAll,
        Self::RegressionHighs,
        Self::RegressionLows,
        Self::Rsi,
        Self::PricingHistory,
    ];

    /// Bundle key, as serialised.
    pub fn key(self) -> &'static str {
        match self {
            Self::MaShort => "maShort",
            Self::MaLong => "maLong",
            Self::RegressionAll => "regressionAll",
            Self::RegressionHighs => "regressionHighs",
            Self::RegressionLows => "regressionLows",
            Self::Rsi => "rsi",
            Self::PricingHistory => "pricingHistory",
        }
    }

    /// Legend label for a chart, using the widths the bundle was built with.
    pub fn label(self, settings: &ResolvedOptions) -> String {
        match self {
            Self::MaShort => format!("Moving Average {}", settings.ma_width_short),
            Self::MaLong => format!("Moving Average {}", settings.ma_width_long),
            Self::RegressionAll => "Regression".to_string(),
            Self::RegressionHighs => "Regression Highs".to_string(),
            Self::RegressionLows => "Regression Lows".to_string(),
            Self::Rsi => "RSI".to_string(),
            Self::PricingHistory => "Pricing History".to_string(),
        }
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Every derived series, ready for plotting. Owns its data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorBundle {
    pub ma_short: Vec<WindowedPoint>,
    pub ma_long: Vec<WindowedPoint>,
    pub regression_all: Vec<WindowedPoint>,
    pub regression_highs: Vec<WindowedPoint>,
    pub regression_lows: Vec<WindowedPoint>,
    pub rsi: Vec<WindowedPoint>,
    pub pricing_history: Vec<WindowedPoint>,
    pub settings: ResolvedOptions,
}

impl IndicatorBundle {
    pub fn series(&self, kind: IndicatorKind) -> &[WindowedPoint] {
        match kind {
            IndicatorKind::MaShort => &self.ma_short,
            IndicatorKind::MaLong => &self.ma_long,
            IndicatorKind::RegressionAll => &self.regression_all,
            IndicatorKind::RegressionHighs => &self.regression_highs,
            IndicatorKind::RegressionLows => &self.regression_lows,
            IndicatorKind::Rsi => &self.rsi,
            IndicatorKind::PricingHistory => &self.pricing_history,
        }
    }

    /// `(name, series)` pairs in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (IndicatorKind, &[WindowedPoint])> + '_ {
        IndicatorKind::ALL.into_iter().map(move |k| (k, self.series(k)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, s)| s.is_empty())
    }
}

// =============================================================================
// Orchestration
// =============================================================================

/// Run `f` and log how long it took.
fn timed<T>(indicator: &'static str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    debug!(
        indicator,
        elapsed_us = start.elapsed().as_micros() as u64,
        "indicator computed"
    );
    out
}

/// Fit over the last `days` of `series` and sample the line for plotting.
fn projected_trend(series: &[Observation], settings: &ResolvedOptions) -> Vec<WindowedPoint> {
    let mut fit = linear_regression_recent(series, settings.days, settings.now);
    if let Some(decimals) = settings.regression_precision {
        fit = fit.rounded(decimals);
    }
    debug!(equation = %fit, r_squared = fit.r_squared, points = fit.source_points.len(), "trend fitted");
    fit.project(settings.days)
}

/// Derive every chart series from `raw`, a series sorted ascending by
/// timestamp, over the last `days`.
///
/// Only invalid parameters fail; short or empty input yields empty series.
pub fn compute_indicators(
    raw: &[Observation],
    days: f64,
    options: &IndicatorOptions,
) -> Result<IndicatorBundle, IndicatorError> {
    let settings = options.resolve(days)?;
    let started = Instant::now();

    let lows = timed("extrema_min", || local_extrema(raw, ExtremumKind::Min));
    let highs = timed("extrema_max", || local_extrema(raw, ExtremumKind::Max));

    let regression_all = timed("regression_all", || projected_trend(raw, &settings));
    let regression_lows = timed("regression_lows", || projected_trend(&lows, &settings));
    let regression_highs = timed("regression_highs", || projected_trend(&highs, &settings));

    let ma_short = timed("ma_short", || {
        moving_average(raw, settings.ma_width_short, days, settings.now)
    });
    let ma_long = timed("ma_long", || {
        moving_average(raw, settings.ma_width_long, days, settings.now)
    });
    let rsi = timed("rsi", || rsi(raw, settings.rsi_sensitivity, days, settings.now));
    let pricing_history = timed("pricing_history", || window(raw, days, settings.now));

    info!(
        observations = raw.len(),
        days,
        ma_short = ma_short.len(),
        ma_long = ma_long.len(),
        rsi = rsi.len(),
        pricing_history = pricing_history.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "indicators computed"
    );

    Ok(IndicatorBundle {
        ma_short,
        ma_long,
        regression_all,
        regression_highs,
        regression_lows,
        rsi,
        pricing_history,
        settings,
    })
}
