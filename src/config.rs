// =============================================================================
// Indicator Configuration: JSON file with serde defaults
// =============================================================================
//
// Holds the window length and the engine options. All fields carry
// `#[serde(default)]` so a partial or empty file still loads.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::IndicatorOptions;

fn default_days() -> f64 {
    7.0
}

/// Top-level configuration of a charting run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// How many recent days the charts cover.
    #[serde(default = "default_days")]
    pub days: f64,

    /// Moving-average widths, RSI sensitivity, regression precision.
    #[serde(default)]
    pub options: IndicatorOptions,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            days: default_days(),
            options: IndicatorOptions::default(),
        }
    }
}

impl IndicatorConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing or malformed file is an error so the caller can fall back to
    /// defaults with a warning. Values are not validated here; the engine
    /// rejects bad ones when it runs.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read indicator config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse indicator config from {}", path.display()))?;

        info!(
            path = %path.display(),
            days = config.days,
            ma_width_short = ?config.options.ma_width_short,
            ma_width_long = ?config.options.ma_width_long,
            rsi_sensitivity = config.options.rsi_sensitivity,
            "indicator config loaded"
        );

        Ok(config)
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = IndicatorConfig::default();
        assert!((cfg.days - 7.0).abs() < f64::EPSILON);
        assert_eq!(cfg.options.rsi_sensitivity, 14);
        assert_eq!(cfg.options.ma_width_short, None);
        assert_eq!(cfg.options.regression_precision, None);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: IndicatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, IndicatorConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "days": 30, "options": { "ma_width_long": 40 } }"#;
        let cfg: IndicatorConfig = serde_json::from_str(json).unwrap();
        assert!((cfg.days - 30.0).abs() < f64::EPSILON);
        assert_eq!(cfg.options.ma_width_long, Some(40));
        assert_eq!(cfg.options.ma_width_short, None);
        assert_eq!(cfg.options.rsi_sensitivity, 14);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "days": 14.5, "options": {{ "rsi_sensitivity": 10 }} }}"#).unwrap();

        let cfg = IndicatorConfig::load(file.path()).unwrap();
        assert!((cfg.days - 14.5).abs() < f64::EPSILON);
        assert_eq!(cfg.options.rsi_sensitivity, 10);
    }

    #[test]
    fn load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = IndicatorConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read indicator config"));
    }

    #[test]
    fn load_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ days: ").unwrap();
        let err = IndicatorConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse indicator config"));
    }
}
