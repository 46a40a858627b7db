// =============================================================================
// price-trends: technical indicators for a single price history
// =============================================================================
//
// Turns one sorted series of dated prices into chart-ready series: the recent
// window of the raw prices, short and long moving averages, an RSI, and trend
// lines fitted over all prices, the local highs and the local lows.
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod indicators;
pub mod types;

pub use config::IndicatorConfig;
pub use engine::{compute_indicators, IndicatorBundle, IndicatorKind, IndicatorOptions, ResolvedOptions};
pub use error::IndicatorError;
pub use types::{label_for_offset, Observation, WindowedPoint};
