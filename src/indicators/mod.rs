// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free building blocks of the indicator engine. Every
// function is total: short or degenerate input yields an empty series or a
// flat sentinel fit, never a panic.

pub mod extrema;
pub mod regression;
pub mod rsi;
pub mod sma;
pub mod window;

pub use extrema::{local_extrema, ExtremumKind};
pub use regression::{linear_regression, linear_regression_recent, RegressionResult};
pub use rsi::{calculate_rsi, rsi};
pub use sma::{moving_average, trailing_average};
pub use window::window;
