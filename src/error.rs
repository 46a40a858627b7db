//! Engine error types.

use thiserror::Error;

/// Errors raised to the caller of the indicator engine.
///
/// Data conditions (short series, degenerate fits) are never errors; they
/// produce empty or sentinel output instead. Only caller mistakes end up here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// A window width, RSI sensitivity or day count is out of its domain.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// What the value must satisfy.
        reason: &'static str,
    },
}

impl IndicatorError {
    /// Creates an `InvalidParameter` error.
    #[must_use]
    pub fn invalid_parameter(name: &'static str, value: f64, reason: &'static str) -> Self {
        IndicatorError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_the_parameter() {
        let err = IndicatorError::invalid_parameter("days", -1.0, "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid parameter `days` = -1: must be positive"
        );
    }
}
