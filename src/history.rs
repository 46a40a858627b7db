// =============================================================================
// Price History Files
// =============================================================================
//
// Reads a price history saved as a JSON array of
// `{"timestamp": "<RFC 3339>", "price": <number>}` objects and hands the
// engine a well-formed series: every price finite and non-negative, sorted
// ascending by timestamp.
// =============================================================================

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::types::Observation;

/// Parse a price history from JSON text.
pub fn parse_history(json: &str) -> Result<Vec<Observation>> {
    let mut series: Vec<Observation> =
        serde_json::from_str(json).context("failed to parse price history JSON")?;

    if let Some((i, bad)) = series
        .iter()
        .enumerate()
        .find(|(_, o)| !o.price.is_finite() || o.price < 0.0)
    {
        bail!("observation {i} at {} has invalid price {}", bad.timestamp, bad.price);
    }

    // Stable: duplicate timestamps keep their file order.
    if !series.windows(2).all(|w| w[0].timestamp <= w[1].timestamp) {
        debug!(len = series.len(), "price history out of order, sorting");
        series.sort_by_key(|o| o.timestamp);
    }

    Ok(series)
}

/// Load a price history file from `path`.
pub fn load_history(path: impl AsRef<Path>) -> Result<Vec<Observation>> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read price history from {}", path.display()))?;
    let series = parse_history(&content)
        .with_context(|| format!("invalid price history in {}", path.display()))?;

    info!(
        path = %path.display(),
        observations = series.len(),
        first = ?series.first().map(|o| o.timestamp),
        last = ?series.last().map(|o| o.timestamp),
        "price history loaded"
    );

    Ok(series)
}
