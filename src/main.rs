// =============================================================================
// price-trends: command-line entry point
// =============================================================================
//
// Usage: price-trends <history.json>
//
// Loads the price history, computes every indicator series and prints the
// bundle as JSON on stdout. Logs go to stderr.
//
// Environment:
//   PRICE_TRENDS_CONFIG  config file path (default: price_trends.json)
//   PRICE_TRENDS_DAYS    overrides the configured window length
//   RUST_LOG             log filter (default: info)
// =============================================================================

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use price_trends::history::load_history;
use price_trends::{compute_indicators, IndicatorConfig};

const DEFAULT_CONFIG_PATH: &str = "price_trends.json";

fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("PRICE_TRENDS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = IndicatorConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        IndicatorConfig::default()
    });

    if let Ok(days) = std::env::var("PRICE_TRENDS_DAYS") {
        config.days = days
            .trim()
            .parse()
            .with_context(|| format!("PRICE_TRENDS_DAYS is not a number: {days:?}"))?;
    }

    // ── 2. Price history ─────────────────────────────────────────────────
    let Some(history_path) = std::env::args().nth(1) else {
        bail!("usage: price-trends <history.json>");
    };
    let series = load_history(&history_path)?;

    // ── 3. Indicators ────────────────────────────────────────────────────
    info!(days = config.days, "computing indicators");
    let bundle = compute_indicators(&series, config.days, &config.options)
        .context("indicator computation rejected the configuration")?;

    for (kind, points) in bundle.iter() {
        if points.is_empty() {
            warn!(series = %kind.label(&bundle.settings), "no data for series");
        }
    }

    // ── 4. Output ────────────────────────────────────────────────────────
    let json = serde_json::to_string_pretty(&bundle).context("failed to serialise bundle")?;
    println!("{json}");

    Ok(())
}
