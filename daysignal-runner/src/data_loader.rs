//! Snapshot loading for the runner.
//!
//! Requests the reference symbol plus the watchlist over the trailing
//! `window_minutes` ending at `now`.

use chrono::{DateTime, Duration, Utc};
use daysignal_core::data::{DataError, DataProvider, Snapshot};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AppConfig;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{provider} fetch failed: {source}")]
    Fetch {
        provider: String,
        #[source]
        source: DataError,
    },
}

/// `[now - window_minutes, now]`.
pub fn fetch_window(config: &AppConfig, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now - Duration::minutes(i64::from(config.market.window_minutes));
    (start, now)
}

/// Fetch the configured symbols from `provider`.
///
/// An empty result is returned as-is; deciding whether that is fatal belongs to
/// the aggregator.
pub fn load_snapshot(
    provider: &dyn DataProvider,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> Result<Snapshot, LoadError> {
    let symbols = config.symbols_to_fetch();
    let (start, end) = fetch_window(config, now);

    let snapshot = provider
        .fetch_bars(&symbols, start, end)
        .map_err(|source| LoadError::Fetch {
            provider: provider.name().to_string(),
            source,
        })?;

    let missing: Vec<&str> = symbols
        .iter()
        .map(String::as_str)
        .filter(|s| !snapshot.contains(s))
        .collect();
    if !missing.is_empty() {
        warn!(provider = provider.name(), ?missing, "symbols without bars");
    }
    info!(
        provider = provider.name(),
        %start,
        %end,
        symbols = snapshot.len(),
        bars = snapshot.total_bars(),
        "loaded snapshot"
    );
    Ok(snapshot)
}
