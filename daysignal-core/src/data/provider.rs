//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over bar sources (Alpaca's REST API, CSV
//! snapshots) so the runner can swap implementations and tests can feed fixed
//! data.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::snapshot::Snapshot;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("missing credentials: environment variable {0} is not set")]
    MissingCredentials(String),

    #[error("upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("CSV import error: {0}")]
    Csv(String),

    #[error("data error: {0}")]
    Other(String),
}

impl From<csv::Error> for DataError {
    fn from(e: csv::Error) -> Self {
        DataError::Csv(e.to_string())
    }
}

/// Trait for bar providers.
///
/// Implementations return whatever they have for the requested symbols; a
/// symbol the source knows nothing about is simply absent from the snapshot.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch one-minute bars for `symbols` within `[start, end]`.
    fn fetch_bars(
        &self,
        symbols: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Snapshot, DataError>;
}

/// Read a required environment variable.
pub fn env_var(name: &str) -> Result<String, DataError> {
    std::env::var(name).map_err(|_| DataError::MissingCredentials(name.to_string()))
}
