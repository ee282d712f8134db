//! Alpaca market-data provider.
//!
//! Fetches one-minute bars for many symbols in one paginated request stream
//! from the v2 stocks bars endpoint. Retries transient failures (connect and
//! timeout errors, HTTP 429, 5xx) with exponential backoff.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::provider::{env_var, DataError, DataProvider};
use super::snapshot::Snapshot;
use crate::domain::Bar;

pub const DEFAULT_BASE_URL: &str = "https://data.alpaca.markets/v2/stocks/bars";
pub const API_KEY_ENV: &str = "ALPACA_API_KEY";
pub const API_SECRET_ENV: &str = "ALPACA_API_SECRET";

const PAGE_LIMIT: u32 = 10_000;

#[derive(Debug, Deserialize)]
struct AlpacaBar {
    #[serde(rename = "t")]
    timestamp: DateTime<Utc>,
    #[serde(rename = "o")]
    open: f64,
    #[serde(rename = "h")]
    high: f64,
    #[serde(rename = "l")]
    low: f64,
    #[serde(rename = "c")]
    close: f64,
    #[serde(rename = "v")]
    volume: f64,
}

impl From<AlpacaBar> for Bar {
    fn from(b: AlpacaBar) -> Self {
        Bar::new(b.timestamp, b.open, b.high, b.low, b.close, b.volume)
    }
}

#[derive(Debug, Deserialize)]
struct BarsPage {
    #[serde(default)]
    bars: Option<BTreeMap<String, Vec<AlpacaBar>>>,
    next_page_token: Option<String>,
}

/// Alpaca REST bars provider.
#[derive(Debug)]
pub struct AlpacaProvider {
    client: reqwest::blocking::Client,
    api_key: SecretString,
    api_secret: SecretString,
    feed: Option<String>,
    max_retries: u32,
    base_delay: Duration,
}

impl AlpacaProvider {
    pub fn new(api_key: SecretString, api_secret: SecretString) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            api_secret,
            feed: None,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    /// Credentials from `ALPACA_API_KEY` and `ALPACA_API_SECRET`.
    pub fn from_env() -> Result<Self, DataError> {
        let api_key = SecretString::from(env_var(API_KEY_ENV)?);
        let api_secret = SecretString::from(env_var(API_SECRET_ENV)?);
        Self::new(api_key, api_secret)
    }

    /// Data feed (`iex`, `sip`). `None` leaves the account default.
    pub fn with_feed(mut self, feed: Option<String>) -> Self {
        self.feed = feed;
        self
    }

    fn query(
        &self,
        symbols: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page_token: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("symbols", symbols.join(",")),
            ("timeframe", "1Min".to_string()),
            ("start", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("end", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("limit", PAGE_LIMIT.to_string()),
            ("adjustment", "raw".to_string()),
        ];
        if let Some(feed) = &self.feed {
            query.push(("feed", feed.clone()));
        }
        if let Some(token) = page_token {
            query.push(("page_token", token.to_string()));
        }
        query
    }

    fn parse_page(body: &str) -> Result<BarsPage, DataError> {
        serde_json::from_str(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse bars response: {e}"))
        })
    }

    /// Execute one page request with retry.
    fn fetch_page(&self, query: &[(&'static str, String)]) -> Result<BarsPage, DataError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                if let Some(err) = &last_error {
                    warn!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "retrying Alpaca request");
                }
                std::thread::sleep(delay);
            }

            let sent = self
                .client
                .get(DEFAULT_BASE_URL)
                .header("APCA-API-KEY-ID", self.api_key.expose_secret())
                .header("APCA-API-SECRET-KEY", self.api_secret.expose_secret())
                .query(query)
                .send();

            let resp = match sent {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(DataError::AuthenticationRequired(format!(
                    "Alpaca rejected the credentials (HTTP {status})"
                )));
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }

            let body = resp
                .text()
                .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

            if status.is_server_error() {
                last_error = Some(DataError::Upstream {
                    status: status.as_u16(),
                    body,
                });
                continue;
            }

            if !status.is_success() {
                return Err(DataError::Upstream {
                    status: status.as_u16(),
                    body,
                });
            }

            return Self::parse_page(&body);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl DataProvider for AlpacaProvider {
    fn name(&self) -> &str {
        "alpaca"
    }

    fn fetch_bars(
        &self,
        symbols: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Snapshot, DataError> {
        if symbols.is_empty() {
            return Ok(Snapshot::new());
        }

        let mut raw: Vec<(String, Vec<Bar>)> = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let query = self.query(symbols, start, end, page_token.as_deref());
            let page = self.fetch_page(&query)?;
            pages += 1;

            for (symbol, bars) in page.bars.unwrap_or_default() {
                raw.push((symbol, bars.into_iter().map(Bar::from).collect()));
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => {
                    debug!(pages, "following next_page_token");
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        let snapshot = Snapshot::from_raw(raw);
        info!(
            provider = self.name(),
            requested = symbols.len(),
            returned = snapshot.len(),
            bars = snapshot.total_bars(),
            pages,
            "fetched bars"
        );
        Ok(snapshot)
    }
}
