//! Application configuration: watchlist, risk budget, rule thresholds.
//!
//! Loaded from TOML, then overridden from the environment. Every table and
//! key is optional; missing values fall back to the defaults below.

use std::path::{Path, PathBuf};

use daysignal_core::rules::{RiskParameters, RuleConfig, RuleError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding `risk.budget`.
pub const RISK_BUDGET_ENV: &str = "RISK_BUDGET";
/// Legacy alias for [`RISK_BUDGET_ENV`]; the primary name wins when both are set.
pub const RISK_BUDGET_ENV_ALIAS: &str = "RISK_EUR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render config as TOML: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("environment variable {var}={value:?} is not a number")]
    InvalidEnv { var: &'static str, value: String },

    #[error("market.watchlist is empty")]
    EmptyWatchlist,

    #[error("market.watchlist contains a blank symbol")]
    BlankSymbol,

    #[error("market.reference_symbol is empty")]
    EmptyReferenceSymbol,

    #[error("market.window_minutes must be > 0")]
    ZeroWindow,

    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Symbols and the bar window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketConfig {
    /// Symbols evaluated, in output order.
    pub watchlist: Vec<String>,
    /// Symbol whose VWAP drives the market light.
    pub reference_symbol: String,
    /// Trailing window of one-minute bars fetched per evaluation.
    pub window_minutes: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            watchlist: ["SPY", "QQQ", "AAPL", "MSFT", "NVDA"]
                .into_iter()
                .map(String::from)
                .collect(),
            reference_symbol: "SPY".to_string(),
            window_minutes: 220,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiskConfig {
    /// Currency amount risked per trade.
    pub budget: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self { budget: 25.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// Alpaca data feed (`iex`, `sip`). Unset uses the account default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<String>,
}

/// Full application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub market: MarketConfig,
    pub risk: RiskConfig,
    pub rules: RuleConfig,
    pub provider: ProviderConfig,
}

impl AppConfig {
    /// Parse TOML. Does not validate or apply environment overrides.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// File (or defaults when `path` is `None`), then process environment,
    /// then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides using `lookup` to read variables.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        for var in [RISK_BUDGET_ENV, RISK_BUDGET_ENV_ALIAS] {
            if let Some(value) = lookup(var) {
                self.risk.budget = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnv { var, value })?;
                break;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.market.watchlist.is_empty() {
            return Err(ConfigError::EmptyWatchlist);
        }
        if self.market.watchlist.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::BlankSymbol);
        }
        if self.market.reference_symbol.trim().is_empty() {
            return Err(ConfigError::EmptyReferenceSymbol);
        }
        if self.market.window_minutes == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        RiskParameters::new(self.risk.budget)?;
        self.rules.validate()?;
        Ok(())
    }

    pub fn risk_parameters(&self) -> Result<RiskParameters, ConfigError> {
        Ok(RiskParameters::new(self.risk.budget)?)
    }

    /// Reference symbol followed by the watchlist, without duplicates.
    pub fn symbols_to_fetch(&self) -> Vec<String> {
        let mut symbols = vec![self.market.reference_symbol.clone()];
        for symbol in &self.market.watchlist {
            if !symbols.contains(symbol) {
                symbols.push(symbol.clone());
            }
        }
        symbols
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
