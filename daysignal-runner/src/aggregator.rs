//! Watchlist evaluation.
//!
//! Classifies the market once from the reference symbol, then runs the VWAP
//! reclaim signal for every watch-listed symbol present in the snapshot.
//! Per-symbol work is independent and runs on the rayon pool; the output keeps
//! watchlist order.

use chrono::{DateTime, SecondsFormat, Utc};
use daysignal_core::components::{Regime, RegimeClassifier, SignalGenerator, VwapReclaim};
use daysignal_core::data::Snapshot;
use daysignal_core::domain::{Action, BarSeries, SignalResult};
use daysignal_core::rules::{RiskParameters, RuleConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, ConfigError};

pub const SETUP_NAME: &str = "VWAP Reclaim (Long)";
pub const ENTRY_TRIGGER_TEXT: &str =
    "Buy when price closes back above VWAP after a dip AND volume confirms.";

#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error("upstream returned no bars for any symbol; check provider credentials, plan and symbol coverage")]
    UpstreamEmpty,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Market light as presented next to the signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub reference_symbol: String,
    pub light: Regime,
    pub note: String,
}

/// One symbol's recommendation, flattened for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalRecord {
    pub id: String,
    pub symbol: String,
    pub action: Action,
    pub setup: String,
    pub confidence: u8,
    pub entry_trigger_text: String,
    pub entry_price: Option<f64>,
    pub stop: Option<f64>,
    pub tp1: Option<f64>,
    pub tp2: Option<f64>,
    pub risk_budget: f64,
    pub shares: u64,
    pub reasons: Vec<String>,
    pub updated_at: String,
}

impl SignalRecord {
    fn new(symbol: &str, result: SignalResult, risk: &RiskParameters, updated_at: &str) -> Self {
        Self {
            id: symbol.to_string(),
            symbol: symbol.to_string(),
            action: result.action,
            setup: SETUP_NAME.to_string(),
            confidence: result.confidence,
            entry_trigger_text: ENTRY_TRIGGER_TEXT.to_string(),
            entry_price: result.entry_price,
            stop: result.stop,
            tp1: result.tp1,
            tp2: result.tp2,
            risk_budget: risk.risk_budget(),
            shares: result.shares,
            reasons: result.reasons,
            updated_at: updated_at.to_string(),
        }
    }
}

/// Market summary plus per-symbol records in watchlist order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub market: MarketSummary,
    pub signals: Vec<SignalRecord>,
}

impl Evaluation {
    pub fn buys(&self) -> impl Iterator<Item = &SignalRecord> {
        self.signals.iter().filter(|s| s.action == Action::Buy)
    }
}

/// Evaluate every watch-listed symbol against one snapshot.
///
/// `rules` are validated first; out-of-range thresholds surface as
/// [`EvaluateError::Config`].
pub fn evaluate(
    watchlist: &[String],
    reference_symbol: &str,
    risk: &RiskParameters,
    rules: &RuleConfig,
    snapshot: &Snapshot,
    now: DateTime<Utc>,
) -> Result<Evaluation, EvaluateError> {
    rules.validate().map_err(ConfigError::from)?;
    if snapshot.is_empty() {
        return Err(EvaluateError::UpstreamEmpty);
    }

    let classifier = RegimeClassifier::from_rules(rules);
    let reference = snapshot.get(reference_symbol);
    if reference.is_none() {
        warn!(reference_symbol, "reference symbol missing from snapshot, defaulting to YELLOW");
    }
    let market = classifier.classify_reference(reference.map(BarSeries::bars));
    info!(reference_symbol, light = %market.regime, note = %market.note, "market regime");

    let signal = VwapReclaim::new(rules.clone());
    let updated_at = now.to_rfc3339_opts(SecondsFormat::Secs, true);

    let signals: Vec<SignalRecord> = watchlist
        .par_iter()
        .filter_map(|symbol| {
            let Some(series) = snapshot.get(symbol) else {
                debug!(%symbol, "no bars for symbol, skipping");
                return None;
            };
            let result = signal.evaluate(series, market.regime, risk);
            debug!(
                %symbol,
                bars = series.len(),
                action = %result.action,
                confidence = result.confidence,
                "evaluated"
            );
            Some(SignalRecord::new(symbol, result, risk, &updated_at))
        })
        .collect();

    info!(
        evaluated = signals.len(),
        buys = signals.iter().filter(|s| s.action == Action::Buy).count(),
        "watchlist evaluated"
    );

    Ok(Evaluation {
        market: MarketSummary {
            reference_symbol: reference_symbol.to_string(),
            light: market.regime,
            note: market.note,
        },
        signals,
    })
}

/// [`evaluate`] with watchlist, risk and rules taken from `config`.
pub fn evaluate_with_config(
    config: &AppConfig,
    snapshot: &Snapshot,
    now: DateTime<Utc>,
) -> Result<Evaluation, EvaluateError> {
    config.validate()?;
    let risk = config.risk_parameters()?;
    evaluate(
        &config.market.watchlist,
        &config.market.reference_symbol,
        &risk,
        &config.rules,
        snapshot,
        now,
    )
}
