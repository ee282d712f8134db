//! Policy constants for the regime gate and the VWAP-reclaim rule.
//!
//! None of these are derived; they are tuning knobs. Keeping them in one
//! serializable struct lets the TOML config and the tests move them without
//! touching the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A rule or risk parameter outside its valid range.
#[derive(Debug, Error, PartialEq)]
#[error("invalid {field}: {reason}")]
pub struct RuleError {
    pub field: &'static str,
    pub reason: String,
}

impl RuleError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Thresholds and lookbacks for the regime classifier and signal rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleConfig {
    /// Minimum bars before the rule is evaluated at all.
    pub min_bars: usize,
    /// Bars scanned for a close below VWAP.
    pub dip_lookback: usize,
    /// Bars scanned for the swing low under the stop.
    pub low_lookback: usize,
    /// Bars averaged for the volume baseline.
    pub volume_lookback: usize,
    /// Last-bar volume must reach this multiple of the baseline.
    pub volume_multiplier: f64,
    /// Stop sits this fraction of entry below the swing low.
    pub stop_buffer_pct: f64,
    /// Reference close below `vwap * regime_dead_band` is RED.
    pub regime_dead_band: f64,
    /// Profit targets as R-multiples: [tp1, tp2].
    pub target_r_multiples: [f64; 2],
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            min_bars: 50,
            dip_lookback: 30,
            low_lookback: 10,
            volume_lookback: 20,
            volume_multiplier: 1.3,
            stop_buffer_pct: 0.001,
            regime_dead_band: 0.998,
            target_r_multiples: [1.0, 2.0],
        }
    }
}

impl RuleConfig {
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.min_bars < 2 {
            return Err(RuleError::new("min_bars", "must be >= 2 (reclaim needs two bars)"));
        }
        for (field, value) in [
            ("dip_lookback", self.dip_lookback),
            ("low_lookback", self.low_lookback),
            ("volume_lookback", self.volume_lookback),
        ] {
            if value == 0 {
                return Err(RuleError::new(field, "must be >= 1"));
            }
        }
        if !(self.volume_multiplier.is_finite() && self.volume_multiplier > 0.0) {
            return Err(RuleError::new(
                "volume_multiplier",
                format!("must be > 0, got {}", self.volume_multiplier),
            ));
        }
        if !(self.stop_buffer_pct.is_finite() && self.stop_buffer_pct >= 0.0) {
            return Err(RuleError::new(
                "stop_buffer_pct",
                format!("must be >= 0, got {}", self.stop_buffer_pct),
            ));
        }
        if !(self.regime_dead_band > 0.0 && self.regime_dead_band <= 1.0) {
            return Err(RuleError::new(
                "regime_dead_band",
                format!("must be in (0, 1], got {}", self.regime_dead_band),
            ));
        }
        let [tp1, tp2] = self.target_r_multiples;
        if !(tp1.is_finite() && tp2.is_finite() && tp1 > 0.0 && tp2 > tp1) {
            return Err(RuleError::new(
                "target_r_multiples",
                format!("must satisfy 0 < tp1 < tp2, got [{tp1}, {tp2}]"),
            ));
        }
        Ok(())
    }
}

/// Per-trade risk budget in account currency. Fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskParameters {
    risk_budget: f64,
}

impl RiskParameters {
    pub fn new(risk_budget: f64) -> Result<Self, RuleError> {
        if !(risk_budget.is_finite() && risk_budget > 0.0) {
            return Err(RuleError::new(
                "risk_budget",
                format!("must be a positive amount, got {risk_budget}"),
            ));
        }
        Ok(Self { risk_budget })
    }

    pub fn risk_budget(&self) -> f64 {
        self.risk_budget
    }
}
