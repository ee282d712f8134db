//! Signal result: the per-symbol recommendation.

use serde::{Deserialize, Serialize};

/// What the trader should do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Wait,
    Buy,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wait => "WAIT",
            Self::Buy => "BUY",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed confidence per decision branch.
///
/// These are certainty tiers, not calibrated probabilities. Each branch of the
/// rule maps to exactly one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceTier {
    /// Regime is not GREEN.
    RegimeBlocked,
    /// Too few bars, or VWAP undefined at the decision point.
    InsufficientData,
    /// Rule facts did not line up.
    NoSetup,
    /// Computed risk per share was not positive.
    ImplausibleStop,
    /// Reclaim without volume confirmation.
    VolumeMissing,
    /// Risk per share exceeds the whole risk budget.
    StopTooWide,
    /// Every rule satisfied and sized.
    RulesSatisfied,
}

impl ConfidenceTier {
    pub const fn value(self) -> u8 {
        match self {
            Self::RegimeBlocked => 35,
            Self::InsufficientData => 40,
            Self::NoSetup => 45,
            Self::ImplausibleStop => 50,
            Self::VolumeMissing => 55,
            Self::StopTooWide => 55,
            Self::RulesSatisfied => 75,
        }
    }
}

/// Entry, stop, targets and share count for a sized long trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradePlan {
    pub entry: f64,
    pub stop: f64,
    /// Risk per share: entry − stop.
    pub risk_per_share: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub shares: u64,
}

/// Recommendation for one symbol, produced once per evaluation.
///
/// Price fields are `Some` only for [`Action::Buy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub action: Action,
    pub confidence: u8,
    pub entry_price: Option<f64>,
    pub stop: Option<f64>,
    pub tp1: Option<f64>,
    pub tp2: Option<f64>,
    pub shares: u64,
    pub reasons: Vec<String>,
}

impl SignalResult {
    pub fn wait(tier: ConfidenceTier, reasons: Vec<String>) -> Self {
        Self {
            action: Action::Wait,
            confidence: tier.value(),
            entry_price: None,
            stop: None,
            tp1: None,
            tp2: None,
            shares: 0,
            reasons,
        }
    }

    pub fn buy(plan: &TradePlan, reasons: Vec<String>) -> Self {
        Self {
            action: Action::Buy,
            confidence: ConfidenceTier::RulesSatisfied.value(),
            entry_price: Some(plan.entry),
            stop: Some(plan.stop),
            tp1: Some(plan.tp1),
            tp2: Some(plan.tp2),
            shares: plan.shares,
            reasons,
        }
    }

    pub fn is_buy(&self) -> bool {
        self.action == Action::Buy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_table() {
        assert_eq!(ConfidenceTier::RegimeBlocked.value(), 35);
        assert_eq!(ConfidenceTier::InsufficientData.value(), 40);
        assert_eq!(ConfidenceTier::NoSetup.value(), 45);
        assert_eq!(ConfidenceTier::ImplausibleStop.value(), 50);
        assert_eq!(ConfidenceTier::VolumeMissing.value(), 55);
        assert_eq!(ConfidenceTier::StopTooWide.value(), 55);
        assert_eq!(ConfidenceTier::RulesSatisfied.value(), 75);
    }

    #[test]
    fn wait_has_no_prices() {
        let r = SignalResult::wait(ConfidenceTier::NoSetup, vec!["x".into()]);
        assert_eq!(r.action, Action::Wait);
        assert_eq!(r.confidence, 45);
        assert!(r.entry_price.is_none() && r.stop.is_none());
        assert!(r.tp1.is_none() && r.tp2.is_none());
        assert_eq!(r.shares, 0);
    }

    #[test]
    fn buy_copies_plan() {
        let plan = TradePlan {
            entry: 100.0,
            stop: 99.5,
            risk_per_share: 0.5,
            tp1: 100.5,
            tp2: 101.0,
            shares: 50,
        };
        let r = SignalResult::buy(&plan, vec![]);
        assert!(r.is_buy());
        assert_eq!(r.confidence, 75);
        assert_eq!(r.entry_price, Some(100.0));
        assert_eq!(r.tp2, Some(101.0));
        assert_eq!(r.shares, 50);
    }

    #[test]
    fn action_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Action::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&Action::Wait).unwrap(), "\"WAIT\"");
    }
}
