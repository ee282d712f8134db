//! Risk-budget sizer
//!
//! Fixed currency risk per trade, stop-distance based quantity, targets at
//! whole R-multiples above entry.

use crate::domain::{ConfidenceTier, TradePlan};
use crate::rules::{RiskParameters, RuleConfig};

pub const REASON_IMPLAUSIBLE_STOP: &str = "implausible stop → no trade";
pub const REASON_STOP_TOO_WIDE: &str = "stop too large for risk budget → no trade";

/// Why a candidate trade could not be sized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizingRejection {
    /// Risk per share was zero, negative or not finite, or the targets
    /// collapsed onto the entry.
    ImplausibleStop { risk_per_share: f64 },
    /// A single share would already exceed the risk budget.
    StopTooWide { risk_per_share: f64 },
}

impl SizingRejection {
    pub fn tier(&self) -> ConfidenceTier {
        match self {
            Self::ImplausibleStop { .. } => ConfidenceTier::ImplausibleStop,
            Self::StopTooWide { .. } => ConfidenceTier::StopTooWide,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Self::ImplausibleStop { .. } => REASON_IMPLAUSIBLE_STOP,
            Self::StopTooWide { .. } => REASON_STOP_TOO_WIDE,
        }
    }
}

/// Risk-budget sizer
///
/// # Formula
/// ```text
/// r      = entry - stop
/// shares = floor(risk_budget / r)
/// tp1    = entry + m1 * r
/// tp2    = entry + m2 * r
/// ```
///
/// # Example
/// - Risk budget: 25.00
/// - Entry: 100.00, stop: 99.50 → r = 0.50
/// - Shares: floor(25 / 0.5) = 50
/// - Targets (1R, 2R): 100.50, 101.00
#[derive(Debug, Clone)]
pub struct RiskBudgetSizer {
    risk_budget: f64,
    target_r_multiples: [f64; 2],
}

impl RiskBudgetSizer {
    pub fn new(risk: &RiskParameters, target_r_multiples: [f64; 2]) -> Self {
        assert!(
            target_r_multiples[0] > 0.0 && target_r_multiples[1] > target_r_multiples[0],
            "target multiples must satisfy 0 < tp1 < tp2"
        );
        Self {
            risk_budget: risk.risk_budget(),
            target_r_multiples,
        }
    }

    pub fn from_rules(risk: &RiskParameters, rules: &RuleConfig) -> Self {
        Self::new(risk, rules.target_r_multiples)
    }

    pub fn name(&self) -> &str {
        "risk_budget"
    }

    /// Size a long entry with the given protective stop.
    pub fn plan(&self, entry: f64, stop: f64) -> Result<TradePlan, SizingRejection> {
        let risk_per_share = entry - stop;
        if !(risk_per_share.is_finite() && risk_per_share > 0.0) {
            return Err(SizingRejection::ImplausibleStop { risk_per_share });
        }

        let shares = (self.risk_budget / risk_per_share).floor();
        if shares < 1.0 {
            return Err(SizingRejection::StopTooWide { risk_per_share });
        }

        let [m1, m2] = self.target_r_multiples;
        let tp1 = entry + m1 * risk_per_share;
        let tp2 = entry + m2 * risk_per_share;

        // r can be positive yet vanish next to a large entry price.
        if !(stop < entry && entry < tp1 && tp1 < tp2) {
            return Err(SizingRejection::ImplausibleStop { risk_per_share });
        }

        Ok(TradePlan {
            entry,
            stop,
            risk_per_share,
            tp1,
            tp2,
            // float → int `as` saturates, so an enormous quotient cannot wrap.
            shares: shares as u64,
        })
    }
}
