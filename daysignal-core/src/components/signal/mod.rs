//! Signal generation: turns one symbol's bars and the market regime into a
//! recommendation.
//!
//! Signals are pure: the same series, regime and risk parameters always yield
//! the same result, and no generator holds mutable state. That makes per-symbol
//! evaluation safe to run in parallel.

pub mod vwap_reclaim;

pub use vwap_reclaim::VwapReclaim;

use crate::components::regime::Regime;
use crate::domain::{BarSeries, SignalResult};
use crate::rules::RiskParameters;

pub const REASON_DIP: &str = "price traded below VWAP (dip)";
pub const REASON_RECLAIM: &str = "price back above VWAP (reclaim)";
pub const REASON_VOLUME: &str = "volume confirmed";

/// Trait for signal generators.
///
/// # Architecture invariant
/// Generators see only market data, the regime and the static risk budget.
/// Anything they cannot decide resolves into a WAIT result with a reason,
/// never an error.
pub trait SignalGenerator: Send + Sync {
    /// Human-readable name (e.g., "vwap_reclaim_long").
    fn name(&self) -> &str;

    /// Number of bars needed before this signal can produce a trade.
    fn warmup_bars(&self) -> usize;

    /// Evaluate the signal at the most recent bar of `series`.
    fn evaluate(&self, series: &BarSeries, regime: Regime, risk: &RiskParameters) -> SignalResult;
}

/// The three independent facts behind the VWAP-reclaim rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetupFacts {
    /// A recent close sat below its VWAP.
    pub dip: bool,
    /// The last bar crossed from at-or-below VWAP to above it.
    pub reclaim: bool,
    /// Last-bar volume reached the multiple of the baseline average.
    pub volume_confirmed: bool,
}

impl SetupFacts {
    pub fn all(&self) -> bool {
        self.dip && self.reclaim && self.volume_confirmed
    }

    /// One reason per true fact, in rule order.
    pub fn reasons(&self) -> Vec<String> {
        [
            (self.dip, REASON_DIP),
            (self.reclaim, REASON_RECLAIM),
            (self.volume_confirmed, REASON_VOLUME),
        ]
        .into_iter()
        .filter(|(fact, _)| *fact)
        .map(|(_, reason)| reason.to_string())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_follow_rule_order() {
        let facts = SetupFacts {
            dip: true,
            reclaim: false,
            volume_confirmed: true,
        };
        assert_eq!(facts.reasons(), vec![REASON_DIP, REASON_VOLUME]);
        assert!(!facts.all());
    }

    #[test]
    fn no_facts_no_reasons() {
        assert!(SetupFacts::default().reasons().is_empty());
    }

    /// Architecture contract: generators are usable as trait objects across threads.
    #[test]
    fn generator_is_object_safe_and_shareable() {
        fn _check(sig: &dyn SignalGenerator) -> &(dyn SignalGenerator + Send + Sync) {
            sig
        }
    }
}
