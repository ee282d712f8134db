//! VWAP reclaim long: buy the first close back above VWAP after a dip, when
//! volume confirms.
//!
//! Gates, in order, each short-circuiting into WAIT:
//! 1. regime must be GREEN
//! 2. at least `min_bars` bars, with VWAP defined on the last two
//!
//! Then three facts are evaluated independently: `dip` (a close below VWAP in
//! the last `dip_lookback` bars), `reclaim` (prev close <= prev VWAP and last
//! close > last VWAP, an edge trigger) and `volume_confirmed` (last volume >=
//! multiplier × mean of the last `volume_lookback` volumes). All three true
//! sends the trade to the risk-budget sizer.

use crate::components::indicator::Indicator;
use crate::components::regime::Regime;
use crate::domain::{Bar, BarSeries, ConfidenceTier, SignalResult};
use crate::indicators::Vwap;
use crate::rules::{RiskParameters, RuleConfig};
use crate::sizers::RiskBudgetSizer;

use super::{SetupFacts, SignalGenerator};

pub const REASON_REGIME_BLOCKED: &str = "market not green → no long trade";
pub const REASON_INSUFFICIENT_DATA: &str = "insufficient live data (wait a few minutes)";
pub const REASON_VOLUME_MISSING: &str = "volume missing → wait";
pub const REASON_NO_SETUP: &str = "no clean setup";
pub const REASON_RULES_SATISFIED: &str = "rules satisfied (VWAP reclaim long)";

/// VWAP reclaim long signal.
#[derive(Debug, Clone)]
pub struct VwapReclaim {
    rules: RuleConfig,
    vwap: Vwap,
}

impl VwapReclaim {
    pub fn new(rules: RuleConfig) -> Self {
        assert!(rules.min_bars >= 2, "min_bars must be >= 2");
        Self { rules, vwap: Vwap }
    }

    pub fn default_params() -> Self {
        Self::new(RuleConfig::default())
    }

    /// Evaluate the three rule facts at the last bar.
    ///
    /// `bars` and `vwap` must be the same length and hold at least two bars.
    pub fn facts(&self, bars: &[Bar], vwap: &[f64]) -> SetupFacts {
        let n = bars.len();
        let (last, prev) = (n - 1, n - 2);

        // NaN VWAP compares false, so undefined points never count as a dip.
        let dip_start = n.saturating_sub(self.rules.dip_lookback);
        let dip = (dip_start..n).any(|i| bars[i].close < vwap[i]);

        let reclaim = bars[last].close > vwap[last] && bars[prev].close <= vwap[prev];

        let window = &bars[n.saturating_sub(self.rules.volume_lookback)..];
        let avg_volume = window.iter().map(|b| b.volume).sum::<f64>() / window.len() as f64;
        let volume_confirmed = bars[last].volume >= self.rules.volume_multiplier * avg_volume;

        SetupFacts {
            dip,
            reclaim,
            volume_confirmed,
        }
    }

    /// Protective stop: recent swing low minus a buffer proportional to entry.
    pub fn stop_price(&self, bars: &[Bar], entry: f64) -> f64 {
        let recent = &bars[bars.len().saturating_sub(self.rules.low_lookback)..];
        let recent_low = recent.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        recent_low - self.rules.stop_buffer_pct * entry
    }
}

impl SignalGenerator for VwapReclaim {
    fn name(&self) -> &str {
        "vwap_reclaim_long"
    }

    fn warmup_bars(&self) -> usize {
        self.rules.min_bars
    }

    fn evaluate(&self, series: &BarSeries, regime: Regime, risk: &RiskParameters) -> SignalResult {
        if !regime.allows_longs() {
            return SignalResult::wait(
                ConfidenceTier::RegimeBlocked,
                vec![REASON_REGIME_BLOCKED.into()],
            );
        }

        let bars = series.bars();
        let insufficient = || {
            SignalResult::wait(
                ConfidenceTier::InsufficientData,
                vec![REASON_INSUFFICIENT_DATA.into()],
            )
        };
        if bars.len() < self.warmup_bars() {
            return insufficient();
        }

        let vwap = self.vwap.compute(bars);
        let n = bars.len();
        if vwap[n - 1].is_nan() || vwap[n - 2].is_nan() {
            return insufficient();
        }

        let facts = self.facts(bars, &vwap);
        let mut reasons = facts.reasons();

        if facts.all() {
            let entry = bars[n - 1].close;
            let stop = self.stop_price(bars, entry);
            let sizer = RiskBudgetSizer::from_rules(risk, &self.rules);
            return match sizer.plan(entry, stop) {
                Ok(plan) => {
                    reasons.push(REASON_RULES_SATISFIED.into());
                    SignalResult::buy(&plan, reasons)
                }
                Err(rejection) => {
                    reasons.push(rejection.reason().into());
                    SignalResult::wait(rejection.tier(), reasons)
                }
            };
        }

        if facts.reclaim && !facts.volume_confirmed {
            reasons.push(REASON_VOLUME_MISSING.into());
            return SignalResult::wait(ConfidenceTier::VolumeMissing, reasons);
        }

        if reasons.is_empty() {
            reasons.push(REASON_NO_SETUP.into());
        }
        SignalResult::wait(ConfidenceTier::NoSetup, reasons)
    }
}
