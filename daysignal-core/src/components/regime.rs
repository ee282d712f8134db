//! Market regime: gates every long signal on the reference symbol's VWAP.
//!
//! The reference (an index ETF by default) is GREEN when its last close is at
//! or above its session VWAP, RED when it is more than the dead band below,
//! and YELLOW in between. The dead band keeps the light from flapping between
//! GREEN and RED on noise right at the VWAP line.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::indicators::Vwap;
use crate::rules::RuleConfig;

pub const NOTE_GREEN: &str = "market OK (reference above VWAP)";
pub const NOTE_RED: &str = "caution (reference below VWAP)";
pub const NOTE_YELLOW: &str = "market neutral";
pub const NOTE_REFERENCE_MISSING: &str = "reference data missing (wait)";
pub const NOTE_VWAP_UNDEFINED: &str = "reference VWAP undefined (wait)";

/// Three-state market light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Regime {
    Green,
    Yellow,
    Red,
}

impl Regime {
    pub const ALL: [Regime; 3] = [Regime::Green, Regime::Yellow, Regime::Red];

    /// Only a GREEN market permits new long entries.
    pub fn allows_longs(self) -> bool {
        self == Regime::Green
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Red => "RED",
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Regime plus the note shown next to the light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRegime {
    pub regime: Regime,
    pub note: String,
}

impl MarketRegime {
    pub fn new(regime: Regime, note: impl Into<String>) -> Self {
        Self {
            regime,
            note: note.into(),
        }
    }

    /// Fail-open default when the reference symbol is absent from the batch.
    ///
    /// YELLOW still blocks longs, so a missing reference never produces a BUY.
    pub fn reference_missing() -> Self {
        Self::new(Regime::Yellow, NOTE_REFERENCE_MISSING)
    }
}

/// Classifies the reference symbol's latest bar against its session VWAP.
#[derive(Debug, Clone)]
pub struct RegimeClassifier {
    dead_band: f64,
    vwap: Vwap,
}

impl RegimeClassifier {
    pub fn new(dead_band: f64) -> Self {
        assert!(
            dead_band > 0.0 && dead_band <= 1.0,
            "dead_band must be in (0, 1]"
        );
        Self {
            dead_band,
            vwap: Vwap,
        }
    }

    pub fn from_rules(rules: &RuleConfig) -> Self {
        Self::new(rules.regime_dead_band)
    }

    pub fn default_params() -> Self {
        Self::from_rules(&RuleConfig::default())
    }

    /// Light for a single close/VWAP pair.
    pub fn light(&self, close: f64, vwap: f64) -> Regime {
        if close >= vwap {
            Regime::Green
        } else if close < vwap * self.dead_band {
            Regime::Red
        } else {
            Regime::Yellow
        }
    }

    /// Classify the full reference series by its most recent bar.
    ///
    /// An empty series or an undefined last VWAP (no volume yet) falls back to
    /// YELLOW rather than comparing against NaN.
    pub fn classify(&self, bars: &[Bar]) -> MarketRegime {
        let (Some(last), Some(vwap)) = (bars.last(), self.vwap.last(bars)) else {
            return MarketRegime::new(Regime::Yellow, NOTE_VWAP_UNDEFINED);
        };
        if last.close.is_nan() {
            return MarketRegime::new(Regime::Yellow, NOTE_VWAP_UNDEFINED);
        }
        let regime = self.light(last.close, vwap);
        let note = match regime {
            Regime::Green => NOTE_GREEN,
            Regime::Yellow => NOTE_YELLOW,
            Regime::Red => NOTE_RED,
        };
        MarketRegime::new(regime, note)
    }

    /// Classify an optional reference series; `None` means the feed had no
    /// data for the reference symbol.
    pub fn classify_reference(&self, bars: Option<&[Bar]>) -> MarketRegime {
        match bars {
            Some(bars) => self.classify(bars),
            None => MarketRegime::reference_missing(),
        }
    }
}
