//! Component traits and implementations.
//!
//! - Indicator: precomputed numeric series over a bar slice (VWAP)
//! - Regime: market light from the reference symbol, gates every long entry
//! - Signal generator: per-symbol rule producing a WAIT/BUY recommendation

pub mod indicator;
pub mod regime;
pub mod signal;

pub use indicator::Indicator;
pub use regime::{MarketRegime, Regime, RegimeClassifier};
pub use signal::{SetupFacts, SignalGenerator, VwapReclaim};
