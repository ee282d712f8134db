//! Domain types for DaySignal

pub mod bar;
pub mod series;
pub mod signal;

pub use bar::{Bar, BarError};
pub use series::BarSeries;
pub use signal::{Action, ConfidenceTier, SignalResult, TradePlan};
