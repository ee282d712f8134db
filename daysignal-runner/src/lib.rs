//! DaySignal Runner: configuration, snapshot loading, watchlist evaluation.
//!
//! This crate builds on `daysignal-core` to provide:
//! - TOML + environment configuration
//! - Snapshot loading from any `DataProvider` over the trailing window
//! - The aggregator: one regime, one signal per watch-listed symbol, in parallel

pub mod aggregator;
pub mod config;
pub mod data_loader;

pub use aggregator::{
    evaluate, evaluate_with_config, EvaluateError, Evaluation, MarketSummary, SignalRecord,
};
pub use config::{AppConfig, ConfigError};
pub use data_loader::{load_snapshot, LoadError};
