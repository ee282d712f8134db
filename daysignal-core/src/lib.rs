//! DaySignal Core: intraday VWAP-reclaim signal computation.
//!
//! This crate contains everything needed to turn one batch of one-minute bars
//! into per-symbol recommendations:
//! - Domain types (bars, series, signal results)
//! - Session-cumulative VWAP indicator
//! - Market regime classifier on a reference symbol
//! - VWAP reclaim signal with risk-budget sizing
//! - Bar providers (Alpaca REST, CSV snapshots)

pub mod components;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod rules;
pub mod sizers;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything shared across the rayon pool is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::BarSeries>();
        require_sync::<domain::BarSeries>();
        require_send::<domain::SignalResult>();
        require_sync::<domain::SignalResult>();

        // Rules
        require_send::<rules::RuleConfig>();
        require_sync::<rules::RuleConfig>();
        require_send::<rules::RiskParameters>();
        require_sync::<rules::RiskParameters>();

        // Components
        require_send::<components::RegimeClassifier>();
        require_sync::<components::RegimeClassifier>();
        require_send::<components::VwapReclaim>();
        require_sync::<components::VwapReclaim>();
        require_send::<sizers::RiskBudgetSizer>();
        require_sync::<sizers::RiskBudgetSizer>();

        // Data
        require_send::<data::Snapshot>();
        require_sync::<data::Snapshot>();
        require_send::<data::AlpacaProvider>();
        require_sync::<data::AlpacaProvider>();
        require_send::<data::CsvProvider>();
        require_sync::<data::CsvProvider>();
    }

    /// Architecture contract: the signal sees bars, regime and risk budget only.
    ///
    /// If someone threads extra state into `evaluate()`, every implementation
    /// breaks and this test documents why.
    #[test]
    fn signal_generator_sees_only_market_inputs() {
        fn _check_trait_object_builds(
            sig: &dyn components::SignalGenerator,
            series: &domain::BarSeries,
            regime: components::Regime,
            risk: &rules::RiskParameters,
        ) -> domain::SignalResult {
            sig.evaluate(series, regime, risk)
        }
    }
}
