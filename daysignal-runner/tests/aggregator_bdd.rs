//! BDD tests for the watchlist aggregator.
//!
//! These tests verify end-to-end evaluation:
//! - A clean reclaim in a GREEN market produces a BUY
//! - Weak volume, RED market and a missing reference symbol produce WAITs
//! - Empty upstream data is the only hard failure
//! - Parallel evaluation matches one-by-one evaluation and is repeatable

use chrono::{DateTime, Duration, TimeZone, Utc};
use daysignal_core::components::regime::{NOTE_REFERENCE_MISSING, NOTE_RED};
use daysignal_core::components::signal::vwap_reclaim::REASON_VOLUME_MISSING;
use daysignal_core::components::{Regime, SignalGenerator, VwapReclaim};
use daysignal_core::data::{write_snapshot, CsvProvider, Snapshot};
use daysignal_core::domain::{Action, Bar};
use daysignal_core::rules::{RiskParameters, RuleConfig};
use daysignal_runner::{evaluate, evaluate_with_config, load_snapshot, AppConfig, EvaluateError};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 13, 30, 0).unwrap()
}

fn now() -> DateTime<Utc> {
    t0() + Duration::minutes(60)
}

fn bars_from(closes: &[f64], volume: f64) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(t0() + Duration::minutes(i as i64), c, c + 0.1, c - 0.1, c, volume))
        .collect()
}

/// 60-bar session: flat, eight-bar dip, recovery under VWAP, reclaim bar whose
/// volume is `ratio` times the 20-bar mean.
fn reclaim_session(ratio: f64) -> Vec<Bar> {
    let mut closes = vec![100.0; 50];
    closes.extend((50..58).map(|i| 100.0 - 0.25 * (i - 49) as f64));
    closes.extend([99.8, 100.5]);
    let mut bars = bars_from(&closes, 1000.0);
    bars[59].volume = ratio * 19.0 * 1000.0 / (20.0 - ratio);
    bars
}

fn green_reference() -> Vec<Bar> {
    bars_from(&[500.0; 60], 50_000.0)
}

/// Reference flat at 100, last bar 3% under VWAP.
fn red_reference() -> Vec<Bar> {
    let mut closes = vec![100.0; 59];
    closes.push(97.0);
    let mut bars = bars_from(&closes, 1000.0);
    bars[59].volume = 1.0;
    bars
}

fn watchlist() -> Vec<String> {
    ["SPY", "AAPL", "MSFT"].iter().map(|s| s.to_string()).collect()
}

fn run(snapshot: &Snapshot) -> Result<daysignal_runner::Evaluation, EvaluateError> {
    evaluate(
        &watchlist(),
        "SPY",
        &RiskParameters::new(25.0).unwrap(),
        &RuleConfig::default(),
        snapshot,
        now(),
    )
}

// ──────────────────────────────────────────────
// Scenarios
// ──────────────────────────────────────────────

#[test]
fn bdd_scenario_clean_reclaim_in_green_market_buys() {
    // GIVEN a GREEN reference and AAPL reclaiming VWAP on double volume
    let snapshot = Snapshot::from_raw(vec![
        ("SPY".to_string(), green_reference()),
        ("AAPL".to_string(), reclaim_session(2.0)),
    ]);

    // WHEN the watchlist is evaluated
    let eval = run(&snapshot).expect("evaluation should succeed");

    // THEN the market is GREEN
    assert_eq!(eval.market.light, Regime::Green);
    assert_eq!(eval.market.reference_symbol, "SPY");

    // AND AAPL is a BUY at 75 with a sized plan
    let aapl = eval.signals.iter().find(|s| s.symbol == "AAPL").unwrap();
    assert_eq!(aapl.action, Action::Buy);
    assert_eq!(aapl.confidence, 75);
    assert_eq!(aapl.entry_price, Some(100.5));
    assert_eq!(aapl.shares, 9);
    assert_eq!(aapl.risk_budget, 25.0);

    // AND MSFT, absent from the snapshot, is skipped
    assert!(eval.signals.iter().all(|s| s.symbol != "MSFT"));
    assert_eq!(eval.buys().count(), 1);
}

#[test]
fn bdd_scenario_reclaim_without_volume_waits() {
    // GIVEN a GREEN reference and AAPL reclaiming on only 1.1× volume
    let snapshot = Snapshot::from_raw(vec![
        ("SPY".to_string(), green_reference()),
        ("AAPL".to_string(), reclaim_session(1.1)),
    ]);

    // WHEN the watchlist is evaluated
    let eval = run(&snapshot).unwrap();

    // THEN AAPL waits at 55 asking for volume
    let aapl = eval.signals.iter().find(|s| s.symbol == "AAPL").unwrap();
    assert_eq!(aapl.action, Action::Wait);
    assert_eq!(aapl.confidence, 55);
    assert_eq!(aapl.reasons.last().unwrap(), REASON_VOLUME_MISSING);
}

#[test]
fn bdd_scenario_red_market_blocks_every_symbol() {
    // GIVEN a reference 3% below its VWAP
    let snapshot = Snapshot::from_raw(vec![
        ("SPY".to_string(), red_reference()),
        ("AAPL".to_string(), reclaim_session(2.0)),
        ("MSFT".to_string(), reclaim_session(2.0)),
    ]);

    // WHEN the watchlist is evaluated
    let eval = run(&snapshot).unwrap();

    // THEN the light is RED
    assert_eq!(eval.market.light, Regime::Red);
    assert_eq!(eval.market.note, NOTE_RED);

    // AND every symbol waits at 35
    assert_eq!(eval.signals.len(), 3);
    for record in &eval.signals {
        assert_eq!(record.action, Action::Wait);
        assert_eq!(record.confidence, 35);
    }
}

#[test]
fn bdd_scenario_missing_reference_fails_open_to_yellow() {
    // GIVEN a snapshot without the reference symbol
    let snapshot = Snapshot::from_raw(vec![("AAPL".to_string(), reclaim_session(2.0))]);

    // WHEN the watchlist is evaluated
    let eval = run(&snapshot).unwrap();

    // THEN the market is YELLOW with the missing-data note
    assert_eq!(eval.market.light, Regime::Yellow);
    assert_eq!(eval.market.note, NOTE_REFERENCE_MISSING);

    // AND no symbol can be a BUY
    assert_eq!(eval.buys().count(), 0);
}

#[test]
fn bdd_scenario_empty_upstream_is_an_error() {
    // GIVEN a provider that returned nothing
    let snapshot = Snapshot::from_raw(vec![("SPY".to_string(), vec![])]);

    // WHEN the watchlist is evaluated
    let result = run(&snapshot);

    // THEN evaluation fails with UpstreamEmpty
    assert!(matches!(result, Err(EvaluateError::UpstreamEmpty)));
}

#[test]
fn bdd_scenario_parallel_matches_sequential_and_repeats() {
    // GIVEN a mixed watchlist
    let snapshot = Snapshot::from_raw(vec![
        ("SPY".to_string(), green_reference()),
        ("AAPL".to_string(), reclaim_session(2.0)),
        ("MSFT".to_string(), reclaim_session(1.1)),
    ]);
    let risk = RiskParameters::new(25.0).unwrap();

    // WHEN it is evaluated twice through the aggregator
    let first = run(&snapshot).unwrap();
    let second = run(&snapshot).unwrap();

    // THEN both runs are identical
    assert_eq!(first, second);

    // AND each record matches a direct one-by-one evaluation
    let signal = VwapReclaim::default_params();
    for record in &first.signals {
        let direct = signal.evaluate(snapshot.get(&record.symbol).unwrap(), first.market.light, &risk);
        assert_eq!(record.action, direct.action);
        assert_eq!(record.confidence, direct.confidence);
        assert_eq!(record.reasons, direct.reasons);
        assert_eq!(record.shares, direct.shares);
    }
}

#[test]
fn bdd_scenario_csv_snapshot_end_to_end() {
    // GIVEN a CSV snapshot on disk and the default configuration
    let snapshot = Snapshot::from_raw(vec![
        ("SPY".to_string(), green_reference()),
        ("AAPL".to_string(), reclaim_session(2.0)),
    ]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.csv");
    write_snapshot(&path, &snapshot).unwrap();
    let config = AppConfig::default();

    // WHEN it is loaded through the provider trait over the trailing window and evaluated
    let provider = CsvProvider::new(&path);
    let loaded = load_snapshot(&provider, &config, now()).expect("load should succeed");
    let eval = evaluate_with_config(&config, &loaded, now()).unwrap();

    // THEN records follow the configured watchlist order
    let order: Vec<&str> = eval.signals.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(order, vec!["SPY", "AAPL"]);

    // AND the JSON output carries the presentation keys
    let json = serde_json::to_string(&eval).unwrap();
    assert!(json.contains("\"entryTriggerText\""));
    assert!(json.contains("\"light\":\"GREEN\""));
}
