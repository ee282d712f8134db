//! Criterion benchmarks for DaySignal hot paths.
//!
//! Benchmarks:
//! 1. VWAP over a session-length series
//! 2. Regime classification of the reference symbol
//! 3. Full signal evaluation (gates, facts, sizing)

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use daysignal_core::components::indicator::Indicator;
use daysignal_core::components::{Regime, RegimeClassifier, SignalGenerator, VwapReclaim};
use daysignal_core::domain::{Bar, BarSeries};
use daysignal_core::indicators::Vwap;
use daysignal_core::rules::RiskParameters;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    let t0 = Utc.with_ymd_and_hms(2024, 3, 15, 13, 30, 0).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 2.0;
            Bar::new(
                t0 + Duration::minutes(i as i64),
                close - 0.05,
                close + 0.2,
                close - 0.2,
                close,
                1_000.0 + (i % 37) as f64 * 25.0,
            )
        })
        .collect()
}

// ── 1. VWAP ──────────────────────────────────────────────────────────

fn bench_vwap(c: &mut Criterion) {
    let mut group = c.benchmark_group("vwap");
    for n in [60usize, 220, 390] {
        let bars = make_bars(n);
        group.bench_with_input(BenchmarkId::new("compute", n), &bars, |b, bars| {
            b.iter(|| Vwap.compute(black_box(bars)))
        });
    }
    group.finish();
}

// ── 2. Regime ────────────────────────────────────────────────────────

fn bench_regime(c: &mut Criterion) {
    let bars = make_bars(220);
    let classifier = RegimeClassifier::default_params();
    c.bench_function("regime_classify_220", |b| {
        b.iter(|| classifier.classify(black_box(&bars)))
    });
}

// ── 3. Signal evaluation ─────────────────────────────────────────────

fn bench_signal(c: &mut Criterion) {
    let mut group = c.benchmark_group("vwap_reclaim_evaluate");
    let signal = VwapReclaim::default_params();
    let risk = RiskParameters::new(25.0).unwrap();
    for n in [60usize, 220] {
        let series = BarSeries::new("BENCH", make_bars(n)).unwrap();
        group.bench_with_input(BenchmarkId::new("green", n), &series, |b, series| {
            b.iter(|| signal.evaluate(black_box(series), Regime::Green, &risk))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_vwap, bench_regime, bench_signal);
criterion_main!(benches);
