//! Concrete indicator implementations.

pub mod vwap;

pub use vwap::Vwap;

/// Create synthetic one-minute bars from close prices for testing.
///
/// high = close + 0.5, low = close - 0.5 (so typical price == close),
/// open = previous close, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    use chrono::TimeZone;
    let t0 = chrono::Utc.with_ymd_and_hms(2024, 3, 15, 13, 30, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar::new(
                t0 + chrono::Duration::minutes(i as i64),
                open,
                close + 0.5,
                close - 0.5,
                close,
                1000.0,
            )
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
