//! Volume-Weighted Average Price (VWAP).
//!
//! Session-cumulative: VWAP[i] = Σ tp·vol / Σ vol over bars 0..=i, with
//! tp = (high + low + close) / 3. The divisor only grows across the series;
//! there is no rolling window.
//!
//! Undefined (NaN) wherever cumulative volume is still zero. Callers must not
//! compare prices against those positions.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, Default)]
pub struct Vwap;

impl Vwap {
    /// VWAP at the most recent bar only, or `None` if undefined there.
    pub fn last(&self, bars: &[Bar]) -> Option<f64> {
        self.compute(bars).last().copied().filter(|v| !v.is_nan())
    }
}

impl Indicator for Vwap {
    fn name(&self) -> &str {
        "vwap"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let mut cum_pv = 0.0;
        let mut cum_volume = 0.0;
        bars.iter()
            .map(|bar| {
                cum_pv += bar.typical_price() * bar.volume;
                cum_volume += bar.volume;
                if cum_volume > 0.0 {
                    cum_pv / cum_volume
                } else {
                    f64::NAN
                }
            })
            .collect()
    }
}
