//! BarSeries: ordered, index-addressable bars for one symbol.
//!
//! The engine needs random access to the two most recent bars (reclaim edge),
//! windowed tails (last 10/20/30 bars) and a full scan for VWAP, so the
//! series is a thin wrapper over a `Vec<Bar>` with a strict-ordering invariant.

use serde::{Deserialize, Serialize};

use super::bar::{Bar, BarError};

/// Bars for a single symbol, strictly increasing by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series from bars that are already ordered.
    ///
    /// Rejects insane bars and duplicate or decreasing timestamps. Use
    /// [`BarSeries::canonicalize`] for raw provider output.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, BarError> {
        let symbol = symbol.into();
        if let Some(index) = bars.iter().position(|b| !b.is_sane()) {
            return Err(BarError::Insane { symbol, index });
        }
        for (i, pair) in bars.windows(2).enumerate() {
            let index = i + 1;
            let (prev, cur) = (&pair[0], &pair[1]);
            if cur.timestamp == prev.timestamp {
                return Err(BarError::DuplicateTimestamp {
                    symbol,
                    index,
                    timestamp: cur.timestamp,
                });
            }
            if cur.timestamp < prev.timestamp {
                return Err(BarError::OutOfOrder {
                    symbol,
                    index,
                    timestamp: cur.timestamp,
                });
            }
        }
        Ok(Self { symbol, bars })
    }

    /// Sort by timestamp, keep the first bar of each duplicate timestamp and
    /// drop bars that fail [`Bar::is_sane`].
    pub fn canonicalize(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.retain(Bar::is_sane);
        // Stable sort keeps provider order among equal timestamps, so dedup keeps the first.
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by(|later, earlier| later.timestamp == earlier.timestamp);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Most recent bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// The bar before the most recent one.
    pub fn prev(&self) -> Option<&Bar> {
        self.bars.len().checked_sub(2).map(|i| &self.bars[i])
    }

    /// The last `n` bars, or the whole series if it is shorter.
    pub fn tail(&self, n: usize) -> &[Bar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}

impl<'a> IntoIterator for &'a BarSeries {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}
