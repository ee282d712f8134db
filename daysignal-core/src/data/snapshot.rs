//! Snapshot: one consistent batch of bars across symbols.

use std::collections::BTreeMap;

use crate::domain::{Bar, BarSeries};

/// Canonicalized bar series keyed by symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    series: BTreeMap<String, BarSeries>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw provider output.
    ///
    /// Rows for the same symbol are merged, each symbol is canonicalized, and
    /// symbols left with no bars are dropped so they read as absent.
    pub fn from_raw<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<Bar>)>,
    {
        let mut merged: BTreeMap<String, Vec<Bar>> = BTreeMap::new();
        for (symbol, bars) in raw {
            merged.entry(symbol).or_default().extend(bars);
        }
        let series = merged
            .into_iter()
            .map(|(symbol, bars)| (symbol.clone(), BarSeries::canonicalize(symbol, bars)))
            .filter(|(_, s)| !s.is_empty())
            .collect();
        Self { series }
    }

    /// Insert or replace one symbol's series. An empty series removes the
    /// symbol, matching [`Snapshot::from_raw`].
    pub fn insert(&mut self, series: BarSeries) {
        if series.is_empty() {
            self.series.remove(series.symbol());
            return;
        }
        self.series.insert(series.symbol().to_string(), series);
    }

    pub fn get(&self, symbol: &str) -> Option<&BarSeries> {
        self.series.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.series.contains_key(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BarSeries> {
        self.series.values()
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// True when no symbol carries a single bar.
    pub fn is_empty(&self) -> bool {
        self.total_bars() == 0
    }

    pub fn total_bars(&self) -> usize {
        self.series.values().map(BarSeries::len).sum()
    }
}
