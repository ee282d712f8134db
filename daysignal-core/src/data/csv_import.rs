//! CSV snapshot import and export.
//!
//! One row per bar: `symbol,timestamp,open,high,low,close,volume`, with RFC 3339
//! timestamps. The same format is written by [`write_snapshot`] so a live fetch
//! can be replayed offline.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::provider::{DataError, DataProvider};
use super::snapshot::Snapshot;
use crate::domain::Bar;

#[derive(Debug, Serialize, Deserialize)]
struct CsvBarRow {
    symbol: String,
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Reads bars from a CSV file.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every row in the file, regardless of symbol or time.
    pub fn read_all(&self) -> Result<Snapshot, DataError> {
        self.read_filtered(|_| true)
    }

    fn read_filtered(&self, keep: impl Fn(&CsvBarRow) -> bool) -> Result<Snapshot, DataError> {
        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| DataError::Csv(format!("{}: {e}", self.path.display())))?;

        let mut raw: Vec<(String, Vec<Bar>)> = Vec::new();
        let mut rows = 0usize;
        for record in reader.deserialize::<CsvBarRow>() {
            let row = record?;
            rows += 1;
            if !keep(&row) {
                continue;
            }
            let bar = Bar::new(row.timestamp, row.open, row.high, row.low, row.close, row.volume);
            raw.push((row.symbol, vec![bar]));
        }

        let snapshot = Snapshot::from_raw(raw);
        debug!(
            path = %self.path.display(),
            rows,
            kept = snapshot.total_bars(),
            symbols = snapshot.len(),
            "read CSV snapshot"
        );
        Ok(snapshot)
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch_bars(
        &self,
        symbols: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Snapshot, DataError> {
        let wanted: HashSet<&str> = symbols.iter().map(String::as_str).collect();
        self.read_filtered(|row| {
            wanted.contains(row.symbol.as_str()) && row.timestamp >= start && row.timestamp <= end
        })
    }
}

/// Write every series in `snapshot` to `path` in the import format.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| DataError::Csv(format!("{}: {e}", path.display())))?;
    for series in snapshot.iter() {
        for bar in series {
            writer.serialize(CsvBarRow {
                symbol: series.symbol().to_string(),
                timestamp: bar.timestamp,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
            })?;
        }
    }
    writer
        .flush()
        .map_err(|e| DataError::Csv(format!("{}: {e}", path.display())))?;
    Ok(())
}
