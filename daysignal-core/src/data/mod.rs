//! Bar sources: the provider trait, snapshots, Alpaca and CSV.

pub mod alpaca;
pub mod csv_import;
pub mod provider;
pub mod snapshot;

pub use alpaca::AlpacaProvider;
pub use csv_import::{write_snapshot, CsvProvider};
pub use provider::{DataError, DataProvider};
pub use snapshot::Snapshot;
