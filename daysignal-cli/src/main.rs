//! DaySignal CLI: evaluate the watchlist and print the result as JSON.
//!
//! Commands:
//! - `today`: fetch the trailing window of one-minute bars from Alpaca
//! - `evaluate`: same rules on a CSV snapshot, no network
//! - `config`: print the effective configuration as TOML
//!
//! Logs go to stderr (filter with `RUST_LOG`); stdout carries only the output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use daysignal_core::data::{write_snapshot, AlpacaProvider, CsvProvider};
use daysignal_runner::{evaluate_with_config, load_snapshot, AppConfig, Evaluation};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "daysignal",
    about = "DaySignal: intraday VWAP reclaim signals with a market light"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch live one-minute bars from Alpaca and evaluate the watchlist.
    Today {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON output.
        #[arg(long, default_value_t = false)]
        pretty: bool,

        /// Also write the fetched bars to this CSV file for offline replay.
        #[arg(long)]
        save_bars: Option<PathBuf>,
    },
    /// Evaluate the watchlist on a CSV snapshot (symbol,timestamp,open,high,low,close,volume).
    Evaluate {
        /// CSV snapshot file.
        #[arg(long)]
        bars: PathBuf,

        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON output.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Print the effective configuration (file + environment) as TOML.
    Config {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // A missing .env is fine; credentials may come from the real environment.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Today {
            config,
            pretty,
            save_bars,
        } => run_today(config.as_deref(), pretty, save_bars.as_deref()),
        Commands::Evaluate {
            bars,
            config,
            pretty,
        } => run_evaluate(&bars, config.as_deref(), pretty),
        Commands::Config { config } => run_config(config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = AppConfig::load(path).with_context(|| match path {
        Some(p) => format!("failed to load config from {}", p.display()),
        None => "invalid default configuration".to_string(),
    })?;
    info!(
        watchlist = ?config.market.watchlist,
        reference = %config.market.reference_symbol,
        risk_budget = config.risk.budget,
        "configuration loaded"
    );
    Ok(config)
}

fn run_today(config_path: Option<&Path>, pretty: bool, save_bars: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let provider = AlpacaProvider::from_env()
        .context("cannot create Alpaca provider")?
        .with_feed(config.provider.feed.clone());

    let now = Utc::now();
    let snapshot = load_snapshot(&provider, &config, now)?;

    if let Some(path) = save_bars {
        write_snapshot(path, &snapshot)
            .with_context(|| format!("failed to save bars to {}", path.display()))?;
        info!(path = %path.display(), bars = snapshot.total_bars(), "saved snapshot");
    }

    let evaluation = evaluate_with_config(&config, &snapshot, now)?;
    print_evaluation(&evaluation, pretty)
}

fn run_evaluate(bars: &Path, config_path: Option<&Path>, pretty: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let snapshot = CsvProvider::new(bars)
        .read_all()
        .with_context(|| format!("failed to read bars from {}", bars.display()))?;

    // Stamp records with the snapshot's last bar so replays are reproducible.
    let as_of = snapshot
        .iter()
        .filter_map(|s| s.last().map(|b| b.timestamp))
        .max()
        .unwrap_or_else(Utc::now);

    let evaluation = evaluate_with_config(&config, &snapshot, as_of)?;
    print_evaluation(&evaluation, pretty)
}

fn run_config(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

fn print_evaluation(evaluation: &Evaluation, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(evaluation)?
    } else {
        serde_json::to_string(evaluation)?
    };
    println!("{json}");
    info!(
        light = %evaluation.market.light,
        signals = evaluation.signals.len(),
        buys = evaluation.buys().count(),
        "done"
    );
    Ok(())
}
