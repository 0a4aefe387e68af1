//! Low IV scanner CLI
//!
//! Scans a ticker universe for low near-term implied volatility and prints
//! the tickers at or below the configured percentile.
//!
//! ```bash
//! low-iv-scan
//! low-iv-scan --tickers SPY,QQQ,IWM --percentile 50
//! low-iv-scan --config low_iv_scan.toml -v
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use low_iv_scanner::prelude::*;
use low_iv_scanner::scanner::parse_ticker_list;

/// Scan equities for low near-term implied volatility
#[derive(Parser)]
#[command(name = "low-iv-scan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./low_iv_scan.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated tickers to scan
    #[arg(short, long)]
    tickers: Option<String>,

    /// Percentile cut in [0, 100]
    #[arg(short, long)]
    percentile: Option<f64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_tracing(if cli.verbose { "debug" } else { config.log_level.as_str() });

    println!("{}", announcement(Local::now().naive_local()));

    let client =
        YahooClient::from_config(&config.provider).context("Failed to set up Yahoo client")?;
    let outcome = Scanner::new(client).scan_config(&config)?;

    print!("{}", Report::new(&outcome));
    Ok(())
}

/// File, then environment, then flags
fn resolve_config(cli: &Cli) -> Result<ScanConfig> {
    let mut config = ScanConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_env_override()?;

    if let Some(tickers) = &cli.tickers {
        config.tickers = parse_ticker_list(tickers);
    }
    if let Some(percentile) = cli.percentile {
        config.percentile = percentile;
    }
    if let Some(timeout) = cli.timeout_secs {
        config.provider.timeout_secs = timeout;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
