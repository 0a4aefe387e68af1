//! # Low IV Scanner
//!
//! Finds the equities in a fixed universe whose near-term options market
//! implies unusually low volatility.
//!
//! ## Overview
//!
//! For each ticker the scanner:
//! - Loads the option chain for the nearest expiration
//! - Picks the call and the put whose strikes are closest to spot
//! - Averages their implied volatilities into one ATM estimate
//!
//! Estimates are then cut at a percentile of the whole run (20th by default)
//! and the survivors are ranked, lowest IV first.
//!
//! ## Key Components
//!
//! - **Data Fetching**: `MarketDataProvider` seam, Yahoo Finance client
//! - **Accessor**: per-ticker ATM IV with failures contained to the ticker
//! - **Scanner**: percentile threshold, filter and ranking
//! - **Report**: timestamped, human-readable output
//!
//! ## Usage
//!
//! ```rust,no_run
//! use low_iv_scanner::prelude::*;
//!
//! let config = ScanConfig::default();
//! let client = YahooClient::from_config(&config.provider).unwrap();
//!
//! let outcome = Scanner::new(client).scan_config(&config).unwrap();
//! for obs in outcome.selected() {
//!     println!("{} {:.4}", obs.ticker, obs.implied_volatility);
//! }
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Cache market data or retry failed requests
//! - Model the smile, skew or term structure
//! - Build portfolios or place trades

pub mod core;
pub mod data;
pub mod scanner;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        nearest_strike, IvObservation, OptionChain, OptionQuote, ScannerError, ScannerResult,
        SkippedTicker, TickerOutcome, Unavailability,
    };

    // Data fetching
    pub use crate::data::{MarketDataProvider, StaticProvider, YahooClient, YahooConfig};

    // Scanning
    pub use crate::scanner::{
        announcement, fetch_implied_volatility, percentile, rank_outcomes, validate_percentile,
        Report, ScanConfig, ScanOutcome, ScanResult, Scanner, DEFAULT_PERCENTILE,
        DEFAULT_TICKERS,
    };
}

// Re-export main types at crate root
pub use crate::core::{ScannerError, ScannerResult};
pub use crate::scanner::{ScanOutcome, Scanner};
