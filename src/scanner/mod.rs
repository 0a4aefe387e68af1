//! Low implied volatility scanner
//!
//! Runs in four steps:
//!
//! 1. **Estimate**: one ATM IV per ticker from the front-month chain
//! 2. **Threshold**: linear-interpolation percentile over every estimate
//! 3. **Filter**: keep tickers at or below the threshold
//! 4. **Rank**: order the survivors by IV, lowest first
//!
//! Tickers whose data cannot be loaded are skipped and reported. They never
//! abort the scan and never move the threshold.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use low_iv_scanner::prelude::*;
//!
//! let client = YahooClient::from_config(&YahooConfig::default()).unwrap();
//! let scanner = Scanner::new(client);
//!
//! let outcome = scanner.scan(&["AAPL", "MSFT", "PG"], 20.0).unwrap();
//! print!("{}", Report::new(&outcome));
//! ```

pub mod accessor;
pub mod config;
pub mod percentile;
pub mod report;

pub use accessor::fetch_implied_volatility;
pub use config::*;
pub use percentile::{percentile, validate_percentile};
pub use report::{announcement, Report};

use serde::{Deserialize, Serialize};

use crate::core::{IvObservation, ScannerResult, SkippedTicker, TickerOutcome};
use crate::data::MarketDataProvider;

/// Observations at or below the percentile threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Percentile the threshold was taken at
    pub percentile: f64,
    /// IV at that percentile over all observations
    pub threshold: f64,
    /// Number of observations the threshold was computed over
    pub observed: usize,
    /// Selected observations, IV ascending
    pub selected: Vec<IvObservation>,
    /// Tickers without data
    pub skipped: Vec<SkippedTicker>,
}

/// Outcome of a full scan
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// No ticker produced an observation
    NoData { skipped: Vec<SkippedTicker> },
    /// At least one observation; `selected` may still be empty
    Ranked(ScanResult),
}

impl ScanOutcome {
    /// Selected observations (empty for `NoData`)
    pub fn selected(&self) -> &[IvObservation] {
        match self {
            Self::NoData { .. } => &[],
            Self::Ranked(result) => &result.selected,
        }
    }

    pub fn skipped(&self) -> &[SkippedTicker] {
        match self {
            Self::NoData { skipped } => skipped,
            Self::Ranked(result) => &result.skipped,
        }
    }
}

/// Scanner over an injected market data provider
pub struct Scanner<P> {
    provider: P,
}

impl<P: MarketDataProvider> Scanner<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Scan `tickers` in order and keep those at or below `percentile`.
    ///
    /// Only an invalid percentile is an error; it is rejected before any
    /// provider call is made.
    pub fn scan<S: AsRef<str>>(&self, tickers: &[S], percentile: f64) -> ScannerResult<ScanOutcome> {
        validate_percentile(percentile)?;
        tracing::info!(
            "Scanning {} tickers at the {} percentile",
            tickers.len(),
            percentile
        );

        let outcomes: Vec<TickerOutcome> = tickers
            .iter()
            .map(|t| fetch_implied_volatility(&self.provider, t.as_ref()))
            .collect();

        rank_outcomes(outcomes, percentile)
    }

    /// Scan with the tickers and percentile from `config`
    pub fn scan_config(&self, config: &ScanConfig) -> ScannerResult<ScanOutcome> {
        self.scan(&config.tickers, config.percentile)
    }
}

/// Reduce per-ticker outcomes to the percentile cut.
///
/// Ties in IV keep their input order.
pub fn rank_outcomes(outcomes: Vec<TickerOutcome>, pct: f64) -> ScannerResult<ScanOutcome> {
    validate_percentile(pct)?;

    let mut observations = Vec::new();
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            TickerOutcome::Available(obs) => observations.push(obs),
            TickerOutcome::Unavailable(s) => skipped.push(s),
        }
    }

    if observations.is_empty() {
        tracing::info!("No valid IV data ({} tickers skipped)", skipped.len());
        return Ok(ScanOutcome::NoData { skipped });
    }

    let values: Vec<f64> = observations.iter().map(|o| o.implied_volatility).collect();
    let threshold = percentile(&values, pct)?;
    let observed = observations.len();

    let mut selected: Vec<IvObservation> = observations
        .into_iter()
        .filter(|o| o.implied_volatility <= threshold)
        .collect();
    selected.sort_by(|a, b| a.implied_volatility.total_cmp(&b.implied_volatility));

    tracing::info!(
        "IV threshold {:.4}: {} of {} tickers selected, {} skipped",
        threshold,
        selected.len(),
        observed,
        skipped.len()
    );

    Ok(ScanOutcome::Ranked(ScanResult {
        percentile: pct,
        threshold,
        observed,
        selected,
        skipped,
    }))
}
