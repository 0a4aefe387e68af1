//! Per-ticker scan results

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ScannerError;

/// ATM implied volatility estimate for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IvObservation {
    pub ticker: String,
    pub implied_volatility: f64,
}

impl IvObservation {
    pub fn new(ticker: impl Into<String>, implied_volatility: f64) -> Self {
        Self {
            ticker: ticker.into(),
            implied_volatility,
        }
    }
}

/// Why a ticker produced no observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unavailability {
    /// Provider lists no option expirations
    NoExpirations,
    /// Nearest expiry is missing calls or puts
    EmptyChain,
    /// No positive spot price
    MissingPrice,
    /// Selected quotes gave a non-finite estimate
    MalformedQuote,
    /// Provider call failed (network, parse, missing field)
    Provider(String),
}

impl fmt::Display for Unavailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoExpirations => write!(f, "no option expirations"),
            Self::EmptyChain => write!(f, "option chain has no calls or no puts"),
            Self::MissingPrice => write!(f, "no spot price"),
            Self::MalformedQuote => write!(f, "malformed ATM quote"),
            Self::Provider(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<ScannerError> for Unavailability {
    fn from(err: ScannerError) -> Self {
        Self::Provider(err.to_string())
    }
}

/// Ticker that was left out of the scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: Unavailability,
}

/// Result of estimating one ticker
#[derive(Debug, Clone, PartialEq)]
pub enum TickerOutcome {
    Available(IvObservation),
    Unavailable(SkippedTicker),
}

impl TickerOutcome {
    pub fn ticker(&self) -> &str {
        match self {
            Self::Available(obs) => &obs.ticker,
            Self::Unavailable(skipped) => &skipped.ticker,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn observation(&self) -> Option<&IvObservation> {
        match self {
            Self::Available(obs) => Some(obs),
            Self::Unavailable(_) => None,
        }
    }
}
