//! Option quote data
//!
//! Strike and implied volatility per contract, grouped into single-expiry chains.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Option market quote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Strike price
    pub strike: f64,
    /// Implied volatility as an annualized fraction (0.25 = 25%)
    pub implied_volatility: f64,
}

impl OptionQuote {
    pub fn new(strike: f64, implied_volatility: f64) -> Self {
        Self {
            strike,
            implied_volatility,
        }
    }

    /// Absolute distance between strike and spot
    pub fn distance_to(&self, spot: f64) -> f64 {
        (self.strike - spot).abs()
    }
}

/// Chain of quotes for a single expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChain {
    /// Underlying symbol
    pub underlying: String,
    /// Expiry date
    pub expiry: NaiveDate,
    /// Call quotes by strike
    pub calls: Vec<OptionQuote>,
    /// Put quotes by strike
    pub puts: Vec<OptionQuote>,
}

impl OptionChain {
    pub fn new(underlying: impl Into<String>, expiry: NaiveDate) -> Self {
        Self {
            underlying: underlying.into(),
            expiry,
            calls: Vec::new(),
            puts: Vec::new(),
        }
    }

    /// Add a call quote
    pub fn add_call(&mut self, quote: OptionQuote) {
        self.calls.push(quote);
        self.calls.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    }

    /// Add a put quote
    pub fn add_put(&mut self, quote: OptionQuote) {
        self.puts.push(quote);
        self.puts.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    }

    /// Both calls and puts are quoted
    pub fn has_both_sides(&self) -> bool {
        !self.calls.is_empty() && !self.puts.is_empty()
    }

    /// Call with strike nearest to spot
    pub fn atm_call(&self, spot: f64) -> Option<&OptionQuote> {
        nearest_strike(&self.calls, spot)
    }

    /// Put with strike nearest to spot
    pub fn atm_put(&self, spot: f64) -> Option<&OptionQuote> {
        nearest_strike(&self.puts, spot)
    }

    /// Total number of quotes
    pub fn len(&self) -> usize {
        self.calls.len() + self.puts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Quote whose strike is closest to `spot`.
///
/// Equidistant strikes resolve to the lower strike, so the pick never
/// depends on the order quotes arrived in.
pub fn nearest_strike(quotes: &[OptionQuote], spot: f64) -> Option<&OptionQuote> {
    quotes.iter().min_by(|a, b| {
        a.distance_to(spot)
            .total_cmp(&b.distance_to(spot))
            .then_with(|| a.strike.total_cmp(&b.strike))
    })
}
