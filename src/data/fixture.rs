//! In-memory market data
//!
//! Deterministic `MarketDataProvider` built from fixed quotes. Scanner tests
//! run against it instead of Yahoo.

use std::cell::Cell;
use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use super::provider::MarketDataProvider;
use crate::core::{OptionChain, OptionQuote, ScannerError, ScannerResult};

#[derive(Debug, Clone)]
enum Entry {
    Market {
        expirations: Vec<NaiveDate>,
        chain: OptionChain,
        price: Option<f64>,
    },
    Failing(String),
}

/// Provider serving fixed chains and prices per symbol
#[derive(Debug, Default)]
pub struct StaticProvider {
    entries: HashMap<String, Entry>,
    requests: Cell<usize>,
}

impl StaticProvider {
    /// Expiry every fixture chain is quoted for
    pub fn front_expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 21).unwrap_or_default()
    }

    pub fn new() -> Self {
        Self::default()
    }

    /// Symbol with a front-month chain and a spot price.
    ///
    /// `calls` and `puts` are `(strike, iv)` pairs. A later expiry is also
    /// listed, but only the front one has a chain.
    pub fn with_ticker(
        self,
        symbol: &str,
        spot: f64,
        calls: &[(f64, f64)],
        puts: &[(f64, f64)],
    ) -> Self {
        self.with_market(symbol, Some(spot), calls, puts)
    }

    /// Symbol whose chain exists but whose price lookup comes back empty
    pub fn with_missing_price(self, symbol: &str, calls: &[(f64, f64)], puts: &[(f64, f64)]) -> Self {
        self.with_market(symbol, None, calls, puts)
    }

    /// Symbol with a single ATM call and put, both at `iv`
    pub fn with_flat_iv(self, symbol: &str, iv: f64) -> Self {
        self.with_ticker(symbol, 100.0, &[(100.0, iv)], &[(100.0, iv)])
    }

    /// Symbol that lists no expirations
    pub fn with_no_expirations(mut self, symbol: &str) -> Self {
        self.entries.insert(
            symbol.to_string(),
            Entry::Market {
                expirations: Vec::new(),
                chain: OptionChain::new(symbol, Self::front_expiry()),
                price: Some(100.0),
            },
        );
        self
    }

    /// Symbol whose every request fails with a network error
    pub fn with_failure(mut self, symbol: &str, message: &str) -> Self {
        self.entries
            .insert(symbol.to_string(), Entry::Failing(message.to_string()));
        self
    }

    /// Number of provider calls served so far
    pub fn request_count(&self) -> usize {
        self.requests.get()
    }

    fn with_market(
        mut self,
        symbol: &str,
        price: Option<f64>,
        calls: &[(f64, f64)],
        puts: &[(f64, f64)],
    ) -> Self {
        let front = Self::front_expiry();
        let mut chain = OptionChain::new(symbol, front);
        for &(strike, iv) in calls {
            chain.add_call(OptionQuote::new(strike, iv));
        }
        for &(strike, iv) in puts {
            chain.add_put(OptionQuote::new(strike, iv));
        }

        self.entries.insert(
            symbol.to_string(),
            Entry::Market {
                expirations: vec![front, front + Duration::days(7)],
                chain,
                price,
            },
        );
        self
    }

    fn entry(&self, symbol: &str) -> ScannerResult<(&[NaiveDate], &OptionChain, Option<f64>)> {
        self.requests.set(self.requests.get() + 1);

        match self.entries.get(symbol) {
            Some(Entry::Market {
                expirations,
                chain,
                price,
            }) => Ok((expirations.as_slice(), chain, *price)),
            Some(Entry::Failing(msg)) => Err(ScannerError::network(msg.clone())),
            None => Err(ScannerError::data(format!("Unknown symbol {}", symbol))),
        }
    }
}

impl MarketDataProvider for StaticProvider {
    fn list_expirations(&self, symbol: &str) -> ScannerResult<Vec<NaiveDate>> {
        let (expirations, _, _) = self.entry(symbol)?;
        Ok(expirations.to_vec())
    }

    fn get_chain(&self, symbol: &str, expiry: NaiveDate) -> ScannerResult<OptionChain> {
        let (_, chain, _) = self.entry(symbol)?;
        if chain.expiry != expiry {
            return Err(ScannerError::data(format!("No chain for {} on {}", symbol, expiry)));
        }
        Ok(chain.clone())
    }

    fn latest_price(&self, symbol: &str) -> ScannerResult<Option<f64>> {
        let (_, _, price) = self.entry(symbol)?;
        Ok(price)
    }
}
