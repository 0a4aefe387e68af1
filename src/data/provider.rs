//! Market data provider interface

use chrono::NaiveDate;

use crate::core::{OptionChain, ScannerResult};

/// The three queries the scanner needs from a market data source.
///
/// Implementations may fail arbitrarily; callers treat every error as
/// scoped to the symbol being queried.
pub trait MarketDataProvider {
    /// Option expirations for `symbol`, nearest first
    fn list_expirations(&self, symbol: &str) -> ScannerResult<Vec<NaiveDate>>;

    /// Calls and puts for `symbol` expiring on `expiry`
    fn get_chain(&self, symbol: &str, expiry: NaiveDate) -> ScannerResult<OptionChain>;

    /// Latest close over the shortest window the source offers.
    /// `Ok(None)` means the source answered but had no price.
    fn latest_price(&self, symbol: &str) -> ScannerResult<Option<f64>>;
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for &P {
    fn list_expirations(&self, symbol: &str) -> ScannerResult<Vec<NaiveDate>> {
        (**self).list_expirations(symbol)
    }

    fn get_chain(&self, symbol: &str, expiry: NaiveDate) -> ScannerResult<OptionChain> {
        (**self).get_chain(symbol, expiry)
    }

    fn latest_price(&self, symbol: &str) -> ScannerResult<Option<f64>> {
        (**self).latest_price(symbol)
    }
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for Box<P> {
    fn list_expirations(&self, symbol: &str) -> ScannerResult<Vec<NaiveDate>> {
        (**self).list_expirations(symbol)
    }

    fn get_chain(&self, symbol: &str, expiry: NaiveDate) -> ScannerResult<OptionChain> {
        (**self).get_chain(symbol, expiry)
    }

    fn latest_price(&self, symbol: &str) -> ScannerResult<Option<f64>> {
        (**self).latest_price(symbol)
    }
}
