//! Yahoo Finance data fetcher
//!
//! Fetches free option chains and daily closes for US equities.
//! Uses Yahoo Finance's unofficial API.
//!
//! Note: This is for educational/research purposes. Yahoo Finance
//! data is delayed ~15 minutes and intended for personal use.

use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::provider::MarketDataProvider;
use crate::core::{OptionChain, OptionQuote, ScannerError, ScannerResult};

const DEFAULT_OPTIONS_URL: &str = "https://query1.finance.yahoo.com/v7/finance/options";
const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Options endpoint (expirations and chains)
    pub options_url: String,
    /// Chart endpoint (daily closes)
    pub chart_url: String,
    pub user_agent: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            options_url: DEFAULT_OPTIONS_URL.to_string(),
            chart_url: DEFAULT_CHART_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Yahoo Finance API client
pub struct YahooClient {
    client: reqwest::blocking::Client,
    options_url: String,
    chart_url: String,
}

impl YahooClient {
    pub fn from_config(config: &YahooConfig) -> ScannerResult<Self> {
        if config.timeout_secs == 0 {
            return Err(ScannerError::config("timeout_secs must be positive"));
        }

        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScannerError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            options_url: config.options_url.trim_end_matches('/').to_string(),
            chart_url: config.chart_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get available option expiration dates, nearest first
    pub fn get_expirations(&self, symbol: &str) -> ScannerResult<Vec<NaiveDate>> {
        let url = format!("{}/{}", self.options_url, symbol);
        let chain = self.fetch_options(&url)?;
        Ok(expirations_from(&chain))
    }

    /// Get option chain for a specific expiration
    pub fn get_option_chain(&self, symbol: &str, expiry: NaiveDate) -> ScannerResult<OptionChain> {
        // Yahoo keys expirations by midnight UTC
        let expiry_ts = expiry
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ScannerError::invalid_input(format!("Bad expiry {}", expiry)))?
            .and_utc()
            .timestamp();

        let url = format!("{}/{}?date={}", self.options_url, symbol, expiry_ts);
        let chain_data = self.fetch_options(&url)?;

        Ok(chain_from(symbol, expiry, &chain_data))
    }

    /// Latest daily close for a symbol
    pub fn get_latest_close(&self, symbol: &str) -> ScannerResult<Option<f64>> {
        let url = format!("{}/{}?range=1d&interval=1d", self.chart_url, symbol);
        tracing::debug!("GET {}", url);

        let response: YahooChartResponse = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ScannerError::network(e.to_string()))?
            .json()
            .map_err(|e| ScannerError::data(format!("Failed to parse chart: {}", e)))?;

        latest_close_from(response)
    }

    fn fetch_options(&self, url: &str) -> ScannerResult<YahooOptionChainData> {
        tracing::debug!("GET {}", url);

        let response: YahooOptionsResponse = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ScannerError::network(e.to_string()))?
            .json()
            .map_err(|e| ScannerError::data(format!("Failed to parse options: {}", e)))?;

        first_option_result(response)
    }
}

impl MarketDataProvider for YahooClient {
    fn list_expirations(&self, symbol: &str) -> ScannerResult<Vec<NaiveDate>> {
        self.get_expirations(symbol)
    }

    fn get_chain(&self, symbol: &str, expiry: NaiveDate) -> ScannerResult<OptionChain> {
        self.get_option_chain(symbol, expiry)
    }

    fn latest_price(&self, symbol: &str) -> ScannerResult<Option<f64>> {
        self.get_latest_close(symbol)
    }
}

fn first_option_result(response: YahooOptionsResponse) -> ScannerResult<YahooOptionChainData> {
    let YahooOptionChain { result, error } = response.option_chain;

    result.into_iter().next().ok_or_else(|| match error {
        Some(err) => ScannerError::data(format!("{}: {}", err.code, err.description)),
        None => ScannerError::data("No options data returned"),
    })
}

fn expirations_from(chain: &YahooOptionChainData) -> Vec<NaiveDate> {
    chain
        .expiration_dates
        .iter()
        .filter_map(|&ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
        .collect()
}

fn chain_from(symbol: &str, expiry: NaiveDate, data: &YahooOptionChainData) -> OptionChain {
    let mut chain = OptionChain::new(symbol, expiry);

    if let Some(options) = data.options.first() {
        for call in &options.calls {
            if let Some(quote) = convert_option_quote(call) {
                chain.add_call(quote);
            }
        }

        for put in &options.puts {
            if let Some(quote) = convert_option_quote(put) {
                chain.add_put(quote);
            }
        }
    }

    chain
}

/// Contracts without a usable strike or IV are dropped
fn convert_option_quote(data: &YahooOptionData) -> Option<OptionQuote> {
    let strike = data.strike.filter(|k| k.is_finite() && *k > 0.0)?;
    let iv = data.implied_volatility.filter(|v| v.is_finite() && *v >= 0.0)?;
    Some(OptionQuote::new(strike, iv))
}

fn latest_close_from(response: YahooChartResponse) -> ScannerResult<Option<f64>> {
    let YahooChart { result, error } = response.chart;

    let data = result.into_iter().next().ok_or_else(|| match error {
        Some(err) => ScannerError::data(format!("{}: {}", err.code, err.description)),
        None => ScannerError::data("No chart data returned"),
    })?;

    let close = data
        .indicators
        .quote
        .first()
        .and_then(|q| q.close.iter().rev().find_map(|c| *c))
        .or(data.meta.regular_market_price);

    Ok(close)
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    #[serde(default)]
    result: Vec<YahooOptionChainData>,
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(default)]
    calls: Vec<YahooOptionData>,
    #[serde(default)]
    puts: Vec<YahooOptionData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionData {
    strike: Option<f64>,
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    #[serde(default)]
    result: Vec<YahooChartData>,
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    meta: YahooChartMeta,
    #[serde(default)]
    indicators: YahooIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct YahooChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTIONS_JSON: &str = r#"{
        "optionChain": {
            "result": [{
                "underlyingSymbol": "AAPL",
                "expirationDates": [1729209600, 1729814400],
                "strikes": [220.0, 225.0, 230.0],
                "options": [{
                    "expirationDate": 1729209600,
                    "calls": [
                        {"contractSymbol": "AAPL241018C00230000", "strike": 230.0, "impliedVolatility": 0.21},
                        {"contractSymbol": "AAPL241018C00220000", "strike": 220.0, "impliedVolatility": 0.26},
                        {"contractSymbol": "AAPL241018C00225000", "strike": 225.0}
                    ],
                    "puts": [
                        {"contractSymbol": "AAPL241018P00225000", "strike": 225.0, "impliedVolatility": 0.23}
                    ]
                }]
            }],
            "error": null
        }
    }"#;

    const CHART_JSON: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL", "regularMarketPrice": 227.9},
                "timestamp": [1729000000, 1729086400],
                "indicators": {"quote": [{"close": [226.4, null]}]}
            }],
            "error": null
        }
    }"#;

    fn parse_options(json: &str) -> ScannerResult<YahooOptionChainData> {
        first_option_result(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_parse_expirations() {
        let data = parse_options(OPTIONS_JSON).unwrap();
        let expiries = expirations_from(&data);

        assert_eq!(
            expiries,
            vec![
                NaiveDate::from_ymd_opt(2024, 10, 18).unwrap(),
                NaiveDate::from_ymd_opt(2024, 10, 25).unwrap(),
            ]
        );
    }

    #[test]
    fn test_parse_chain_drops_quotes_without_iv() {
        let data = parse_options(OPTIONS_JSON).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2024, 10, 18).unwrap();
        let chain = chain_from("AAPL", expiry, &data);

        assert_eq!(chain.calls.len(), 2);
        assert_eq!(chain.calls[0].strike, 220.0);
        assert_eq!(chain.calls[1].strike, 230.0);
        assert_eq!(chain.puts, vec![OptionQuote::new(225.0, 0.23)]);
    }

    #[test]
    fn test_options_error_payload() {
        let json = r#"{"optionChain": {"result": [], "error": {"code": "Not Found", "description": "No data found"}}}"#;
        let err = parse_options(json).unwrap_err();
        assert!(err.to_string().contains("No data found"));
    }

    #[test]
    fn test_latest_close_skips_trailing_null() {
        let response: YahooChartResponse = serde_json::from_str(CHART_JSON).unwrap();
        assert_eq!(latest_close_from(response).unwrap(), Some(226.4));
    }

    #[test]
    fn test_latest_close_falls_back_to_market_price() {
        let json = r#"{"chart": {"result": [{"meta": {"regularMarketPrice": 101.5}, "indicators": {"quote": [{"close": [null]}]}}], "error": null}}"#;
        let response: YahooChartResponse = serde_json::from_str(json).unwrap();
        assert_eq!(latest_close_from(response).unwrap(), Some(101.5));

        let json = r#"{"chart": {"result": [{"meta": {}, "indicators": {"quote": []}}], "error": null}}"#;
        let response: YahooChartResponse = serde_json::from_str(json).unwrap();
        assert_eq!(latest_close_from(response).unwrap(), None);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = YahooConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            YahooClient::from_config(&config),
            Err(ScannerError::Config(_))
        ));
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_expirations() {
        let client = YahooClient::from_config(&YahooConfig::default()).unwrap();
        let expiries = client.get_expirations("AAPL").unwrap();

        assert!(!expiries.is_empty());
        println!("AAPL expiries: {:?}", expiries);
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_option_chain() {
        let client = YahooClient::from_config(&YahooConfig::default()).unwrap();
        let expiries = client.get_expirations("AAPL").unwrap();

        if let Some(&expiry) = expiries.first() {
            let chain = client.get_option_chain("AAPL", expiry).unwrap();

            println!("Chain for {}: {} calls, {} puts",
                expiry, chain.calls.len(), chain.puts.len());

            assert!(chain.has_both_sides());
        }
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_latest_close() {
        let client = YahooClient::from_config(&YahooConfig::default()).unwrap();
        let close = client.get_latest_close("AAPL").unwrap();

        assert!(close.unwrap() > 0.0);
    }
}
