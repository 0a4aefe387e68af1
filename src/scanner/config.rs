//! Scan configuration
//!
//! Loaded from an optional TOML file, then overridden by environment
//! variables and finally by command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::percentile::validate_percentile;
use crate::core::{ScannerError, ScannerResult};
use crate::data::YahooConfig;

/// Universe scanned when nothing else is configured
pub const DEFAULT_TICKERS: [&str; 8] = ["AAPL", "MSFT", "TSLA", "JPM", "WMT", "PG", "XOM", "PFE"];

/// Percentile cut applied when nothing else is configured
pub const DEFAULT_PERCENTILE: f64 = 20.0;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "low_iv_scan.toml";

/// Configuration for a scan run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Tickers to scan, in order
    #[serde(default = "default_tickers")]
    pub tickers: Vec<String>,

    /// Percentile cut in [0, 100]
    #[serde(default = "default_percentile")]
    pub percentile: f64,

    /// Log level used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Market data provider settings
    #[serde(default)]
    pub provider: YahooConfig,
}

fn default_tickers() -> Vec<String> {
    DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect()
}

fn default_percentile() -> f64 {
    DEFAULT_PERCENTILE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
            percentile: default_percentile(),
            log_level: default_log_level(),
            provider: YahooConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> ScannerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|e| ScannerError::config(format!("{}: {}", path.display(), e)))?;
        config.tickers = normalize_tickers(config.tickers.iter().map(String::as_str));
        Ok(config)
    }

    /// Load `path` if given, else the default file if present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> ScannerResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply environment variable overrides
    pub fn with_env_override(self) -> ScannerResult<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup` (LOW_IV_TICKERS, LOW_IV_PERCENTILE,
    /// LOW_IV_TIMEOUT_SECS, LOW_IV_LOG_LEVEL)
    pub fn apply_overrides<F>(mut self, lookup: F) -> ScannerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(tickers) = lookup("LOW_IV_TICKERS") {
            self.tickers = parse_ticker_list(&tickers);
        }

        if let Some(percentile) = lookup("LOW_IV_PERCENTILE") {
            self.percentile = percentile.trim().parse().map_err(|_| {
                ScannerError::config(format!("LOW_IV_PERCENTILE is not a number: {}", percentile))
            })?;
        }

        if let Some(timeout) = lookup("LOW_IV_TIMEOUT_SECS") {
            self.provider.timeout_secs = timeout.trim().parse().map_err(|_| {
                ScannerError::config(format!("LOW_IV_TIMEOUT_SECS is not an integer: {}", timeout))
            })?;
        }

        if let Some(log_level) = lookup("LOW_IV_LOG_LEVEL") {
            self.log_level = log_level;
        }

        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ScannerResult<()> {
        if self.tickers.is_empty() {
            return Err(ScannerError::config("ticker list is empty"));
        }
        if let Some(bad) = self.tickers.iter().find(|t| t.trim().is_empty()) {
            return Err(ScannerError::config(format!("blank ticker {:?}", bad)));
        }
        validate_percentile(self.percentile)?;
        if self.provider.timeout_secs == 0 {
            return Err(ScannerError::config("provider.timeout_secs must be positive"));
        }
        Ok(())
    }
}

/// Split a comma-separated ticker list
pub fn parse_ticker_list(list: &str) -> Vec<String> {
    normalize_tickers(list.split(','))
}

/// Trim, upper-case and drop empty entries
pub fn normalize_tickers<'a, I>(tickers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    tickers
        .into_iter()
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect()
}
