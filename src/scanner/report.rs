//! Human-readable scan report

use std::fmt;

use chrono::NaiveDateTime;

use super::{ScanOutcome, ScanResult};

const NO_DATA: &str = "No valid IV data found.";
const NO_STOCKS: &str = "No stocks found with low implied volatility.";

/// Run announcement printed before the scan starts
pub fn announcement(at: NaiveDateTime) -> String {
    format!(
        "Scanning stocks for low implied volatility on {}",
        at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Renders a `ScanOutcome` as a text report
pub struct Report<'a> {
    outcome: &'a ScanOutcome,
}

impl<'a> Report<'a> {
    pub fn new(outcome: &'a ScanOutcome) -> Self {
        Self { outcome }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            ScanOutcome::NoData { skipped } => {
                writeln!(f, "{}", NO_DATA)?;
                writeln!(f, "{}", NO_STOCKS)?;
                write_skipped(f, skipped)
            }
            ScanOutcome::Ranked(result) if result.selected.is_empty() => {
                writeln!(f, "{}", NO_STOCKS)?;
                write_skipped(f, &result.skipped)
            }
            ScanOutcome::Ranked(result) => write_table(f, result),
        }
    }
}

fn write_table(f: &mut fmt::Formatter<'_>, result: &ScanResult) -> fmt::Result {
    writeln!(f)?;
    writeln!(
        f,
        "Stocks with low implied volatility (below {} percentile):",
        ordinal(result.percentile)
    )?;
    writeln!(f, "{:<8} {:>18}", "Ticker", "Implied Volatility")?;
    for obs in &result.selected {
        writeln!(f, "{:<8} {:>18.4}", obs.ticker, obs.implied_volatility)?;
    }
    writeln!(
        f,
        "\nIV threshold: {:.4} ({} of {} tickers selected)",
        result.threshold,
        result.selected.len(),
        result.observed
    )?;
    write_skipped(f, &result.skipped)
}

fn write_skipped(f: &mut fmt::Formatter<'_>, skipped: &[crate::core::SkippedTicker]) -> fmt::Result {
    if skipped.is_empty() {
        return Ok(());
    }
    writeln!(f, "Skipped {} ticker(s):", skipped.len())?;
    for s in skipped {
        writeln!(f, "  {:<8} {}", s.ticker, s.reason)?;
    }
    Ok(())
}

/// "20th", "1st", "22nd", "12.5th"
fn ordinal(percentile: f64) -> String {
    if percentile.fract() != 0.0 {
        return format!("{}th", percentile);
    }

    let n = percentile as u64;
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{IvObservation, SkippedTicker, Unavailability};
    use chrono::NaiveDate;

    fn ranked(selected: Vec<IvObservation>, skipped: Vec<SkippedTicker>) -> ScanOutcome {
        ScanOutcome::Ranked(ScanResult {
            percentile: 20.0,
            threshold: 0.18,
            observed: 5,
            selected,
            skipped,
        })
    }

    #[test]
    fn test_announcement() {
        let at = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap();
        assert_eq!(
            announcement(at),
            "Scanning stocks for low implied volatility on 2024-06-03 09:30:05"
        );
    }

    #[test]
    fn test_table_report() {
        let outcome = ranked(
            vec![IvObservation::new("PG", 0.1234), IvObservation::new("WMT", 0.15)],
            vec![SkippedTicker {
                ticker: "TSLA".into(),
                reason: Unavailability::NoExpirations,
            }],
        );
        let text = Report::new(&outcome).to_string();

        assert!(text.contains("below 20th percentile"));
        assert!(text.contains("PG"));
        assert!(text.contains("0.1234"));
        assert!(text.find("PG").unwrap() < text.find("WMT").unwrap());
        assert!(text.contains("IV threshold: 0.1800 (2 of 5 tickers selected)"));
        assert!(text.contains("TSLA     no option expirations"));
        assert!(!text.contains(NO_STOCKS));
    }

    #[test]
    fn test_no_data_report() {
        let outcome = ScanOutcome::NoData { skipped: vec![] };
        let text = Report::new(&outcome).to_string();
        assert_eq!(text, format!("{}\n{}\n", NO_DATA, NO_STOCKS));
    }

    #[test]
    fn test_empty_selection_report() {
        let text = Report::new(&ranked(vec![], vec![])).to_string();
        assert_eq!(text, format!("{}\n", NO_STOCKS));
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(20.0), "20th");
        assert_eq!(ordinal(1.0), "1st");
        assert_eq!(ordinal(22.0), "22nd");
        assert_eq!(ordinal(33.0), "33rd");
        assert_eq!(ordinal(11.0), "11th");
        assert_eq!(ordinal(12.5), "12.5th");
    }
}
