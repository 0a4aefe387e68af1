//! ATM implied volatility per ticker
//!
//! Takes the front expiry, picks the call and put nearest to spot and
//! averages their IVs. Every failure is contained to the ticker.

use crate::core::{IvObservation, SkippedTicker, TickerOutcome, Unavailability};
use crate::data::MarketDataProvider;

/// Estimate the ATM IV for `ticker`. Never fails the caller.
pub fn fetch_implied_volatility<P>(provider: &P, ticker: &str) -> TickerOutcome
where
    P: MarketDataProvider + ?Sized,
{
    match atm_implied_volatility(provider, ticker) {
        Ok(iv) => {
            tracing::debug!("{}: ATM IV {:.4}", ticker, iv);
            TickerOutcome::Available(IvObservation::new(ticker, iv))
        }
        Err(reason) => {
            tracing::warn!("Error fetching IV for {}: {}", ticker, reason);
            TickerOutcome::Unavailable(SkippedTicker {
                ticker: ticker.to_string(),
                reason,
            })
        }
    }
}

fn atm_implied_volatility<P>(provider: &P, ticker: &str) -> Result<f64, Unavailability>
where
    P: MarketDataProvider + ?Sized,
{
    let expirations = provider.list_expirations(ticker)?;
    let expiry = *expirations.first().ok_or(Unavailability::NoExpirations)?;

    let chain = provider.get_chain(ticker, expiry)?;
    if !chain.has_both_sides() {
        return Err(Unavailability::EmptyChain);
    }

    let spot = provider
        .latest_price(ticker)?
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or(Unavailability::MissingPrice)?;

    let call = chain.atm_call(spot).ok_or(Unavailability::EmptyChain)?;
    let put = chain.atm_put(spot).ok_or(Unavailability::EmptyChain)?;
    tracing::debug!(
        "{} {}: spot {:.2}, call K={} iv={:.4}, put K={} iv={:.4}",
        ticker,
        expiry,
        spot,
        call.strike,
        call.implied_volatility,
        put.strike,
        put.implied_volatility
    );

    let iv = (call.implied_volatility + put.implied_volatility) / 2.0;
    if !iv.is_finite() || iv < 0.0 {
        return Err(Unavailability::MalformedQuote);
    }

    Ok(iv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StaticProvider;

    fn iv_of(outcome: &TickerOutcome) -> f64 {
        outcome.observation().unwrap().implied_volatility
    }

    fn reason_of(outcome: TickerOutcome) -> Unavailability {
        match outcome {
            TickerOutcome::Unavailable(skipped) => skipped.reason,
            TickerOutcome::Available(obs) => panic!("expected unavailable, got {:?}", obs),
        }
    }

    #[test]
    fn test_averages_nearest_call_and_put() {
        let provider = StaticProvider::new().with_ticker(
            "AAPL",
            101.0,
            &[(110.0, 0.40), (90.0, 0.50), (100.0, 0.20)],
            &[(95.0, 0.60), (105.0, 0.35), (100.0, 0.30)],
        );

        let outcome = fetch_implied_volatility(&provider, "AAPL");
        assert_eq!(outcome.ticker(), "AAPL");
        assert!((iv_of(&outcome) - 0.25).abs() < 1e-12);
        assert_eq!(provider.request_count(), 3);
    }

    #[test]
    fn test_call_and_put_selected_independently() {
        // Nearest call is 100, nearest put is 102.5
        let provider = StaticProvider::new().with_ticker(
            "MSFT",
            102.0,
            &[(100.0, 0.20), (105.0, 0.30)],
            &[(102.5, 0.40), (110.0, 0.90)],
        );

        let outcome = fetch_implied_volatility(&provider, "MSFT");
        assert!((iv_of(&outcome) - 0.30).abs() < 1e-12);
    }

    #[test]
    fn test_no_expirations() {
        let provider = StaticProvider::new().with_no_expirations("JPM");
        let outcome = fetch_implied_volatility(&provider, "JPM");
        assert_eq!(reason_of(outcome), Unavailability::NoExpirations);
    }

    #[test]
    fn test_one_sided_chain() {
        let provider = StaticProvider::new().with_ticker("WMT", 60.0, &[(60.0, 0.2)], &[]);
        let outcome = fetch_implied_volatility(&provider, "WMT");
        assert_eq!(reason_of(outcome), Unavailability::EmptyChain);
        // Price is never requested for an empty chain
        assert_eq!(provider.request_count(), 2);
    }

    #[test]
    fn test_missing_price() {
        let provider =
            StaticProvider::new().with_missing_price("PFE", &[(30.0, 0.25)], &[(30.0, 0.27)]);
        let outcome = fetch_implied_volatility(&provider, "PFE");
        assert_eq!(reason_of(outcome), Unavailability::MissingPrice);
    }

    #[test]
    fn test_non_positive_price_is_missing() {
        let provider = StaticProvider::new().with_ticker("XOM", 0.0, &[(100.0, 0.2)], &[(100.0, 0.2)]);
        let outcome = fetch_implied_volatility(&provider, "XOM");
        assert_eq!(reason_of(outcome), Unavailability::MissingPrice);
    }

    #[test]
    fn test_provider_error_is_contained() {
        let provider = StaticProvider::new().with_failure("TSLA", "connection refused");
        let outcome = fetch_implied_volatility(&provider, "TSLA");

        match reason_of(outcome) {
            Unavailability::Provider(msg) => assert!(msg.contains("connection refused")),
            other => panic!("unexpected reason {:?}", other),
        }
    }

    #[test]
    fn test_nan_iv_is_malformed() {
        let provider =
            StaticProvider::new().with_ticker("PG", 150.0, &[(150.0, f64::NAN)], &[(150.0, 0.2)]);
        let outcome = fetch_implied_volatility(&provider, "PG");
        assert_eq!(reason_of(outcome), Unavailability::MalformedQuote);
    }
}
