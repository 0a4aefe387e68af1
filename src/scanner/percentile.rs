//! Linear-interpolation percentile
//!
//! For sorted values `v` and percentile `p`, the fractional rank is
//! `r = p/100 * (n-1)` and the result is `v[floor(r)] + (v[ceil(r)] - v[floor(r)]) * frac(r)`.

use crate::core::{ScannerError, ScannerResult};

/// Fail fast on a percentile outside [0, 100]
pub fn validate_percentile(percentile: f64) -> ScannerResult<()> {
    if percentile.is_finite() && (0.0..=100.0).contains(&percentile) {
        Ok(())
    } else {
        Err(ScannerError::invalid_input(format!(
            "percentile must be within [0, 100], got {}",
            percentile
        )))
    }
}

/// Percentile of `values` using linear interpolation between order statistics
pub fn percentile(values: &[f64], percentile: f64) -> ScannerResult<f64> {
    validate_percentile(percentile)?;

    if values.is_empty() {
        return Err(ScannerError::invalid_input("percentile of an empty sample"));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ScannerError::invalid_input("sample contains non-finite values"));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = percentile / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
