// Odds conversion between American, decimal and implied probability

mod combine;

pub use combine::{combine_parlay_odds, CombinedOdds};

use crate::error::WagerError;

/// Smallest magnitude a real American price can have
pub const MIN_AMERICAN_MAGNITUDE: i32 = 100;

pub fn is_valid_american(american: i32) -> bool {
    american >= MIN_AMERICAN_MAGNITUDE || american <= -MIN_AMERICAN_MAGNITUDE
}

fn check_american(american: i32) -> Result<(), WagerError> {
    if is_valid_american(american) {
        Ok(())
    } else {
        Err(WagerError::InvalidOdds { value: american as f64 })
    }
}

/// +150 -> 2.5, -110 -> 1.909...
pub fn american_to_decimal(american: i32) -> Result<f64, WagerError> {
    check_american(american)?;
    let a = american as f64;
    if american >= MIN_AMERICAN_MAGNITUDE {
        Ok(a / 100.0 + 1.0)
    } else {
        Ok(100.0 / a.abs() + 1.0)
    }
}

/// Implied win probability, always strictly between 0 and 1
pub fn american_to_probability(american: i32) -> Result<f64, WagerError> {
    check_american(american)?;
    let a = american as f64;
    if american > 0 {
        Ok(100.0 / (a + 100.0))
    } else {
        let abs = a.abs();
        Ok(abs / (abs + 100.0))
    }
}

/// Inverse of `american_to_decimal`.
/// Rounds half away from zero, so 1.995 -> -100.5 -> -101.
pub fn decimal_to_american(decimal: f64) -> Result<i32, WagerError> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return Err(WagerError::InvalidOdds { value: decimal });
    }

    let american = if decimal >= 2.0 {
        ((decimal - 1.0) * 100.0).round()
    } else {
        (-100.0 / (decimal - 1.0)).round()
    };

    if american > i32::MAX as f64 || american < i32::MIN as f64 {
        return Err(WagerError::InvalidOdds { value: decimal });
    }
    Ok(american as i32)
}

/// User-facing form: "+150", "-110"
pub fn format_american(american: i32) -> String {
    if american > 0 {
        format!("+{}", american)
    } else {
        american.to_string()
    }
}
