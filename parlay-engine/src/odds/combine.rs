use serde::{Deserialize, Serialize};

use super::{american_to_decimal, decimal_to_american};
use crate::error::WagerError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedOdds {
    pub total_decimal_odds: f64,
    pub american: i32,
}

/// Multiply every leg's decimal price and convert the product back to American.
/// Legs are taken in order; any leg outside the American domain fails the whole set.
pub fn combine_parlay_odds(legs: &[i32]) -> Result<CombinedOdds, WagerError> {
    if legs.is_empty() {
        return Err(WagerError::EmptyLegSet);
    }

    let mut total_decimal_odds = 1.0;
    for &odds in legs {
        total_decimal_odds *= american_to_decimal(odds)?;
    }

    Ok(CombinedOdds {
        total_decimal_odds,
        american: decimal_to_american(total_decimal_odds)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_standard_legs() {
        let combined = combine_parlay_odds(&[-110, -110]).unwrap();
        assert!((combined.total_decimal_odds - 3.644_628).abs() < 1e-5);
        assert_eq!(combined.american, 264);
    }

    #[test]
    fn test_single_leg_identity() {
        for odds in [-110, -250, 100, 120, 450, -1000, 2500] {
            let combined = combine_parlay_odds(&[odds]).unwrap();
            assert!((combined.american - odds).abs() <= 1, "{} -> {}", odds, combined.american);
        }
    }

    #[test]
    fn test_mixed_legs() {
        // 2.5 * 1.5 * 2.0 = 7.5 -> +650
        let combined = combine_parlay_odds(&[150, -200, 100]).unwrap();
        assert_eq!(combined.american, 650);
    }

    #[test]
    fn test_empty_and_invalid() {
        assert_eq!(combine_parlay_odds(&[]), Err(WagerError::EmptyLegSet));
        assert_eq!(
            combine_parlay_odds(&[-110, 40]),
            Err(WagerError::InvalidOdds { value: 40.0 })
        );
    }
}
