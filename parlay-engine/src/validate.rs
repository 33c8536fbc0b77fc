use crate::error::ValidationFailure;
use crate::normalize::{DefectKind, NormalizedWager};
use crate::odds::is_valid_american;
use crate::types::Wager;

/// Structural gate run after normalization. Collects every violation
/// instead of stopping at the first one.
pub fn validate(normalized: &NormalizedWager) -> Result<(), ValidationFailure> {
    let mut failure = ValidationFailure::default();

    for defect in &normalized.defects {
        let reason = match defect.kind {
            DefectKind::Missing => "missing",
            DefectKind::NotNumeric => "not a number",
            DefectKind::Malformed => "malformed",
        };
        failure.push(defect.field.clone(), reason);
    }

    check_wager(&normalized.wager, &mut failure);

    if failure.is_empty() {
        Ok(())
    } else {
        Err(failure)
    }
}

/// Validate an already canonical wager, e.g. one edited after storage
pub fn validate_wager(wager: &Wager) -> Result<(), ValidationFailure> {
    let mut failure = ValidationFailure::default();
    check_wager(wager, &mut failure);

    if failure.is_empty() {
        Ok(())
    } else {
        Err(failure)
    }
}

fn check_wager(wager: &Wager, failure: &mut ValidationFailure) {
    if wager.legs.is_empty() {
        failure.push("legs", "empty");
    }

    // A defect already covers a non-numeric stake
    let stake_reported = failure.violations.iter().any(|v| v.field == "stake");
    if !stake_reported && !(wager.stake.is_finite() && wager.stake > 0.0) {
        failure.push("stake", "must be a positive number");
    }

    if !(0.0..=100.0).contains(&wager.boost_pct) {
        failure.push("boostPct", "must be between 0 and 100");
    }

    for (i, leg) in wager.legs.iter().enumerate() {
        if leg.prop.trim().is_empty() {
            failure.push(format!("legs[{}].prop", i), "missing");
        }
        if leg.selection.trim().is_empty() {
            failure.push(format!("legs[{}].selection", i), "missing");
        }
        if !leg.line.is_finite() {
            failure.push(format!("legs[{}].line", i), "not a number");
        }

        let odds_field = format!("legs[{}].odds", i);
        let odds_reported = failure.violations.iter().any(|v| v.field == odds_field);
        if !odds_reported && !is_valid_american(leg.odds) {
            failure.push(odds_field, "outside the American odds range");
        }
    }
}
