//! Canonicalization of raw wager and prop records.

pub mod dedup;
pub mod fields;

pub use dedup::{dedup_key, merge_duplicates, record_dedup_key};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use self::fields::{Numeric, RawRecord};
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{ValidationFailure, WagerError};
use crate::odds::{combine_parlay_odds, is_valid_american};
use crate::types::{BetStatus, Leg, Wager, WagerKind};

pub const UNKNOWN_PLAYER: &str = "Unknown Player";
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectKind {
    /// Required field absent
    Missing,
    /// Present but not readable as a number
    NotNumeric,
    /// Present but of the wrong shape (e.g. a leg that is not an object)
    Malformed,
}

/// Something the normalizer had to paper over with a default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefect {
    pub field: String,
    pub kind: DefectKind,
}

impl FieldDefect {
    fn new(field: impl Into<String>, kind: DefectKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

/// Canonical wager plus the defects seen while mapping it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWager {
    pub wager: Wager,
    pub defects: Vec<FieldDefect>,
}

/// Map a raw record of any vintage onto the canonical `Wager`.
///
/// Every field of the result is populated. Missing `createdAt` falls back to
/// the game date and then to `clock` ("now" at call time), missing
/// `updatedAt` falls back to `clock`. A record with no `legs` array is a flat
/// legacy record and becomes a single-leg wager built from its top-level
/// fields. The input is never modified.
pub fn normalize_wager(
    raw: &Value,
    config: &EngineConfig,
    clock: &dyn Clock,
) -> Result<NormalizedWager, WagerError> {
    let obj = raw.as_object().ok_or_else(|| {
        WagerError::ValidationFailed(ValidationFailure::single("record", "not an object"))
    })?;

    let now = clock.now_millis();
    let mut defects = Vec::new();

    let base_id = fields::lookup_str(obj, fields::PARLAY_ID)
        .or_else(|| fields::lookup_str(obj, fields::ID));

    let (legs, flat) = match fields::lookup(obj, fields::LEGS) {
        Some(Value::Array(items)) => {
            let mut legs = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let prefix = format!("legs[{}]", i);
                match item.as_object() {
                    Some(leg_raw) => {
                        let fallback = fallback_leg_id(base_id.as_deref(), i, leg_raw);
                        legs.push(map_leg(leg_raw, obj, &prefix, fallback, config, &mut defects));
                    }
                    None => defects.push(FieldDefect::new(prefix, DefectKind::Malformed)),
                }
            }
            (legs, false)
        }
        _ => {
            let fallback = fallback_leg_id(base_id.as_deref(), 0, obj);
            let leg = map_leg(obj, obj, "legs[0]", fallback, config, &mut defects);
            (vec![leg], true)
        }
    };

    let id = match base_id.or_else(|| legs.first().map(|l| l.id.clone())) {
        Some(id) => id,
        None => {
            let id = dedup::record_dedup_key(obj);
            debug!("Record without id or legs, using dedup key {}", id);
            id
        }
    };

    let odds = match fields::lookup_number(obj, fields::TOTAL_ODDS) {
        Numeric::Value(v) => round_odds(v),
        other => {
            if other == Numeric::NotNumeric && !flat {
                defects.push(FieldDefect::new("odds", DefectKind::NotNumeric));
            }
            derive_odds(&legs, config)
        }
    };

    let stake = match fields::lookup_number(obj, fields::STAKE) {
        Numeric::Value(v) => v,
        Numeric::Missing => config.default_stake,
        Numeric::NotNumeric => {
            defects.push(FieldDefect::new("stake", DefectKind::NotNumeric));
            config.default_stake
        }
    };

    let (boost, boost_pct) = read_boost(obj);

    let wager = Wager {
        id,
        user_id: fields::lookup_str(obj, fields::USER_ID)
            .unwrap_or_else(|| config.default_user_id.clone()),
        created_at: fields::lookup_timestamp(obj, fields::CREATED_AT)
            .or_else(|| fields::lookup_timestamp(obj, fields::GAME_DATE))
            .unwrap_or(now),
        updated_at: fields::lookup_timestamp(obj, fields::UPDATED_AT).unwrap_or(now),
        status: read_status(obj, None),
        stake,
        odds,
        payout: fields::lookup_number(obj, fields::PAYOUT).value().unwrap_or(0.0),
        kind: WagerKind::parse(fields::lookup_str(obj, fields::KIND).as_deref(), legs.len()),
        boost,
        boost_pct,
        cash_out: fields::lookup_number(obj, fields::CASH_OUT).value(),
        legs,
    };

    Ok(NormalizedWager { wager, defects })
}

/// Map one leg. `parent` supplies status, correlation key and game date
/// when the leg itself leaves them out; for flat records leg and parent
/// are the same map.
pub(crate) fn map_leg(
    leg: &RawRecord,
    parent: &RawRecord,
    prefix: &str,
    fallback_id: String,
    config: &EngineConfig,
    defects: &mut Vec<FieldDefect>,
) -> Leg {
    let line = match fields::lookup_number(leg, fields::LINE) {
        Numeric::Value(v) => v,
        Numeric::Missing => {
            defects.push(FieldDefect::new(format!("{}.line", prefix), DefectKind::Missing));
            0.0
        }
        Numeric::NotNumeric => {
            defects.push(FieldDefect::new(format!("{}.line", prefix), DefectKind::NotNumeric));
            0.0
        }
    };

    // Absent odds take the configured house price; garbage odds are a defect
    let odds = match fields::lookup_number(leg, fields::ODDS) {
        Numeric::Value(v) => round_odds(v),
        Numeric::Missing => config.default_odds,
        Numeric::NotNumeric => {
            defects.push(FieldDefect::new(format!("{}.odds", prefix), DefectKind::NotNumeric));
            config.default_odds
        }
    };

    let game_date = fields::lookup(leg, fields::GAME_DATE)
        .or_else(|| fields::lookup(parent, fields::GAME_DATE))
        .and_then(|v| match v {
            Value::String(s) => Some(s.trim().to_string()),
            other => fields::parse_timestamp(other).and_then(fields::format_date),
        })
        .unwrap_or_default();

    Leg {
        id: fields::lookup_str(leg, fields::LEG_ID).unwrap_or(fallback_id),
        parlay_id: fields::lookup_str(leg, fields::PARLAY_ID)
            .or_else(|| fields::lookup_str(parent, fields::PARLAY_ID)),
        player: fields::lookup_str(leg, fields::PLAYER)
            .unwrap_or_else(|| UNKNOWN_PLAYER.to_string()),
        prop: fields::lookup_str(leg, fields::PROP).unwrap_or_default(),
        line,
        selection: fields::lookup_str(leg, fields::SELECTION).unwrap_or_default(),
        odds,
        status: read_status(leg, Some(parent)),
        team: fields::lookup_str(leg, fields::TEAM).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        matchup: fields::lookup_str(leg, fields::MATCHUP)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        week: fields::lookup(leg, fields::WEEK)
            .and_then(fields::parse_week)
            .unwrap_or(0),
        game_date,
    }
}

fn fallback_leg_id(base_id: Option<&str>, index: usize, leg: &RawRecord) -> String {
    match base_id {
        Some(base) => format!("{}-{}", base, index),
        None => {
            let key = dedup::record_dedup_key(leg);
            if index == 0 {
                key
            } else {
                format!("{}-{}", key, index)
            }
        }
    }
}

fn read_status(raw: &RawRecord, parent: Option<&RawRecord>) -> BetStatus {
    fields::lookup_str(raw, fields::STATUS)
        .or_else(|| parent.and_then(|p| fields::lookup_str(p, fields::STATUS)))
        .map(|s| BetStatus::parse(&s))
        .unwrap_or_default()
}

/// Legacy records carry either a boolean flag plus a percentage, or a bare
/// number in `boost` meaning the percentage. An explicit `false` flag wins.
fn read_boost(raw: &RawRecord) -> (bool, f64) {
    let flag = fields::lookup_bool(raw, fields::BOOST);
    let pct = fields::lookup_number(raw, fields::BOOST_PCT)
        .value()
        .or_else(|| match fields::lookup(raw, fields::BOOST) {
            Some(v) if v.is_number() => fields::as_number(v),
            _ => None,
        })
        .unwrap_or(0.0);

    (flag.unwrap_or(pct > 0.0), pct)
}

/// Whole-number American odds; fractional inputs round half away from zero
fn round_odds(v: f64) -> i32 {
    v.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

/// Wager odds when the record has none: combined leg prices, or the configured default
fn derive_odds(legs: &[Leg], config: &EngineConfig) -> i32 {
    if legs.is_empty() || !legs.iter().all(|l| is_valid_american(l.odds)) {
        return config.default_odds;
    }
    let prices: Vec<i32> = legs.iter().map(|l| l.odds).collect();
    combine_parlay_odds(&prices)
        .map(|c| c.american)
        .unwrap_or(config.default_odds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use serde_json::json;

    const NOW: i64 = 1_730_000_000_000;

    fn normalize(raw: Value) -> NormalizedWager {
        normalize_wager(&raw, &EngineConfig::default(), &FixedClock(NOW)).unwrap()
    }

    #[test]
    fn test_flat_legacy_record_becomes_single_leg() {
        let n = normalize(json!({
            "id": "abc",
            "uid": "user-1",
            "Player": "Josh Allen",
            "Prop": "Passing Yards",
            "Line": 249.5,
            "selection": "Over",
            "odds": -115,
            "Week": 7,
            "result": "WIN",
            "gameDate": "2024-10-20",
            "amount": 10
        }));
        let w = &n.wager;

        assert!(n.defects.is_empty(), "{:?}", n.defects);
        assert_eq!(w.id, "abc");
        assert_eq!(w.user_id, "user-1");
        assert_eq!(w.status, BetStatus::Won);
        assert_eq!(w.created_at, 1_729_382_400_000);
        assert_eq!(w.updated_at, NOW);
        assert_eq!(w.stake, 10.0);
        assert_eq!(w.odds, -115);
        assert_eq!(w.kind, WagerKind::Straight);
        assert_eq!(w.legs.len(), 1);

        let leg = &w.legs[0];
        assert_eq!(leg.id, "abc");
        assert_eq!(leg.player, "Josh Allen");
        assert_eq!(leg.prop, "Passing Yards");
        assert_eq!(leg.line, 249.5);
        assert_eq!(leg.week, 7);
        assert_eq!(leg.status, BetStatus::Won);
        assert_eq!(leg.game_date, "2024-10-20");
        assert_eq!(leg.team, NOT_AVAILABLE);
    }

    #[test]
    fn test_defaults_fill_every_field() {
        let n = normalize(json!({
            "legs": [{ "prop": "Receptions", "line": 4.5, "selection": "Under" }]
        }));
        let w = &n.wager;

        assert_eq!(w.user_id, "anonymous");
        assert_eq!(w.created_at, NOW);
        assert_eq!(w.stake, 0.0);
        assert_eq!(w.payout, 0.0);
        assert_eq!(w.status, BetStatus::Pending);
        assert!(!w.boost);
        assert_eq!(w.cash_out, None);

        let leg = &w.legs[0];
        assert_eq!(leg.player, UNKNOWN_PLAYER);
        assert_eq!(leg.odds, -110);
        assert_eq!(leg.matchup, NOT_AVAILABLE);
        assert_eq!(leg.week, 0);
        assert_eq!(leg.game_date, "");
        // No ids anywhere: wager and leg share the leg's dedup key
        assert_eq!(leg.id, "unknown_player_receptions_w0_4.5");
        assert_eq!(w.id, leg.id);
    }

    #[test]
    fn test_unrepresentable_timestamps_fall_back_to_clock() {
        let n = normalize(json!({
            "createdAt": i64::MIN,
            "updatedAt": { "seconds": i64::MAX },
            "gameDate": -1e300,
            "line": 1.5
        }));
        assert_eq!(n.wager.created_at, NOW);
        assert_eq!(n.wager.updated_at, NOW);
        assert_eq!(n.wager.legs[0].game_date, "");
    }

    #[test]
    fn test_parlay_record_combines_leg_odds() {
        let n = normalize(json!({
            "id": "w1",
            "stake": "25",
            "legs": [
                { "player": "A", "prop": "Rush Yards", "line": 60.5, "selection": "Over",
                  "odds": -110 },
                { "player": "B", "prop": "Rec Yards", "line": 45.5, "selection": "Under",
                  "odds": -110 }
            ]
        }));
        let w = &n.wager;

        assert_eq!(w.kind, WagerKind::Parlay);
        assert_eq!(w.odds, 264);
        assert_eq!(w.stake, 25.0);
        assert_eq!(w.legs[0].id, "w1-0");
        assert_eq!(w.legs[1].id, "w1-1");
    }

    #[test]
    fn test_correlation_key_is_wager_id() {
        let n = normalize(json!({ "id": "leg-9", "parlayId": "PL-1", "line": 1.5, "prop": "TDs" }));
        assert_eq!(n.wager.id, "PL-1");
        assert_eq!(n.wager.legs[0].id, "leg-9");
        assert_eq!(n.wager.legs[0].parlay_id.as_deref(), Some("PL-1"));
    }

    #[test]
    fn test_defects_are_reported() {
        let n = normalize(json!({
            "stake": "lots",
            "legs": [
                { "prop": "Yards", "line": "two hundred", "odds": "minus ten" },
                "not a leg",
                { "prop": "Yards" }
            ]
        }));

        let got: Vec<(&str, DefectKind)> =
            n.defects.iter().map(|d| (d.field.as_str(), d.kind)).collect();
        assert_eq!(
            got,
            vec![
                ("legs[0].line", DefectKind::NotNumeric),
                ("legs[0].odds", DefectKind::NotNumeric),
                ("legs[1]", DefectKind::Malformed),
                ("legs[2].line", DefectKind::Missing),
                ("stake", DefectKind::NotNumeric),
            ]
        );
        assert_eq!(n.wager.legs.len(), 2);
    }

    #[test]
    fn test_boost_shapes() {
        let n = normalize(json!({ "boost": true, "boostPercentage": 25, "line": 1.5 }));
        assert!(n.wager.boost);
        assert_eq!(n.wager.boost_pct, 25.0);

        let n = normalize(json!({ "boost": 30, "line": 1.5 }));
        assert!(n.wager.boost);
        assert_eq!(n.wager.boost_pct, 30.0);

        let n = normalize(json!({ "boost": false, "boostPct": 30, "line": 1.5 }));
        assert!(!n.wager.boost);
        assert_eq!(n.wager.effective_boost_pct(), 0.0);
    }

    #[test]
    fn test_non_object_is_rejected_as_data() {
        let err = normalize_wager(&json!([1, 2]), &EngineConfig::default(), &FixedClock(NOW))
            .unwrap_err();
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_deterministic_and_input_untouched() {
        let raw = json!({ "Player": "A", "Line": "3.5", "legs": null });
        let before = raw.clone();
        let a = normalize(raw.clone());
        let b = normalize(raw.clone());
        assert_eq!(a, b);
        assert_eq!(raw, before);
    }
}
