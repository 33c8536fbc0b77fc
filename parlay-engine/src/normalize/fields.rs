//! Prioritized lookup of canonical fields across legacy key spellings.
//!
//! Every consumer reads raw records through these helpers so that
//! `player`/`Player`, `uid`/`userId`, `result`/`status` and friends resolve
//! in one place.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

pub type RawRecord = Map<String, Value>;

// Wager-level fields
pub const ID: &[&str] = &["id", "_id", "betId", "bet_id"];
pub const PARLAY_ID: &[&str] = &["parlayId", "parlay_id", "correlationId", "groupId"];
pub const USER_ID: &[&str] = &["userId", "uid", "user_id", "owner"];
pub const STATUS: &[&str] = &["status", "result", "outcome"];
pub const CREATED_AT: &[&str] = &["createdAt", "created_at", "timestamp", "placedAt"];
pub const UPDATED_AT: &[&str] = &["updatedAt", "updated_at"];
pub const STAKE: &[&str] = &["stake", "amount", "betAmount", "wager"];
pub const TOTAL_ODDS: &[&str] = &["totalOdds", "parlayOdds", "odds"];
pub const PAYOUT: &[&str] = &["payout", "potentialPayout"];
pub const KIND: &[&str] = &["type", "betType", "bet_type"];
pub const BOOST: &[&str] = &["boost", "isBoosted", "boosted"];
pub const BOOST_PCT: &[&str] = &["boostPct", "boostPercentage", "boost_pct", "boostPercent"];
pub const CASH_OUT: &[&str] = &["cashOut", "cashOutAmount", "cash_out", "cashedOutAmount"];
pub const LEGS: &[&str] = &["legs", "props", "selections"];

// Leg-level fields
pub const LEG_ID: &[&str] = &["id", "legId", "propId", "_id"];
pub const PLAYER: &[&str] = &["player", "playerName", "player_name"];
pub const PROP: &[&str] = &["prop", "propType", "prop_type", "market", "statType"];
pub const LINE: &[&str] = &["line", "propLine", "prop_line"];
pub const SELECTION: &[&str] = &["selection", "pick", "side", "overUnder"];
pub const ODDS: &[&str] = &["odds", "americanOdds", "price"];
pub const TEAM: &[&str] = &["team"];
pub const MATCHUP: &[&str] = &["matchup", "game", "opponent"];
pub const WEEK: &[&str] = &["week"];
pub const GAME_DATE: &[&str] = &["gameDate", "game_date", "date"];

/// Alias groups used when rewriting a record onto canonical keys.
/// The first spelling of each group is the canonical one.
pub const CANONICAL_GROUPS: &[&[&str]] = &[
    ID, PARLAY_ID, USER_ID, STATUS, CREATED_AT, UPDATED_AT, STAKE, PAYOUT, KIND, BOOST,
    BOOST_PCT, CASH_OUT, LEGS, PLAYER, PROP, LINE, SELECTION, ODDS, TEAM, MATCHUP, WEEK,
    GAME_DATE,
];

/// Result of reading a numeric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Missing,
    NotNumeric,
    Value(f64),
}

impl Numeric {
    pub fn value(self) -> Option<f64> {
        match self {
            Numeric::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// First non-null value under any of `keys`, exact spelling first and then
/// a case-insensitive pass in the same priority order.
pub fn lookup<'a>(raw: &'a RawRecord, keys: &[&str]) -> Option<&'a Value> {
    for key in keys {
        if let Some(v) = raw.get(*key) {
            if !v.is_null() {
                return Some(v);
            }
        }
    }

    for key in keys {
        let found = raw
            .iter()
            .find(|(k, v)| !v.is_null() && k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v);
        if found.is_some() {
            return found;
        }
    }

    None
}

/// Non-blank text. Numbers are rendered so numeric ids survive.
pub fn lookup_str(raw: &RawRecord, keys: &[&str]) -> Option<String> {
    match lookup(raw, keys)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn lookup_number(raw: &RawRecord, keys: &[&str]) -> Numeric {
    match lookup(raw, keys) {
        None => Numeric::Missing,
        Some(Value::String(s)) if s.trim().is_empty() => Numeric::Missing,
        Some(v) => as_number(v).map(Numeric::Value).unwrap_or(Numeric::NotNumeric),
    }
}

pub fn lookup_bool(raw: &RawRecord, keys: &[&str]) -> Option<bool> {
    match lookup(raw, keys)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn lookup_timestamp(raw: &RawRecord, keys: &[&str]) -> Option<i64> {
    lookup(raw, keys).and_then(parse_timestamp)
}

/// JSON numbers and numeric strings ("249.5", "+150"). Non-finite values are rejected.
pub fn as_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Week numbers arrive as 7, "7", "Week 7" or "W7"
pub fn parse_week(v: &Value) -> Option<u32> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();

    match v {
        Value::Number(n) => n.as_u64().and_then(|w| u32::try_from(w).ok()).or_else(|| {
            n.as_f64()
                .filter(|w| *w >= 0.0 && w.fract() == 0.0 && *w <= u32::MAX as f64)
                .map(|w| w as u32)
        }),
        Value::String(s) => {
            let re = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("static regex"));
            re.find(s).and_then(|m| m.as_str().parse().ok())
        }
        _ => None,
    }
}

/// Epoch milliseconds from any timestamp shape found in legacy stores:
/// epoch ms or seconds (below 10^11), RFC 3339, "YYYY-MM-DD HH:MM:SS",
/// "YYYY-MM-DD" (midnight UTC) and `{seconds, nanoseconds}` objects.
pub fn parse_timestamp(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .and_then(epoch_to_millis),
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Object(obj) => {
            let seconds = lookup(obj, &["seconds", "_seconds"]).and_then(|s| s.as_i64())?;
            let nanos = lookup(obj, &["nanoseconds", "_nanoseconds"])
                .and_then(|n| n.as_i64())
                .unwrap_or(0);
            seconds.checked_mul(1000)?.checked_add(nanos / 1_000_000)
        }
        _ => None,
    }
}

/// None when the value cannot be represented, so callers fall back to the clock
fn epoch_to_millis(raw: i64) -> Option<i64> {
    if raw.checked_abs()? < 100_000_000_000 {
        raw.checked_mul(1000)
    } else {
        Some(raw)
    }
}

fn parse_timestamp_str(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        return epoch_to_millis(n);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// "YYYY-MM-DD" for a timestamp in epoch milliseconds
pub fn format_date(millis: i64) -> Option<String> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// Canonical spelling for a known alias, matched case-insensitively
pub fn canonical_name(key: &str) -> Option<&'static str> {
    CANONICAL_GROUPS
        .iter()
        .find(|group| group.iter().any(|alias| alias.eq_ignore_ascii_case(key)))
        .map(|group| group[0])
}

/// Rewrite a record onto canonical keys using the same priority as `lookup`.
/// Unknown keys are kept verbatim.
pub fn canonicalize_keys(raw: &RawRecord) -> RawRecord {
    let mut out = RawRecord::new();

    for group in CANONICAL_GROUPS {
        if out.contains_key(group[0]) {
            continue;
        }
        if let Some(v) = lookup(raw, group) {
            out.insert(group[0].to_string(), v.clone());
        }
    }

    for (k, v) in raw {
        if canonical_name(k).is_none() {
            out.insert(k.clone(), v.clone());
        }
    }

    out
}
