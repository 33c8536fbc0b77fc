// Identity and merging of historical prop records

use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

use super::fields::{self, RawRecord};
use super::UNKNOWN_PLAYER;

/// Lower-case, underscore-join player, prop, `w{week}` and line, then strip
/// anything outside `[a-z0-9_.]`. The dot survives so 249.5 and 2495 stay distinct.
pub fn dedup_key(player: &str, prop: &str, week: u32, line: f64) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    static INVALID: OnceLock<Regex> = OnceLock::new();

    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static regex"));
    let invalid = INVALID.get_or_init(|| Regex::new(r"[^a-z0-9_.]").expect("static regex"));

    let parts = [
        player.trim().to_lowercase(),
        prop.trim().to_lowercase(),
        format!("w{}", week),
        format!("{}", line),
    ];
    let joined = whitespace.replace_all(&parts.join("_"), "_").to_string();
    invalid.replace_all(&joined, "").to_string()
}

/// Dedup key of a raw record, read through the prioritized field lookup
pub fn record_dedup_key(raw: &RawRecord) -> String {
    let player =
        fields::lookup_str(raw, fields::PLAYER).unwrap_or_else(|| UNKNOWN_PLAYER.to_string());
    let prop = fields::lookup_str(raw, fields::PROP).unwrap_or_default();
    let week = fields::lookup(raw, fields::WEEK)
        .and_then(fields::parse_week)
        .unwrap_or(0);
    let line = fields::lookup_number(raw, fields::LINE).value().unwrap_or(0.0);
    dedup_key(&player, &prop, week, line)
}

/// Merge records describing the same prop. Groups keep first-seen order;
/// within a group later fields win, but null or blank values never erase
/// an earlier one. Keys are rewritten onto canonical spellings so `Line`
/// and `line` count as the same field. Non-object records pass through
/// untouched as their own group.
pub fn merge_duplicates(raws: &[Value]) -> Vec<Value> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Value> = Vec::with_capacity(raws.len());
    let mut duplicates = 0usize;

    for raw in raws {
        let Some(obj) = raw.as_object() else {
            merged.push(raw.clone());
            continue;
        };

        let key = record_dedup_key(obj);
        let incoming = fields::canonicalize_keys(obj);

        match index.get(&key) {
            Some(&pos) => {
                duplicates += 1;
                if let Some(existing) = merged[pos].as_object_mut() {
                    merge_into(existing, incoming);
                }
            }
            None => {
                index.insert(key, merged.len());
                merged.push(Value::Object(incoming));
            }
        }
    }

    debug!(
        "Merged {} records into {} ({} duplicates)",
        raws.len(),
        merged.len(),
        duplicates
    );
    merged
}

fn merge_into(existing: &mut RawRecord, incoming: RawRecord) {
    for (k, v) in incoming {
        let absent = match &v {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        };
        if !absent {
            existing.insert(k, v);
        }
    }
}
