use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::normalize::{fields, normalize_wager};
use crate::types::{Wager, WagerKind};

/// Folds flat leg rows into parlay-level wagers in a single pass.
///
/// Rows are grouped by `parlayId ?? id`; a row with neither is its own group.
/// The first row of a group supplies the wager header (owner, timestamps,
/// status, stake, odds, payout, type, boost), every row contributes its leg.
/// Groups come out in first-seen order and legs in input order, so rows can
/// be pushed page by page as they arrive from the store.
pub struct ParlayAggregator<'a> {
    config: &'a EngineConfig,
    clock: &'a dyn Clock,
    // group key -> position in `wagers`
    index: HashMap<String, usize>,
    wagers: Vec<Wager>,
    // whether the first row of each group carried an explicit bet type
    explicit_kind: Vec<bool>,
    rows_seen: usize,
}

impl<'a> ParlayAggregator<'a> {
    pub fn new(config: &'a EngineConfig, clock: &'a dyn Clock) -> Self {
        Self {
            config,
            clock,
            index: HashMap::new(),
            wagers: Vec::new(),
            explicit_kind: Vec::new(),
            rows_seen: 0,
        }
    }

    pub fn push(&mut self, row: &Value) {
        let position = self.rows_seen;
        self.rows_seen += 1;

        let Some(obj) = row.as_object() else {
            warn!("Skipping row {}: not an object", position);
            return;
        };

        let key = fields::lookup_str(obj, fields::PARLAY_ID)
            .or_else(|| fields::lookup_str(obj, fields::ID))
            .unwrap_or_else(|| format!("row-{}", position));

        let normalized = match normalize_wager(row, self.config, self.clock) {
            Ok(n) => n,
            Err(e) => {
                warn!("Skipping row {}: {}", position, e);
                return;
            }
        };
        if !normalized.defects.is_empty() {
            debug!("Row {} ({}) has {} defects", position, key, normalized.defects.len());
        }

        match self.index.get(&key) {
            Some(&pos) => {
                let group = &mut self.wagers[pos];
                let mut legs = normalized.wager.legs;
                // fallback ids restart at 0 for every row; continue the group's numbering
                let offset = group.legs.len();
                for ((i, leg), explicit) in legs.iter_mut().enumerate().zip(explicit_leg_ids(obj)) {
                    if !explicit {
                        leg.id = format!("{}-{}", key, offset + i);
                    }
                }
                group.legs.extend(legs);
            }
            None => {
                let mut wager = normalized.wager;
                wager.id = key.clone();
                self.explicit_kind
                    .push(fields::lookup_str(obj, fields::KIND).is_some());
                self.index.insert(key, self.wagers.len());
                self.wagers.push(wager);
            }
        }
    }

    pub fn extend<'r, I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = &'r Value>,
    {
        for row in rows {
            self.push(row);
        }
    }

    /// Number of wagers grouped so far
    pub fn len(&self) -> usize {
        self.wagers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wagers.is_empty()
    }

    pub fn finish(self) -> Vec<Wager> {
        let mut wagers = self.wagers;
        for (wager, explicit) in wagers.iter_mut().zip(self.explicit_kind) {
            if !explicit {
                wager.kind = WagerKind::from_leg_count(wager.legs.len());
            }
        }
        debug!("Aggregated {} rows into {} wagers", self.rows_seen, wagers.len());
        wagers
    }
}

// Which of the row's legs carried their own id, in the order they were normalized
fn explicit_leg_ids(obj: &fields::RawRecord) -> Vec<bool> {
    match fields::lookup(obj, fields::LEGS) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(|leg| fields::lookup_str(leg, fields::LEG_ID).is_some())
            .collect(),
        _ => vec![fields::lookup_str(obj, fields::LEG_ID).is_some()],
    }
}

/// One-shot form of `ParlayAggregator`
pub fn aggregate<'r, I>(rows: I, config: &EngineConfig, clock: &dyn Clock) -> Vec<Wager>
where
    I: IntoIterator<Item = &'r Value>,
{
    let mut aggregator = ParlayAggregator::new(config, clock);
    aggregator.extend(rows);
    aggregator.finish()
}
