use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{Violation, WagerError};
use crate::normalize::{fields, normalize_wager};
use crate::types::Wager;
use crate::validate::validate;

/// One rejected record of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFailure {
    /// Position of the record in the input batch
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub violations: Vec<Violation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub accepted: Vec<Wager>,
    pub failures: Vec<RecordFailure>,
}

/// Normalize and validate each record independently. A bad record becomes a
/// failure entry; it never aborts the rest of the batch.
pub fn normalize_batch(raws: &[Value], config: &EngineConfig, clock: &dyn Clock) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (index, raw) in raws.iter().enumerate() {
        let record_id = raw.as_object().and_then(|obj| {
            fields::lookup_str(obj, fields::PARLAY_ID)
                .or_else(|| fields::lookup_str(obj, fields::ID))
        });

        let result = normalize_wager(raw, config, clock).and_then(|normalized| {
            validate(&normalized).map_err(WagerError::ValidationFailed)?;
            Ok(normalized.wager)
        });

        match result {
            Ok(wager) => outcome.accepted.push(wager),
            Err(WagerError::ValidationFailed(failure)) => {
                debug!("Record {} rejected: {}", index, failure);
                outcome.failures.push(RecordFailure {
                    index,
                    record_id,
                    violations: failure.violations,
                });
            }
            Err(e) => {
                warn!("Record {} failed: {}", index, e);
                outcome.failures.push(RecordFailure {
                    index,
                    record_id,
                    violations: vec![Violation::new("record", e.to_string())],
                });
            }
        }
    }

    outcome
}
