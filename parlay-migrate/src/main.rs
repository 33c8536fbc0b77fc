mod config;

use config::Config;
use parlay_engine::normalize::merge_duplicates;
use parlay_engine::{normalize_batch, BatchOutcome, PerformanceSummary, SystemClock};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use tracing::{info, warn};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MigrationReport {
    migrated_at: i64,
    input_records: usize,
    merged_records: usize,
    #[serde(flatten)]
    outcome: BatchOutcome,
    summary: PerformanceSummary,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    dotenvy::dotenv().ok();

    info!("🚀 Starting parlay-migrate...");

    let config = Config::from_env()?;
    info!(
        "📋 Configuration loaded (input={}, dedup_props={})",
        config.input_path, config.dedup_props
    );

    let raw = fs::read_to_string(&config.input_path)?;
    let records: Vec<Value> = match serde_json::from_str::<Value>(&raw)? {
        Value::Array(items) => items,
        single @ Value::Object(_) => vec![single],
        other => {
            return Err(format!("expected a JSON array of records, got {}", other).into());
        }
    };
    let input_records = records.len();
    info!("📥 Read {} raw records", input_records);

    let records = if config.dedup_props {
        let merged = merge_duplicates(&records);
        info!("🔗 Merged historical props: {} -> {}", records.len(), merged.len());
        merged
    } else {
        records
    };

    let outcome = normalize_batch(&records, &config.engine, &SystemClock);
    for failure in &outcome.failures {
        let fields: Vec<&str> = failure.violations.iter().map(|v| v.field.as_str()).collect();
        warn!(
            "Record {} ({}) rejected: {}",
            failure.index,
            failure.record_id.as_deref().unwrap_or("no id"),
            fields.join(", ")
        );
    }

    let summary = PerformanceSummary::from_wagers(&outcome.accepted, &config.engine);
    info!(
        "✅ {} accepted, {} rejected, net profit {:.2}",
        outcome.accepted.len(),
        outcome.failures.len(),
        summary.net_profit
    );

    let report = MigrationReport {
        migrated_at: chrono::Utc::now().timestamp_millis(),
        input_records,
        merged_records: records.len(),
        outcome,
        summary,
    };

    fs::write(&config.output_path, serde_json::to_string_pretty(&report)?)?;
    info!("💾 Wrote {}", config.output_path);

    Ok(())
}

