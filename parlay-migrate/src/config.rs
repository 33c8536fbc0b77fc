use parlay_engine::EngineConfig;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub input_path: String,
    pub output_path: String,
    pub dedup_props: bool,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let input_path =
            env::var("MIGRATE_INPUT").map_err(|_| "MIGRATE_INPUT must be set".to_string())?;

        Ok(Self {
            input_path,
            output_path: env::var("MIGRATE_OUTPUT").unwrap_or_else(|_| "migrated.json".to_string()),
            dedup_props: env::var("MIGRATE_DEDUP_PROPS").map(|v| v == "true").unwrap_or(false),
            engine: EngineConfig::from_env(),
        })
    }
}
