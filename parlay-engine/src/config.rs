use std::env;
use tracing::warn;

/// Environment-specific defaults used when a raw record leaves a field out
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub default_stake: f64,
    pub default_odds: i32,
    pub default_user_id: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_stake: 0.0,
            default_odds: -110,
            default_user_id: "anonymous".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_stake: parse_var("PARLAY_DEFAULT_STAKE", defaults.default_stake),
            default_odds: parse_var("PARLAY_DEFAULT_ODDS", defaults.default_odds),
            default_user_id: env::var("PARLAY_DEFAULT_USER_ID")
                .unwrap_or(defaults.default_user_id),
        }
    }
}

fn parse_var<T>(key: &str, fallback: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {} '{}', defaulting to {}", key, raw, fallback);
            fallback
        }),
        Err(_) => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_stake, 0.0);
        assert_eq!(config.default_odds, -110);
        assert_eq!(config.default_user_id, "anonymous");
    }

    #[test]
    fn test_parse_var_falls_back_on_garbage() {
        env::set_var("PARLAY_TEST_GARBAGE_ODDS", "minus ten");
        assert_eq!(parse_var("PARLAY_TEST_GARBAGE_ODDS", -110), -110);
        env::set_var("PARLAY_TEST_GOOD_STAKE", " 25.5 ");
        assert_eq!(parse_var("PARLAY_TEST_GOOD_STAKE", 0.0), 25.5);
        assert_eq!(parse_var("PARLAY_TEST_UNSET_VAR", 7u32), 7);
    }
}
