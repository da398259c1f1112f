use std::{env, time::Duration};

use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct RecommendationConfig {
    pub base_url: String,
    pub database: String,
    pub token: String,
    pub timeout: Duration,
}

impl RecommendationConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: require("RECOMMENDATION_BASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            database: require("RECOMMENDATION_DATABASE")?,
            token: require("RECOMMENDATION_TOKEN")?,
            timeout: Duration::from_secs(try_load(
                "RECOMMENDATION_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
        })
    }
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn try_load(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => {
            log::info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}
