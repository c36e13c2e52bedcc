//! Configuration management for VoteChain

use crate::ledger::BATCH_THRESHOLD;
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Buffered votes needed to trigger a seal.
    #[serde(default = "default_batch_threshold")]
    pub batch_threshold: usize,
    /// Run full chain validation when rehydrating from the store. Off by
    /// default: loaded blocks are trusted.
    #[serde(default)]
    pub validate_on_load: bool,
    /// Optional ceiling on the proof-of-work search. Unset means the search
    /// scans until it finds a solution.
    #[serde(default)]
    pub max_pow_attempts: Option<u64>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            batch_threshold: BATCH_THRESHOLD,
            validate_on_load: false,
            max_pow_attempts: None,
        }
    }
}

fn default_batch_threshold() -> usize {
    BATCH_THRESHOLD
}

fn default_db_path() -> String {
    "./votechain.db".to_string()
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = fs::read_to_string("config.toml").unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        // Provide sane defaults when config.toml is absent
        Config {
            database: DatabaseConfig {
                path: default_db_path(),
            },
            ledger: LedgerConfig::default(),
        }
    } else {
        toml::from_str(&config_str)?
    };

    // Validate critical values
    if config.database.path.is_empty() {
        return Err("database.path must be set in config.toml".into());
    }

    if config.ledger.batch_threshold == 0 {
        return Err("ledger.batch_threshold must be at least 1".into());
    }

    Ok(config)
}
