//! Engine settings loaded from the environment.
//!
//! Supported environment variables:
//! - `TAILS_RNG_SEED`: seed for a reproducible random source (unset = system randomness)
//! - `TAILS_RANDOM_POOL`: `true`/`false`, whether `tick` rolls the random event pool (default true)
//! - `TAILS_CLUSTERING`: `true`/`false`, overrides `clusteringEnabled` from the frequency config
//! - `TAILS_FREQUENCY_CONFIG`: path to a JSON `FrequencyConfig` (unset = defaults)

use std::path::{Path, PathBuf};

use crate::frequency::FrequencyConfig;

pub const ENV_RNG_SEED: &str = "TAILS_RNG_SEED";
pub const ENV_RANDOM_POOL: &str = "TAILS_RANDOM_POOL";
pub const ENV_CLUSTERING: &str = "TAILS_CLUSTERING";
pub const ENV_FREQUENCY_CONFIG: &str = "TAILS_FREQUENCY_CONFIG";

/// Errors that can occur while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{var} has invalid value '{value}': {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("Failed to read frequency config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse frequency config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime settings for an `EventEngine`
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub rng_seed: Option<u64>,
    pub random_pool_enabled: bool,
    pub frequency: FrequencyConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            rng_seed: None,
            random_pool_enabled: true,
            frequency: FrequencyConfig::default(),
        }
    }
}

impl EngineSettings {
    /// Load settings from process environment variables.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(path) = non_empty(lookup(ENV_FREQUENCY_CONFIG)) {
            settings.frequency = load_frequency_config(Path::new(&path))?;
            tracing::info!(path = %path, "Loaded frequency config");
        }

        if let Some(value) = non_empty(lookup(ENV_RNG_SEED)) {
            let seed = value
                .parse::<u64>()
                .map_err(|e| SettingsError::InvalidValue {
                    var: ENV_RNG_SEED,
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
            settings.rng_seed = Some(seed);
        }

        if let Some(value) = non_empty(lookup(ENV_RANDOM_POOL)) {
            settings.random_pool_enabled = parse_flag(ENV_RANDOM_POOL, &value)?;
        }

        if let Some(value) = non_empty(lookup(ENV_CLUSTERING)) {
            settings.frequency.clustering_enabled = parse_flag(ENV_CLUSTERING, &value)?;
        }

        Ok(settings)
    }
}

/// Read and parse a JSON frequency config. Missing fields keep their defaults.
pub fn load_frequency_config(path: &Path) -> Result<FrequencyConfig, SettingsError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SettingsError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, SettingsError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SettingsError::InvalidValue {
            var,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
