//! Serializable manager configuration.

use serde::{Deserialize, Serialize};
use spinlab_core::domain::WeightBlend;
use std::path::Path;
use thiserror::Error;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tunables for a prediction session.
///
/// Every field has a sensible default, so a TOML file only needs to name
/// what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Master seed for the per-(session, strategy, round) RNG hierarchy.
    pub master_seed: u64,
    /// Capacity of the rolling grade window per strategy.
    pub rolling_capacity: usize,
    /// Lifetime/rolling blend and clamp bounds for the dynamic weight.
    pub blend: WeightBlend,
    /// How many trailing outcomes are snapshotted into each prediction record.
    pub context_len: usize,
    /// Soft wall-clock budget per strategy evaluation; overruns are skipped.
    pub strategy_budget_ms: u64,
    /// Retries per compare-and-swap round trip before giving up.
    pub max_cas_retries: u32,
    /// How many leading strategies the round report lists.
    pub top_strategies: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            master_seed: 0x5eed_0001,
            rolling_capacity: 100,
            blend: WeightBlend::default(),
            context_len: 10,
            strategy_budget_ms: 250,
            max_cas_retries: 5,
            top_strategies: 5,
        }
    }
}

impl ManagerConfig {
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
