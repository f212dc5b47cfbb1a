//! Store configuration: timer periods and the save slot key.
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::constants::{SAVE_KEY, SAVE_PERIOD_MS, TICK_PERIOD_MS};

/// Errors raised when store configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be at least 1 ms")]
    ZeroPeriod { field: &'static str },
    #[error("save key must not be empty")]
    EmptySaveKey,
    #[error("invalid store config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Lifecycle settings for a [`crate::store::GameStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Passive-income period.
    #[serde(default = "StoreConfig::default_tick_period_ms")]
    pub tick_period_ms: u64,
    /// Autosave period.
    #[serde(default = "StoreConfig::default_save_period_ms")]
    pub save_period_ms: u64,
    #[serde(default = "StoreConfig::default_save_key")]
    pub save_key: String,
}

impl StoreConfig {
    const fn default_tick_period_ms() -> u64 {
        TICK_PERIOD_MS
    }

    const fn default_save_period_ms() -> u64 {
        SAVE_PERIOD_MS
    }

    fn default_save_key() -> String {
        SAVE_KEY.to_string()
    }

    /// Parse a config document; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result fails [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod {
                field: "tick_period_ms",
            });
        }
        if self.save_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod {
                field: "save_period_ms",
            });
        }
        if self.save_key.is_empty() {
            return Err(ConfigError::EmptySaveKey);
        }
        Ok(())
    }

    #[must_use]
    pub const fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    #[must_use]
    pub const fn save_period(&self) -> Duration {
        Duration::from_millis(self.save_period_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: Self::default_tick_period_ms(),
            save_period_ms: Self::default_save_period_ms(),
            save_key: Self::default_save_key(),
        }
    }
}
