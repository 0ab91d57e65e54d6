// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracker configuration
//!
//! Loaded from TOML; every key is optional:
//!
//! ```toml
//! tick_interval = "1s"
//! force_every = 3
//! completion_delay = "600ms"
//! max_ticks = 3600
//! max_read_failures = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("invalid config {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Polling policy shared by every operation kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Period between poll ticks
    #[serde(with = "humantime_serde")]
    pub tick_interval: Duration,
    /// Every n-th tick bypasses the cache
    pub force_every: u64,
    /// Delay between reaching ready and the completion side effect
    #[serde(with = "humantime_serde")]
    pub completion_delay: Duration,
    /// Ticks allowed before the operation fails with a timeout
    pub max_ticks: u64,
    /// Consecutive read failures tolerated before giving up
    pub max_read_failures: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            force_every: 3,
            completion_delay: Duration::from_millis(600),
            max_ticks: 3600,
            max_read_failures: 5,
        }
    }
}

impl TrackerConfig {
    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let config: TrackerConfig =
            toml::from_str(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), ?config, "loaded tracker config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::Invalid {
                field: "tick_interval",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.force_every == 0 {
            return Err(ConfigError::Invalid {
                field: "force_every",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_ticks == 0 {
            return Err(ConfigError::Invalid {
                field: "max_ticks",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    pub fn with_max_read_failures(mut self, max: u32) -> Self {
        self.max_read_failures = max;
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
