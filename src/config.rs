use super::error::ConfigError;
use super::history::DEFAULT_HISTORY_CAPACITY;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Engine settings, read from TOML. Every key is optional.
///
/// ```toml
/// history_capacity = 50
/// log_filter = "shipment_tracker=debug"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Snapshots kept per shipment before the oldest is evicted.
    pub history_capacity: usize,
    /// `EnvFilter` directive for adapters that install a subscriber.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            log_filter: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::InvalidCapacity(self.history_capacity));
        }
        Ok(())
    }
}
