use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, TrackerError};

/// Tracker configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Number of entries the plugin application map is sized for up front
    pub initial_capacity: usize,
    /// Number of shards in the concurrent maps (power of two, greater than 1)
    pub shard_amount: usize,
    /// `tracing` filter directive used when no `RUST_LOG` is set
    pub log_filter: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            // Same sizing dashmap picks on its own
            shard_amount: default_shard_amount(),
            log_filter: "info".to_string(),
        }
    }
}

fn default_shard_amount() -> usize {
    (num_cpus::get() * 4).next_power_of_two().max(2)
}

impl TrackerConfig {
    /// Create a new builder for TrackerConfig
    pub fn builder() -> TrackerConfigBuilder {
        TrackerConfigBuilder::new()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.shard_amount < 2 {
            return Err(TrackerError::configuration_field(
                "shard_amount must be greater than 1",
                "shard_amount",
            ));
        }
        if !self.shard_amount.is_power_of_two() {
            return Err(TrackerError::configuration_field(
                "shard_amount must be a power of two",
                "shard_amount",
            ));
        }
        if self.log_filter.trim().is_empty() {
            return Err(TrackerError::configuration_field(
                "log_filter cannot be empty",
                "log_filter",
            ));
        }
        Ok(())
    }

    /// Small maps and verbose logging for tests and local builds
    pub fn development() -> Self {
        Self {
            initial_capacity: 16,
            shard_amount: 4,
            log_filter: "plugtrack=debug".to_string(),
        }
    }

    /// Sized for builds with many projects applying plugins in parallel
    pub fn production() -> Self {
        let cpu_count = num_cpus::get();

        Self {
            initial_capacity: 1024,
            shard_amount: (cpu_count * 8).next_power_of_two().max(2),
            log_filter: "warn".to_string(),
        }
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: TrackerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML configuration file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TrackerError::io(format!("reading {}", path.display()), e))?;
        Self::from_yaml_str(&contents)
    }
}

/// Builder for TrackerConfig
pub struct TrackerConfigBuilder {
    config: TrackerConfig,
}

impl TrackerConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: TrackerConfig::default(),
        }
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    pub fn shard_amount(mut self, shards: usize) -> Self {
        self.config.shard_amount = shards;
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.log_filter = filter.into();
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<TrackerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for TrackerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
