use anyhow::{Context, Result};
use figment::providers::{Env, Serialized};
use figment::Figment;
use thiserror::Error;

use crate::domain::error::LogError;
use crate::infrastructure::logging::LoggerConfig;

/// Configuration error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Base name cannot be empty")]
    EmptyBaseName,

    #[error("Invalid max_file_size: {0}. Must be at least 1")]
    InvalidMaxFileSize(u64),

    #[error("Invalid monitor_interval_secs: {0}. Must be at least 1")]
    InvalidMonitorInterval(u64),
}

impl From<ConfigError> for LogError {
    fn from(error: ConfigError) -> Self {
        Self::InvalidConfig(error.to_string())
    }
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. Environment variables (ROTOLOG_* prefix)
    pub fn load() -> Result<LoggerConfig> {
        Self::load_from(Figment::new().merge(Env::prefixed("ROTOLOG_")))
    }

    /// Load configuration with `overrides` layered on top of defaults.
    pub fn load_from(overrides: Figment) -> Result<LoggerConfig> {
        let config: LoggerConfig = Figment::new()
            .merge(Serialized::defaults(LoggerConfig::default()))
            .merge(overrides)
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &LoggerConfig) -> Result<(), ConfigError> {
        if config.base_name.trim().is_empty() {
            return Err(ConfigError::EmptyBaseName);
        }

        if config.max_file_size == 0 {
            return Err(ConfigError::InvalidMaxFileSize(config.max_file_size));
        }

        if config.monitor_interval_secs == 0 {
            return Err(ConfigError::InvalidMonitorInterval(
                config.monitor_interval_secs,
            ));
        }

        Ok(())
    }
}
