use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diagnostics::DEFAULT_LOG_CAPACITY;

pub const ENV_PLUGIN_NAME: &str = "FCM_BRIDGE_PLUGIN_NAME";
pub const ENV_LOG_CAPACITY: &str = "FCM_BRIDGE_LOG_CAPACITY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },
    #[error("config error: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Native plugin name every call is addressed to.
    #[serde(default = "default_plugin_name")]
    pub plugin_name: String,
    #[serde(default = "default_log_buffer_capacity")]
    pub log_buffer_capacity: usize,
    /// iOS 9 permission polling: how long to wait for a decision.
    #[serde(default = "default_ios_permission_timeout_secs")]
    pub ios_permission_timeout_secs: f64,
    /// iOS 9 permission polling: delay between checks.
    #[serde(default = "default_ios_permission_interval_secs")]
    pub ios_permission_interval_secs: f64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            plugin_name: default_plugin_name(),
            log_buffer_capacity: default_log_buffer_capacity(),
            ios_permission_timeout_secs: default_ios_permission_timeout_secs(),
            ios_permission_interval_secs: default_ios_permission_interval_secs(),
        }
    }
}

impl BridgeConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env()
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup(ENV_PLUGIN_NAME) {
            let trimmed = name.trim();
            if !trimmed.is_empty() {
                self.plugin_name = trimmed.to_string();
            }
        }

        if let Some(raw) = lookup(ENV_LOG_CAPACITY) {
            self.log_buffer_capacity = raw.trim().parse().map_err(|_| ConfigError::Env {
                var: ENV_LOG_CAPACITY,
                value: raw.clone(),
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plugin_name.trim().is_empty() {
            return Err(ConfigError::Invalid("plugin_name must not be empty".into()));
        }
        if self.log_buffer_capacity == 0 {
            return Err(ConfigError::Invalid(
                "log_buffer_capacity must be at least 1".into(),
            ));
        }
        if self.ios_permission_timeout_secs < 0.0 || self.ios_permission_interval_secs <= 0.0 {
            return Err(ConfigError::Invalid(
                "ios permission timeout must be >= 0 and interval > 0".into(),
            ));
        }
        Ok(())
    }
}

fn default_plugin_name() -> String {
    "FCMPlugin".to_string()
}

fn default_log_buffer_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}

fn default_ios_permission_timeout_secs() -> f64 {
    10.0
}

fn default_ios_permission_interval_secs() -> f64 {
    0.3
}
