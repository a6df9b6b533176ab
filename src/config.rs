use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use xprint_sandbox_rhai::ScriptLimits;

use crate::validation::ValidationConfig;

pub const ENV_NOTIFY_URL: &str = "XPRINT_NOTIFY_URL";
pub const ENV_EXEC_TIMEOUT_MS: &str = "XPRINT_EXEC_TIMEOUT_MS";
pub const ENV_JOB_RETENTION_MS: &str = "XPRINT_JOB_RETENTION_MS";

/// Upper bound on `execution_timeout_ms` (10 minutes).
pub const MAX_EXECUTION_TIMEOUT_MS: u64 = 600_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },
    #[error("{field} must be between 1 and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },
}

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Wall-clock budget for one interpreter invocation
    pub execution_timeout_ms: u64,
    /// Base URL for compile notifications; `None` logs them instead
    pub notify_url: Option<String>,
    pub notify_timeout_ms: u64,
    /// Age after which finished jobs are pruned
    pub job_retention_ms: u64,
    pub validation: ValidationConfig,
    pub limits: ScriptLimits,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            execution_timeout_ms: 5_000,
            notify_url: None,
            notify_timeout_ms: 2_000,
            job_retention_ms: 3_600_000,
            validation: ValidationConfig::default(),
            limits: ScriptLimits::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()
    }

    /// Defaults overridden by `XPRINT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from a variable lookup on top of `self`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_NOTIFY_URL).filter(|u| !u.trim().is_empty()) {
            self.notify_url = Some(url.trim().to_string());
        }
        if let Some(ms) = parse_millis(&lookup, ENV_EXEC_TIMEOUT_MS)? {
            self.execution_timeout_ms = ms;
        }
        if let Some(ms) = parse_millis(&lookup, ENV_JOB_RETENTION_MS)? {
            self.job_retention_ms = ms;
        }
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.execution_timeout_ms == 0 || self.execution_timeout_ms > MAX_EXECUTION_TIMEOUT_MS {
            return Err(ConfigError::OutOfRange {
                field: "execution_timeout_ms",
                value: self.execution_timeout_ms,
                max: MAX_EXECUTION_TIMEOUT_MS,
            });
        }
        Ok(self)
    }

    pub fn execution_timeout(&self) -> Duration {
        Duration::from_millis(self.execution_timeout_ms)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_millis(self.notify_timeout_ms)
    }

    pub fn job_retention(&self) -> Duration {
        Duration::from_millis(self.job_retention_ms)
    }
}

fn parse_millis<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value: raw }),
    }
}
