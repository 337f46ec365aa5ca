//! Service configuration: optional YAML file overlaid with environment variables.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use imagery_common::ImageryConfig;
use serde::{Deserialize, Serialize};

/// Full proxy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Provider endpoints and resolution defaults.
    #[serde(flatten)]
    pub imagery: ImageryConfig,

    /// Timeout for a single upstream request.
    pub request_timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            imagery: ImageryConfig::default(),
            request_timeout_secs: 30,
        }
    }
}

impl ProxyConfig {
    /// Load configuration, then apply environment overrides.
    ///
    /// Without a file the defaults are used as the base.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Parse a YAML configuration file without consulting the environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ProxyConfig = serde_yaml::from_str(content)?;
        if config.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }
        Ok(config)
    }

    pub fn with_env_overrides(mut self) -> Self {
        self.imagery = self.imagery.with_env_overrides();
        if let Some(secs) = std::env::var("IMAGERY_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0)
        {
            self.request_timeout_secs = secs;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
