//! Configuration Management
//!
//! Provider settings: read from the config file, then overridden by
//! environment variables.

use crate::buddy::HttpOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.buddy.works";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Why a configuration cannot be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no API token configured; set BUDDY_TOKEN or \"token\" in {0}")]
    MissingToken(String),
    #[error("invalid API URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid value {value:?} for {name}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the Buddy API
    pub api_url: String,
    /// Personal access token
    pub token: String,
    /// Skip TLS certificate verification (self-hosted installations)
    pub insecure: bool,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: String::new(),
            insecure: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl ProviderConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("buddy-datasources").join("config.json"))
    }

    /// Load from the default path (if present) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        tracing::debug!("loaded provider config from {:?}", path);
        Ok(config)
    }

    /// Override fields from environment variables, looked up through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BUDDY_API_URL").or_else(|| lookup("BUDDY_BASE_URL")) {
            self.api_url = url;
        }
        if let Some(token) = lookup("BUDDY_TOKEN") {
            self.token = token;
        }
        if let Some(value) = lookup("BUDDY_INSECURE") {
            self.insecure = parse_bool(&value).ok_or(ConfigError::InvalidEnv {
                name: "BUDDY_INSECURE",
                value,
            })?;
        }
        if let Some(value) = lookup("BUDDY_TIMEOUT") {
            self.timeout_secs = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "BUDDY_TIMEOUT",
                value,
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            let path = Self::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "the config file".to_string());
            return Err(ConfigError::MissingToken(path));
        }
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: self.api_url.clone(),
            reason,
        };
        let parsed = url::Url::parse(&self.api_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
        }
        Ok(())
    }

    pub fn http_options(&self) -> HttpOptions {
        let mut options = HttpOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            insecure: self.insecure,
            ..HttpOptions::default()
        };
        if let Some(agent) = &self.user_agent {
            options.user_agent = agent.clone();
        }
        options
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" | "" => Some(false),
        _ => None,
    }
}
