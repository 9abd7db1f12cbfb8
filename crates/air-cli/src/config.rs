//! Configuration management for the AIR CLI
//!
//! Stores gateway address, credentials, and static headers in
//! ~/.config/air/config.toml

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use air_client::{GatewayConfig, ENV_API_KEY, ENV_GATEWAY_URL, ENV_TIMEOUT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const CONFIG_DIR: &str = "air";
const CONFIG_FILE: &str = "config.toml";

/// Environment variable holding the gateway credential for audit endpoints
pub const ENV_GATEWAY_KEY: &str = "AIR_GATEWAY_KEY";

/// CLI Configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_key: Option<String>,
    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_tls: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from the default location, or return an empty one
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {:?}", dir))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Resolve the gateway configuration: defaults, then this file, then
    /// `lookup` (the process environment in production)
    pub fn gateway_config<F>(&self, lookup: F) -> Result<GatewayConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut gateway = GatewayConfig::from_source(|key| {
            lookup(key).or_else(|| match key {
                ENV_GATEWAY_URL => self.gateway_url.clone(),
                ENV_API_KEY => self.api_key.clone(),
                ENV_TIMEOUT => self.timeout_secs.map(|secs| secs.to_string()),
                _ => None,
            })
        })?;

        if let Some(verify) = self.verify_tls {
            gateway = gateway.with_verify_tls(verify);
        }
        for (name, value) in &self.headers {
            gateway = gateway.with_header(name, value);
        }

        Ok(gateway)
    }

    /// Gateway credential: environment first, then this file
    pub fn resolve_gateway_key<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(ENV_GATEWAY_KEY)
            .filter(|k| !k.is_empty())
            .or_else(|| self.gateway_key.clone())
    }
}
