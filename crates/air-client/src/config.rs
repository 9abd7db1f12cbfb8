//! Gateway configuration
//!
//! Built once when a client is created and never changed afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use air::{gateway_v1_url, AirError};

pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const ENV_GATEWAY_URL: &str = "AIR_GATEWAY_URL";
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_TIMEOUT: &str = "AIR_TIMEOUT";

/// Configuration for the AIR gateway connection
#[derive(Clone, PartialEq)]
pub struct GatewayConfig {
    /// Gateway base address, without the `/v1` suffix
    pub gateway_url: String,
    /// Provider credential, sent as a bearer token
    pub api_key: String,
    /// Request timeout for synchronous gateway calls
    pub timeout: Duration,
    /// Whether TLS certificates are verified
    pub verify_tls: bool,
    /// Static headers added to chat requests; these win over built-ins
    pub extra_headers: BTreeMap<String, String>,
}

impl GatewayConfig {
    /// Create a configuration for the given gateway
    pub fn new(gateway_url: impl Into<String>) -> Self {
        Self {
            gateway_url: gateway_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Set the provider credential
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable TLS verification
    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Add a static header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }

    /// Read `AIR_GATEWAY_URL`, `OPENAI_API_KEY` and `AIR_TIMEOUT` from the
    /// process environment
    pub fn from_env() -> Result<Self, AirError> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, falling back to defaults
    pub fn from_source<F>(lookup: F) -> Result<Self, AirError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_GATEWAY_URL).filter(|v| !v.trim().is_empty()) {
            config.gateway_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(api_key) = lookup(ENV_API_KEY) {
            config.api_key = api_key;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT).filter(|v| !v.trim().is_empty()) {
            config.timeout = parse_timeout(&raw)?;
        }

        Ok(config)
    }

    /// Base URL an OpenAI-compatible client should use to reach the gateway
    pub fn provider_base_url(&self) -> String {
        gateway_v1_url(&self.gateway_url)
    }

    /// Gateway URL joined with `path`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.gateway_url, path)
    }

    pub(crate) fn http_client(&self, timeout: Duration) -> Result<reqwest::Client, AirError> {
        reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!self.verify_tls)
            .user_agent(concat!("air-sdk-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AirError::Config(format!("Failed to build HTTP client: {e}")))
    }
}

/// Seconds as an integer or decimal, e.g. `30` or `2.5`
fn parse_timeout(raw: &str) -> Result<Duration, AirError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .filter(|d| !d.is_zero())
        .ok_or_else(|| {
            AirError::Config(format!(
                "{ENV_TIMEOUT} must be a positive number of seconds, got '{raw}'"
            ))
        })
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verify_tls: true,
            extra_headers: BTreeMap::new(),
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("gateway_url", &self.gateway_url)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("timeout", &self.timeout)
            .field("verify_tls", &self.verify_tls)
            .field("extra_headers", &self.extra_headers.keys().collect::<Vec<_>>())
            .finish()
    }
}
