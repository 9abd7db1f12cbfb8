//! OpenAI client configuration

use std::time::Duration;

/// Public OpenAI endpoint, used when nothing else is configured
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Bearer credential
    pub api_key: String,
    /// Base URL including the `/v1` prefix
    pub base_url: String,
    /// Optional `OpenAI-Organization` header
    pub organization: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Create a configuration with just an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the organization
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: OPENAI_BASE_URL.to_string(),
            organization: None,
            timeout: Duration::from_secs(120),
        }
    }
}
