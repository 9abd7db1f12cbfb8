//! OpenAI-compatible API client
//!
//! Owns its base URL directly, so the redirector can point it at the
//! gateway after construction.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use air::{AirError, ClientShape, HasEndpoint, ProviderClient};

use crate::config::OpenAiConfig;

/// OpenAI-compatible API client
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
    organization: Option<String>,
}

impl OpenAiClient {
    /// Create a new client
    pub fn new(config: OpenAiConfig) -> Result<Self, AirError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AirError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            organization: config.organization,
        })
    }

    /// `POST {base_url}/chat/completions`
    pub async fn chat_completion(&self, request: &Value) -> Result<Value, AirError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %request["model"], "Sending chat completion");

        let mut builder = self.http.post(&url).bearer_auth(&self.api_key).json(request);
        if let Some(org) = &self.organization {
            builder = builder.header("OpenAI-Organization", org);
        }

        let resp = builder
            .send()
            .await
            .inspect_err(|e| error!(error = %e, "Chat completion request failed"))
            .map_err(|e| AirError::Transport(format!("Failed to reach {url}: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(AirError::gateway_request(status, body));
        }

        resp.json()
            .await
            .map_err(|e| AirError::Serialization(format!("Failed to parse completion: {e}")))
    }
}

impl HasEndpoint for OpenAiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn set_base_url(&mut self, url: String) {
        self.base_url = url;
    }
}

impl ProviderClient for OpenAiClient {
    fn shape(&mut self) -> ClientShape<'_> {
        ClientShape::Direct(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_openai() {
        let client = OpenAiClient::new(OpenAiConfig::new("sk-test")).unwrap();
        assert_eq!(client.base_url(), "https://api.openai.com/v1");
    }

    #[test]
    fn test_redirect_direct_shape() {
        let mut client = OpenAiClient::new(OpenAiConfig::new("sk-test")).unwrap();
        air::redirect(&mut client, "http://air:8080").unwrap();
        assert_eq!(client.base_url(), "http://air:8080/v1");
    }
}
