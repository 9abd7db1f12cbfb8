//! AIR direct client
//!
//! One blocking-style request per call. Correlation is left to the gateway,
//! which returns its run id in the `x-run-id` response header.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use air::AirError;

use crate::config::GatewayConfig;

/// Model used when the caller does not pick one
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const RUN_ID_HEADER: &str = "x-run-id";
const GATEWAY_KEY_HEADER: &str = "X-Gateway-Key";

/// Extra request fields merged into the chat body (temperature, max_tokens, ...)
pub type ChatOptions = Map<String, Value>;

/// Gateway-side correlation attached to every chat response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirMetadata {
    /// Run id assigned by the gateway; empty when the header was absent
    pub run_id: String,
    /// Gateway the call went through
    pub gateway: String,
}

/// Chat completion as returned by the provider, plus gateway metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// Upstream body, untouched
    pub body: Map<String, Value>,
    pub air: AirMetadata,
}

impl ChatResponse {
    /// Field name the metadata is stored under in [`ChatResponse::into_json`]
    pub const METADATA_FIELD: &'static str = "_air";

    /// Upstream body with an added `_air` field
    pub fn into_json(self) -> Value {
        let mut body = self.body;
        body.insert(
            Self::METADATA_FIELD.to_string(),
            serde_json::json!({
                "run_id": self.air.run_id,
                "gateway": self.air.gateway,
            }),
        );
        Value::Object(body)
    }

    /// Text of the first choice, if the body has the usual shape
    pub fn content(&self) -> Option<&str> {
        self.body
            .get("choices")?
            .get(0)?
            .get("message")?
            .get("content")?
            .as_str()
    }
}

/// `GET /health` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// HTTP client for the AIR gateway
pub struct AirClient {
    http: Client,
    config: GatewayConfig,
    chat_headers: HeaderMap,
}

impl AirClient {
    /// Create a client. Invalid extra headers are rejected here, not per call.
    pub fn new(config: GatewayConfig) -> Result<Self, AirError> {
        let http = config.http_client(config.timeout)?;
        let chat_headers = chat_headers(&config)?;
        Ok(Self {
            http,
            config,
            chat_headers,
        })
    }

    /// Create a client configured from the process environment
    pub fn from_env() -> Result<Self, AirError> {
        Self::new(GatewayConfig::from_env()?)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Send a chat completion through the gateway.
    ///
    /// `options` are merged last, so they can override `model` or `messages`.
    pub async fn chat<M>(
        &self,
        messages: &[M],
        model: &str,
        options: ChatOptions,
    ) -> Result<ChatResponse, AirError>
    where
        M: Serialize + Sync,
    {
        let messages = serde_json::to_value(messages)
            .map_err(|e| AirError::Serialization(format!("Failed to serialize messages: {e}")))?;

        let mut payload = Map::new();
        payload.insert("model".to_string(), Value::String(model.to_string()));
        payload.insert("messages".to_string(), messages);
        payload.extend(options);

        let url = self.config.url("/v1/chat/completions");
        debug!(url = %url, model = %model, "Sending chat completion through gateway");

        let resp = self
            .send(
                self.http
                    .post(&url)
                    .headers(self.chat_headers.clone())
                    .json(&payload),
            )
            .await?;

        let run_id = resp
            .headers()
            .get(RUN_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body: Map<String, Value> = decode(resp).await?;

        Ok(ChatResponse {
            body,
            air: AirMetadata {
                run_id,
                gateway: self.config.gateway_url.clone(),
            },
        })
    }

    /// Check gateway health
    pub async fn health(&self) -> Result<HealthStatus, AirError> {
        self.get_json("/health", None).await
    }

    /// Audit chain status and compliance report
    pub async fn audit(&self, gateway_key: Option<&str>) -> Result<Map<String, Value>, AirError> {
        self.get_json("/v1/audit", gateway_key).await
    }

    /// Signed evidence package
    pub async fn export_evidence(
        &self,
        gateway_key: Option<&str>,
    ) -> Result<Map<String, Value>, AirError> {
        self.get_json("/v1/audit/export", gateway_key).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        gateway_key: Option<&str>,
    ) -> Result<T, AirError> {
        let mut request = self.http.get(self.config.url(path));
        if let Some(key) = gateway_key.filter(|k| !k.is_empty()) {
            request = request.header(GATEWAY_KEY_HEADER, key);
        }

        let resp = self.send(request).await?;
        decode(resp).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, AirError> {
        let resp = request
            .send()
            .await
            .map_err(|e| AirError::Transport(format!("Failed to reach AIR gateway: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(AirError::gateway_request(status, body));
        }

        Ok(resp)
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, AirError> {
    resp.json()
        .await
        .map_err(|e| AirError::Serialization(format!("Failed to parse gateway response: {e}")))
}

/// Authorization and content type, then configured extras on top
fn chat_headers(config: &GatewayConfig) -> Result<HeaderMap, AirError> {
    let mut headers = HeaderMap::new();

    let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
        .map_err(|e| AirError::Config(format!("Invalid API key: {e}")))?;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in &config.extra_headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| AirError::Config(format!("Invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| AirError::Config(format!("Invalid value for header '{name}': {e}")))?;
        headers.insert(name, value);
    }

    Ok(headers)
}
