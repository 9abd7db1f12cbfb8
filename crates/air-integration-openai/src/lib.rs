//! OpenAI Integration for AIR
//!
//! Route OpenAI-compatible calls through the AIR gateway so every call is
//! recorded, without changing the code that makes the calls.
//!
//! # Usage
//!
//! ```rust,ignore
//! use air_client::GatewayConfig;
//! use air_integration_openai::{air_chat_model, air_openai, air_wrap};
//!
//! let gateway = GatewayConfig::from_env()?;
//!
//! // A client that already talks to the gateway
//! let client = air_openai(&gateway)?;
//!
//! // Or redirect one you built yourself
//! air_wrap(&mut existing_client, &gateway)?;
//!
//! // A chat model that also records episodes through callbacks
//! let llm = air_chat_model("gpt-4o-mini", &gateway)?;
//! let result = llm.invoke("What is a flight recorder?").await?;
//! ```

mod chat_model;
mod client;
mod config;

use std::sync::Arc;

use air::{AirError, ProviderClient};
use air_client::{AirCallbackHandler, GatewayConfig};

pub use chat_model::ChatModel;
pub use client::OpenAiClient;
pub use config::{OpenAiConfig, OPENAI_BASE_URL};

/// Agent id stamped on episodes recorded by this integration
pub const INTEGRATION_NAME: &str = "openai";

/// OpenAI client whose base URL is already the gateway's `/v1`
pub fn air_openai(gateway: &GatewayConfig) -> Result<OpenAiClient, AirError> {
    OpenAiClient::new(
        OpenAiConfig::new(gateway.api_key.clone())
            .with_base_url(gateway.provider_base_url())
            .with_timeout(gateway.timeout),
    )
}

/// Chat model routed through the gateway with an AIR callback handler attached
pub fn air_chat_model(model: &str, gateway: &GatewayConfig) -> Result<ChatModel, AirError> {
    let handler = AirCallbackHandler::new(gateway)?.with_agent_id(INTEGRATION_NAME);
    Ok(ChatModel::new(air_openai(gateway)?, model).with_callback(Arc::new(handler)))
}

/// Redirect an existing provider client through the gateway
pub fn air_wrap<'a, C>(client: &'a mut C, gateway: &GatewayConfig) -> Result<&'a mut C, AirError>
where
    C: ProviderClient + ?Sized,
{
    air::redirect(client, &gateway.gateway_url)
}
