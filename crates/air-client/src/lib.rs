//! AIR Gateway Client
//!
//! HTTP adapters for the AIR Blackbox gateway.
//!
//! - [`AirClient`]: synchronous-style chat, health, audit and evidence calls
//! - [`HttpEpisodeSink`]: posts episodes to `/v1/episodes`
//! - [`AirCallbackHandler`]: start/end/error callbacks that record episodes
//!
//! # Usage
//!
//! ```rust,ignore
//! use air_client::{AirClient, GatewayConfig};
//!
//! let client = AirClient::new(GatewayConfig::from_env()?)?;
//! let response = client.chat(&messages, "gpt-4o-mini", Default::default()).await?;
//! println!("run id: {}", response.air.run_id);
//! ```

mod client;
mod config;
mod episode_sink;
mod handler;

#[cfg(test)]
mod mock_gateway;

pub use client::{AirClient, AirMetadata, ChatOptions, ChatResponse, HealthStatus, DEFAULT_MODEL};
pub use config::{
    GatewayConfig, DEFAULT_GATEWAY_URL, DEFAULT_TIMEOUT_SECS, ENV_API_KEY, ENV_GATEWAY_URL,
    ENV_TIMEOUT,
};
pub use episode_sink::HttpEpisodeSink;
pub use handler::{AirCallbackHandler, DEFAULT_AGENT_ID};
