//! HTTP episode sink
//!
//! Posts episodes to the gateway's `/v1/episodes` endpoint using reqwest.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use air::{AirError, Episode, EpisodeSink, DEFAULT_DELIVERY_TIMEOUT};

use crate::config::GatewayConfig;

/// HTTP implementation of EpisodeSink
pub struct HttpEpisodeSink {
    client: Client,
    ingest_url: String,
}

impl HttpEpisodeSink {
    /// Sink for the configured gateway, using the short delivery timeout
    pub fn new(config: &GatewayConfig) -> Result<Self, AirError> {
        Self::with_timeout(config, DEFAULT_DELIVERY_TIMEOUT)
    }

    pub fn with_timeout(config: &GatewayConfig, timeout: Duration) -> Result<Self, AirError> {
        Ok(Self {
            client: config.http_client(timeout)?,
            ingest_url: config.url("/v1/episodes"),
        })
    }

    pub fn ingest_url(&self) -> &str {
        &self.ingest_url
    }
}

#[async_trait]
impl EpisodeSink for HttpEpisodeSink {
    async fn ingest(&self, episode: &Episode) -> Result<(), AirError> {
        let resp = self
            .client
            .post(&self.ingest_url)
            .json(episode)
            .send()
            .await
            .map_err(|e| AirError::Delivery(format!("Failed to post episode: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AirError::Delivery(format!(
                "Gateway rejected episode with status {status}"
            )));
        }

        debug!(agent_id = %episode.agent_id, status = %status, "Episode accepted by gateway");
        Ok(())
    }
}
