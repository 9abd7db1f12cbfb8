//! Episode Sink Port
//!
//! Abstract interface for delivering finished episodes to the gateway.

use async_trait::async_trait;

use crate::domain::entities::Episode;
use crate::domain::errors::AirError;

/// Episode delivery interface
///
/// Implementations perform the actual transport (HTTP in production).
/// Errors returned here are logged by the reporter and then discarded;
/// they never reach the code that made the LLM call.
#[async_trait]
pub trait EpisodeSink: Send + Sync {
    /// Deliver one episode
    async fn ingest(&self, episode: &Episode) -> Result<(), AirError>;
}
