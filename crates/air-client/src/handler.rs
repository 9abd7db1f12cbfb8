//! Callback handler that records LLM calls as AIR episodes
//!
//! Attach it to a framework's callback list. Start events go into the
//! correlator, end events become episodes posted to the gateway in the
//! background, error events drop the call.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use air::{
    model_name_from_serialized, AirError, CallId, CompletionPayload, Correlator, EpisodeReporter,
    EpisodeSink, LlmCallbackHandler,
};
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::episode_sink::HttpEpisodeSink;

/// Agent id stamped on episodes unless overridden
pub const DEFAULT_AGENT_ID: &str = "langchain";

/// LLM callback handler that logs interactions to the AIR gateway
pub struct AirCallbackHandler<S: EpisodeSink = HttpEpisodeSink> {
    reporter: EpisodeReporter<S>,
    gateway_url: String,
    record_failures: bool,
}

impl AirCallbackHandler<HttpEpisodeSink> {
    /// Handler posting to the configured gateway
    pub fn new(config: &GatewayConfig) -> Result<Self, AirError> {
        let sink = HttpEpisodeSink::new(config)?;
        Ok(Self::with_sink(Arc::new(sink), config.gateway_url.clone()))
    }

    /// Handler for the gateway named in the environment
    pub fn from_env() -> Result<Self, AirError> {
        Self::new(&GatewayConfig::from_env()?)
    }
}

impl<S: EpisodeSink + 'static> AirCallbackHandler<S> {
    /// Handler delivering to a custom sink
    pub fn with_sink(sink: Arc<S>, gateway_url: impl Into<String>) -> Self {
        Self {
            reporter: EpisodeReporter::new(Arc::new(Correlator::new()), sink, DEFAULT_AGENT_ID),
            gateway_url: gateway_url.into(),
            record_failures: false,
        }
    }

    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.reporter = self.reporter.with_agent_id(agent_id);
        self
    }

    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.reporter = self.reporter.with_delivery_timeout(timeout);
        self
    }

    /// Emit a `failed` episode on error events instead of dropping the call
    pub fn with_failure_episodes(mut self, enabled: bool) -> Self {
        self.record_failures = enabled;
        self
    }

    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }

    pub fn correlator(&self) -> &Arc<Correlator> {
        self.reporter.correlator()
    }

    pub fn reporter(&self) -> &EpisodeReporter<S> {
        &self.reporter
    }
}

impl<S: EpisodeSink + 'static> LlmCallbackHandler for AirCallbackHandler<S> {
    fn name(&self) -> &str {
        "air"
    }

    fn on_llm_start(&self, run_id: &CallId, serialized: &Value, prompts: &[String]) {
        self.correlator()
            .begin(run_id.clone(), model_name_from_serialized(serialized), prompts.to_vec());
    }

    fn on_llm_end(&self, run_id: &CallId, response: &dyn CompletionPayload) {
        self.reporter.report(run_id, response);
    }

    fn on_llm_error(&self, run_id: &CallId, error: &dyn std::error::Error) {
        debug!(call_id = %run_id, error = %error, "LLM call failed");
        if self.record_failures {
            self.reporter.report_failure(run_id);
        } else {
            self.correlator().fail(run_id);
        }
    }
}
