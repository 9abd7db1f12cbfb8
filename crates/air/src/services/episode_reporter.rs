//! Episode Reporter
//!
//! Turns a finished call into an `Episode` and hands it to an `EpisodeSink`
//! on a background task. Reporting has no result and no error channel:
//! delivery problems are logged and dropped so the LLM call being observed
//! is never delayed or failed by its own recording.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::entities::{CallId, CallRecord, Episode, EpisodeStatus};
use crate::ports::completion::CompletionPayload;
use crate::ports::episode_sink::EpisodeSink;
use crate::services::correlator::Correlator;

/// Upper bound on a single episode delivery
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Episodes allowed in flight at once; further reports are dropped
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;

/// Best-effort episode reporter
pub struct EpisodeReporter<S: EpisodeSink> {
    correlator: Arc<Correlator>,
    sink: Arc<S>,
    agent_id: String,
    delivery_timeout: Duration,
    max_in_flight: usize,
    in_flight: Arc<Semaphore>,
}

impl<S: EpisodeSink + 'static> EpisodeReporter<S> {
    pub fn new(correlator: Arc<Correlator>, sink: Arc<S>, agent_id: impl Into<String>) -> Self {
        Self {
            correlator,
            sink,
            agent_id: agent_id.into(),
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            in_flight: Arc::new(Semaphore::new(DEFAULT_MAX_IN_FLIGHT)),
        }
    }

    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = agent_id.into();
        self
    }

    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    pub fn with_max_in_flight(mut self, max: usize) -> Self {
        self.max_in_flight = max;
        self.in_flight = Arc::new(Semaphore::new(max));
        self
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn correlator(&self) -> &Arc<Correlator> {
        &self.correlator
    }

    /// Deliveries currently running
    pub fn in_flight(&self) -> usize {
        self.max_in_flight
            .saturating_sub(self.in_flight.available_permits())
    }

    /// Report a successfully completed call.
    ///
    /// A missing start record still produces an episode, with an unknown
    /// model, no inputs and zero duration.
    pub fn report(&self, call_id: &CallId, payload: &dyn CompletionPayload) {
        let record = self.correlator.end(call_id);
        let episode = self.build_episode(record, payload.output_texts(), EpisodeStatus::Completed);
        self.dispatch(call_id, episode);
    }

    /// Report a failed call as a `failed` episode with no output
    pub fn report_failure(&self, call_id: &CallId) {
        let record = self.correlator.fail(call_id);
        let episode = self.build_episode(record, Vec::new(), EpisodeStatus::Failed);
        self.dispatch(call_id, episode);
    }

    /// Assemble the episode for a finished call without sending it
    pub fn build_episode(
        &self,
        record: Option<CallRecord>,
        output: Vec<String>,
        status: EpisodeStatus,
    ) -> Episode {
        Episode::from_call(self.agent_id.clone(), record, output, status, Instant::now())
    }

    fn dispatch(&self, call_id: &CallId, episode: Episode) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(call_id = %call_id, "No async runtime, episode dropped");
            return;
        };
        let Ok(permit) = Arc::clone(&self.in_flight).try_acquire_owned() else {
            warn!(
                call_id = %call_id,
                max_in_flight = %self.max_in_flight,
                "Too many episode deliveries in flight, episode dropped"
            );
            return;
        };

        let sink = Arc::clone(&self.sink);
        let timeout = self.delivery_timeout;
        let call_id = call_id.clone();

        runtime.spawn(async move {
            let _permit = permit;
            match tokio::time::timeout(timeout, sink.ingest(&episode)).await {
                Ok(Ok(())) => debug!(call_id = %call_id, "Episode delivered"),
                Ok(Err(e)) => warn!(call_id = %call_id, error = %e, "Episode delivery failed"),
                Err(_) => warn!(
                    call_id = %call_id,
                    timeout_ms = %timeout.as_millis(),
                    "Episode delivery timed out"
                ),
            }
        });
    }
}
