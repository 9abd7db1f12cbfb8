//! Episode - one logical unit of agent work
//!
//! Transient record assembled when a call completes and posted to the
//! gateway's episode-ingest endpoint. Never persisted here.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::call_record::{CallRecord, UNKNOWN_MODEL};

/// Number of characters of the first input kept as the episode task
pub const TASK_PREFIX_CHARS: usize = 200;

/// Terminal status of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeStatus {
    Completed,
    Failed,
}

impl std::fmt::Display for EpisodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpisodeStatus::Completed => write!(f, "completed"),
            EpisodeStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Kind of work a step records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    LlmCall,
}

/// A single step inside an episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub model: String,
    pub input: Vec<String>,
    pub output: Vec<String>,
    pub duration_ms: u64,
}

/// Episode as accepted by `POST /v1/episodes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub agent_id: String,
    pub task: String,
    pub steps: Vec<Step>,
    pub status: EpisodeStatus,
}

impl Episode {
    /// Build a single-step episode for a finished LLM call.
    ///
    /// A missing `record` means the start event was never seen; the episode
    /// is still produced with an unknown model, no inputs and zero duration.
    pub fn from_call(
        agent_id: impl Into<String>,
        record: Option<CallRecord>,
        output: Vec<String>,
        status: EpisodeStatus,
        ended_at: Instant,
    ) -> Self {
        let duration_ms = duration_ms(record.as_ref(), ended_at);
        let (model, input) = match record {
            Some(record) => (record.model_name, record.inputs),
            None => (UNKNOWN_MODEL.to_string(), Vec::new()),
        };

        Self {
            agent_id: agent_id.into(),
            task: task_prefix(input.first().map(String::as_str).unwrap_or_default()),
            steps: vec![Step {
                kind: StepKind::LlmCall,
                model,
                input,
                output,
                duration_ms,
            }],
            status,
        }
    }
}

/// Whole milliseconds between the call's start and `ended_at`, never negative
pub fn duration_ms(record: Option<&CallRecord>, ended_at: Instant) -> u64 {
    record
        .map(|r| {
            let elapsed = ended_at.saturating_duration_since(r.started_at);
            (elapsed.as_secs_f64() * 1000.0).round() as u64
        })
        .unwrap_or(0)
}

/// First `TASK_PREFIX_CHARS` characters (not bytes) of `input`
pub fn task_prefix(input: &str) -> String {
    input.chars().take(TASK_PREFIX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_missing_record_yields_zero_duration_and_unknown_model() {
        let episode = Episode::from_call(
            "langchain",
            None,
            vec!["hello".into()],
            EpisodeStatus::Completed,
            Instant::now(),
        );

        assert_eq!(episode.task, "");
        assert_eq!(episode.steps.len(), 1);
        assert_eq!(episode.steps[0].model, UNKNOWN_MODEL);
        assert!(episode.steps[0].input.is_empty());
        assert_eq!(episode.steps[0].duration_ms, 0);
    }

    #[test]
    fn test_end_before_start_clamps_to_zero() {
        let record = CallRecord::new("gpt-4o", vec!["hi".into()]);
        let earlier = record
            .started_at
            .checked_sub(Duration::from_millis(50))
            .unwrap_or(record.started_at);
        assert_eq!(duration_ms(Some(&record), earlier), 0);
    }

    #[test]
    fn test_duration_is_rounded_to_whole_millis() {
        let record = CallRecord::new("gpt-4o", vec![]);
        let ended = record.started_at + Duration::from_micros(1_600);
        assert_eq!(duration_ms(Some(&record), ended), 2);
    }

    #[test]
    fn test_task_is_truncated_on_char_boundary() {
        let long: String = "é".repeat(TASK_PREFIX_CHARS + 10);
        let record = CallRecord::new("gpt-4o", vec![long]);
        let episode = Episode::from_call(
            "langchain",
            Some(record),
            vec![],
            EpisodeStatus::Completed,
            Instant::now(),
        );
        assert_eq!(episode.task.chars().count(), TASK_PREFIX_CHARS);
    }

    #[test]
    fn test_wire_shape() {
        let record = CallRecord::new("gpt-4o", vec!["hi".into()]);
        let episode = Episode::from_call(
            "langchain",
            Some(record),
            vec!["hello".into()],
            EpisodeStatus::Completed,
            Instant::now(),
        );

        let json = serde_json::to_value(&episode).unwrap();
        assert_eq!(json["agent_id"], "langchain");
        assert_eq!(json["task"], "hi");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["steps"][0]["type"], "llm_call");
        assert_eq!(json["steps"][0]["model"], "gpt-4o");
        assert_eq!(json["steps"][0]["input"], serde_json::json!(["hi"]));
        assert_eq!(json["steps"][0]["output"], serde_json::json!(["hello"]));
        assert!(json["steps"][0]["duration_ms"].is_u64());
    }
}
