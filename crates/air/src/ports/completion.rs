//! Completion Payload Port
//!
//! Type-tolerant access to whatever a framework hands back when an LLM call
//! finishes. Every generation becomes one output string: its text when it
//! has one, otherwise a rendering of the whole generation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Anything an end-of-call event can carry
pub trait CompletionPayload: Send + Sync {
    /// Flattened output text, one entry per generation
    fn output_texts(&self) -> Vec<String>;
}

/// One generated candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_info: Option<Value>,
}

impl Generation {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Text if present, otherwise the generation rendered as JSON
    pub fn to_output(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self)),
        }
    }
}

/// Result of an LLM call: one list of generations per prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmResult {
    pub generations: Vec<Vec<Generation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_output: Option<Value>,
}

impl LlmResult {
    /// Single-prompt result with one text generation
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            generations: vec![vec![Generation::text(text)]],
            llm_output: None,
        }
    }

    /// Build from an OpenAI-style chat completion body.
    ///
    /// Each choice becomes a generation. Choices without string content keep
    /// their message so the output can still be rendered.
    pub fn from_chat_completion(body: &Value) -> Self {
        let generations = body
            .get("choices")
            .and_then(Value::as_array)
            .map(|choices| {
                choices
                    .iter()
                    .map(|choice| {
                        let message = choice.get("message");
                        Generation {
                            text: message
                                .and_then(|m| m.get("content"))
                                .and_then(Value::as_str)
                                .map(str::to_string),
                            message: message.cloned(),
                            generation_info: choice
                                .get("finish_reason")
                                .map(|reason| serde_json::json!({ "finish_reason": reason })),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            generations: vec![generations],
            llm_output: body.get("usage").map(|usage| {
                serde_json::json!({
                    "token_usage": usage,
                    "model_name": body.get("model"),
                })
            }),
        }
    }
}

impl CompletionPayload for LlmResult {
    fn output_texts(&self) -> Vec<String> {
        self.generations
            .iter()
            .flatten()
            .map(Generation::to_output)
            .collect()
    }
}

impl CompletionPayload for Value {
    fn output_texts(&self) -> Vec<String> {
        let Some(groups) = self.get("generations").and_then(Value::as_array) else {
            return Vec::new();
        };

        groups
            .iter()
            .flat_map(|group| match group {
                Value::Array(items) => items.iter().collect::<Vec<_>>(),
                other => vec![other],
            })
            .map(|generation| match generation.get("text").and_then(Value::as_str) {
                Some(text) => text.to_string(),
                None => generation.to_string(),
            })
            .collect()
    }
}
