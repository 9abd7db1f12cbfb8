//! LLM Callback Port
//!
//! Lifecycle hooks for agent frameworks that report an LLM call as separate
//! start / end / error events instead of one blocking call.
//!
//! Hooks are synchronous and must return quickly: they run inline with the
//! framework's own call path.

use serde_json::Value;

use crate::domain::entities::{CallId, UNKNOWN_MODEL};
use crate::ports::completion::CompletionPayload;

/// Callback handler attached to an LLM
///
/// # Example
///
/// ```rust,ignore
/// use air::LlmCallbackHandler;
///
/// struct Printer;
///
/// impl LlmCallbackHandler for Printer {
///     fn name(&self) -> &str { "printer" }
///     fn on_llm_start(&self, run_id: &CallId, _: &Value, prompts: &[String]) {
///         println!("{run_id} started with {} prompts", prompts.len());
///     }
///     // ...
/// }
/// ```
pub trait LlmCallbackHandler: Send + Sync {
    /// Handler name (e.g., "air")
    fn name(&self) -> &str;

    /// An LLM call is about to be sent
    ///
    /// `serialized` describes the calling model; `kwargs.model_name` is read
    /// when present.
    fn on_llm_start(&self, run_id: &CallId, serialized: &Value, prompts: &[String]);

    /// The call finished successfully
    fn on_llm_end(&self, run_id: &CallId, response: &dyn CompletionPayload);

    /// The call failed
    fn on_llm_error(&self, run_id: &CallId, error: &dyn std::error::Error);
}

/// Model name from a serialized model description, or `"unknown"`
pub fn model_name_from_serialized(serialized: &Value) -> String {
    let kwargs = serialized.get("kwargs");
    kwargs
        .and_then(|k| k.get("model_name"))
        .or_else(|| kwargs.and_then(|k| k.get("model")))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_MODEL)
        .to_string()
}
