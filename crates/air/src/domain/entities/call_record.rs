//! CallRecord - start-time state of an in-flight LLM call
//!
//! Pure domain entity without infrastructure dependencies.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Model name used when the framework does not tell us which model it called
pub const UNKNOWN_MODEL: &str = "unknown";

/// Opaque call identifier supplied by the calling framework.
///
/// Only ever compared for equality; the contents are never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh random identifier
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CallId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CallId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<Uuid> for CallId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

/// CallRecord - what we knew when a call started
///
/// Created on a start event and consumed (removed) on the matching end or
/// error event. Never mutated in between.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub started_at: Instant,
    pub model_name: String,
    pub inputs: Vec<String>,
}

impl CallRecord {
    /// Create a record stamped with the current instant
    pub fn new(model_name: impl Into<String>, inputs: Vec<String>) -> Self {
        let model_name = model_name.into();
        Self {
            started_at: Instant::now(),
            model_name: if model_name.is_empty() {
                UNKNOWN_MODEL.to_string()
            } else {
                model_name
            },
            inputs,
        }
    }

    /// Time since the call started
    pub fn age(&self) -> Duration {
        self.started_at.elapsed()
    }
}
