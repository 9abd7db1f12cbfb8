//! AIR Domain Library
//!
//! Core types and interfaces for recording every LLM call an agent makes
//! through the AIR Blackbox gateway.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): Pure entities and errors
//!   - `entities/`: CallRecord, Episode, Step, ChatMessage
//!   - `errors/`: `AirError`
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `endpoint`: capability traits for redirectable provider clients
//!   - `episode_sink`: where finished episodes are delivered
//!   - `callbacks`: start/end/error lifecycle hooks of agent frameworks
//!   - `completion`: type-tolerant access to completion payloads
//!
//! - **Services** (`services/`): The interception and correlation layer
//!   - `redirector`: point an existing client at the gateway
//!   - `correlator`: in-flight call table keyed by call id
//!   - `episode_reporter`: assemble and deliver episodes, best effort
//!
//! # Usage
//!
//! ```rust,ignore
//! use air::{Correlator, EpisodeReporter};
//!
//! let correlator = Arc::new(Correlator::new());
//! let reporter = EpisodeReporter::new(correlator.clone(), sink, "langchain");
//! correlator.begin("r1", "gpt-4o", vec!["hi".into()]);
//! reporter.report(&"r1".into(), &result);
//! ```

pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types
pub use domain::{
    AirError, CallId, CallRecord, ChatMessage, Episode, EpisodeStatus, MessageRole, Step,
    StepKind, TASK_PREFIX_CHARS, UNKNOWN_MODEL,
};
pub use ports::{
    model_name_from_serialized, ClientShape, CompletionPayload, EpisodeSink, Generation,
    HasEndpoint, LlmCallbackHandler, LlmResult, ProviderClient,
};
pub use services::{
    gateway_v1_url, redirect, Correlator, EpisodeReporter, DEFAULT_DELIVERY_TIMEOUT,
    DEFAULT_MAX_IN_FLIGHT,
};
