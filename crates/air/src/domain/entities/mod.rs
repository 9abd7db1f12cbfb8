//! Domain Entities
//!
//! - CallRecord: start-time state of an in-flight LLM call
//! - Episode: one logical unit of agent work, as sent to the gateway
//! - ChatMessage: a message in an OpenAI-compatible conversation

mod call_record;
mod episode;
mod message;

pub use call_record::*;
pub use episode::*;
pub use message::*;
