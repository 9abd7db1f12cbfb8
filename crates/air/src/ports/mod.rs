//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the correlation layer
//! interacts with provider clients, agent frameworks and the gateway.
//!
//! Implementations of these traits live in the adapter and integration crates.

pub mod callbacks;
pub mod completion;
pub mod endpoint;
pub mod episode_sink;

// Re-exports
pub use callbacks::*;
pub use completion::*;
pub use endpoint::*;
pub use episode_sink::*;
