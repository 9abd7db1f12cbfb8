//! Services
//!
//! The interception and correlation layer.

mod correlator;
mod episode_reporter;
mod redirector;

pub use correlator::Correlator;
pub use episode_reporter::{EpisodeReporter, DEFAULT_DELIVERY_TIMEOUT, DEFAULT_MAX_IN_FLIGHT};
pub use redirector::{gateway_v1_url, redirect};
