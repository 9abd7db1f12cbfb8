//! Domain Errors
//!
//! Error types for redirection, gateway calls and episode delivery.

use thiserror::Error;

/// AIR errors
#[derive(Debug, Error)]
pub enum AirError {
    /// The client exposes neither a direct nor a nested endpoint field
    #[error("Cannot redirect {type_name}: no settable base URL on the client or its transport")]
    ClientShapeUnsupported { type_name: String },

    /// Non-2xx response from a synchronous gateway call
    #[error("Gateway request failed ({status}): {body}")]
    GatewayRequest { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Episode delivery failed; only ever logged, never surfaced to callers
    #[error("Episode delivery failed: {0}")]
    Delivery(String),
}

impl AirError {
    pub fn client_shape_unsupported<T: AsRef<str>>(type_name: T) -> Self {
        Self::ClientShapeUnsupported {
            type_name: type_name.as_ref().to_string(),
        }
    }

    pub fn gateway_request(status: u16, body: impl Into<String>) -> Self {
        Self::GatewayRequest {
            status,
            body: body.into(),
        }
    }

    /// HTTP status carried by a gateway error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::GatewayRequest { status, .. } => Some(*status),
            _ => None,
        }
    }
}
