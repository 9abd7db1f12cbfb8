//! Redirector
//!
//! Points an already-constructed provider client at the gateway by
//! rewriting its outbound base URL in place. No network I/O happens here;
//! the effect shows up on the client's next call.

use tracing::debug;

use crate::domain::errors::AirError;
use crate::ports::endpoint::{ClientShape, ProviderClient};

/// Gateway address with the OpenAI-compatible `/v1` prefix appended
pub fn gateway_v1_url(gateway_url: &str) -> String {
    format!("{}/v1", gateway_url.trim_end_matches('/'))
}

/// Redirect `client` through the gateway at `gateway_url`.
///
/// Returns the same client, mutated. Redirecting twice simply overwrites
/// the endpoint again.
pub fn redirect<'a, C>(client: &'a mut C, gateway_url: &str) -> Result<&'a mut C, AirError>
where
    C: ProviderClient + ?Sized,
{
    if gateway_url.trim().is_empty() {
        return Err(AirError::InvalidUrl("gateway URL is empty".to_string()));
    }
    let target = gateway_v1_url(gateway_url);
    let type_name = client.type_name();

    match client.shape() {
        ClientShape::Direct(endpoint) | ClientShape::Nested(endpoint) => {
            debug!(from = %endpoint.base_url(), to = %target, "Redirecting client to gateway");
            endpoint.set_base_url(target);
        }
        ClientShape::Unsupported => {
            return Err(AirError::client_shape_unsupported(type_name));
        }
    }

    Ok(client)
}
