//! Redirectable Endpoint Port
//!
//! Capability interfaces for provider clients whose outbound endpoint can be
//! rewritten after construction. A client declares its shape once, in its
//! `ProviderClient` impl, instead of being probed for fields at runtime.

/// Something that owns a settable outbound base URL
pub trait HasEndpoint {
    /// Current base URL
    fn base_url(&self) -> &str;

    /// Replace the base URL used by subsequent calls
    fn set_base_url(&mut self, url: String);
}

/// Where a client keeps its outbound endpoint
pub enum ClientShape<'a> {
    /// The client itself owns the endpoint
    Direct(&'a mut dyn HasEndpoint),
    /// The endpoint lives on an internal transport object one level down
    Nested(&'a mut dyn HasEndpoint),
    /// No redirectable endpoint
    Unsupported,
}

impl ClientShape<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientShape::Direct(_) => "direct",
            ClientShape::Nested(_) => "nested",
            ClientShape::Unsupported => "unsupported",
        }
    }
}

/// Provider client whose endpoint can be redirected to the gateway
///
/// # Example
///
/// ```rust,ignore
/// impl ProviderClient for ChatModel {
///     fn shape(&mut self) -> ClientShape<'_> {
///         ClientShape::Nested(&mut self.client)
///     }
/// }
/// ```
pub trait ProviderClient {
    /// Expose the endpoint capability of this client
    fn shape(&mut self) -> ClientShape<'_> {
        ClientShape::Unsupported
    }

    /// Concrete type name, resolved per impl so it survives `dyn ProviderClient`
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
