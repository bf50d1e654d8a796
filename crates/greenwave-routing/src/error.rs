//! Routing failure taxonomy.
//!
//! An empty result set is deliberately its own variant: the provider
//! answering "no route exists" is a normal outcome and must stay
//! distinguishable from the transport and decoding failures around it.

/// Failures fetching or scoring candidate routes.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// The provider answered cleanly with zero candidate routes.
    #[error("no routes found between the requested coordinates")]
    NoRoutes,

    /// The provider could not be reached or answered with an error status.
    #[error("route provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider did not answer within the configured budget.
    #[error("route provider timed out after {timeout_ms} ms")]
    ProviderTimeout {
        /// The per-request budget that expired.
        timeout_ms: u64,
    },

    /// The provider answered with a body that does not decode.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}
