//! Error types for the storefront extension layer.
//!
//! Three layers of failure exist and each has its own type:
//!
//! - [`TransportError`] is produced by [`crate::StoreClient`] implementations.
//!   It never carries transport-library types, so the port stays I/O free.
//! - [`ClientError`] is what every endpoint function returns. Transport
//!   failures are wrapped transparently and surface unchanged.
//! - [`RegistryError`] is produced while assembling or querying the
//!   [`crate::Extensions`] aggregate.
//!
//! No error here carries a retry hint: endpoint calls are single-shot.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Port-level errors
// ---------------------------------------------------------------------------

/// Failure reported by a base client while issuing a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request never produced an HTTP response (DNS, connect, TLS, I/O).
    #[error("Network error: {message}")]
    Network {
        /// Description of the underlying failure.
        message: String,
    },

    /// The remote API answered with a non-success status code.
    #[error("Remote API returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body, possibly empty.
        body: String,
    },

    /// The request URL could not be built from the base URL and path.
    #[error("Invalid request URL '{url}': {message}")]
    InvalidUrl {
        /// The offending URL or path.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("Response body is not valid JSON: {message}")]
    Decode {
        /// Parser error message.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Endpoint-level errors
// ---------------------------------------------------------------------------

/// Failure of a single endpoint call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The base client failed. Passed through unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The endpoint input could not be serialised into a query or body.
    #[error("Failed to encode request for '{path}': {message}")]
    Encode {
        /// Request path the input was destined for.
        path: String,
        /// Serialiser error message.
        message: String,
    },

    /// The response JSON did not match the endpoint's declared output shape.
    #[error("Failed to decode response from '{path}': {message}")]
    Decode {
        /// Request path the response came from.
        path: String,
        /// Deserialiser error message.
        message: String,
    },

    /// The auth-header accessor failed; no request was issued.
    #[error("Auth header provider failed: {message}")]
    Auth {
        /// Description supplied by the provider.
        message: String,
    },

    /// Required client configuration is missing; no request was issued.
    ///
    /// Produced by: the direct review-image upload when the base URL or the
    /// publishable key is absent.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the missing or invalid setting.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Registry errors
// ---------------------------------------------------------------------------

/// Failure while building or querying the extension registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two plugins with the same name were registered under
    /// [`crate::DuplicatePolicy::Reject`].
    #[error("Plugin '{name}' is registered more than once")]
    DuplicatePlugin {
        /// The colliding plugin name.
        name: &'static str,
    },

    /// A namespace was requested for a plugin that was never registered, or
    /// whose registered endpoints have a different type.
    #[error("Plugin '{name}' is not registered")]
    NotRegistered {
        /// The requested plugin name.
        name: &'static str,
    },
}
