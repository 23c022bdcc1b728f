//! Errors raised while constructing an [`crate::HttpStoreClient`].
//!
//! Request-time failures are reported as [`extensions::TransportError`].

use thiserror::Error;

/// Failure to construct the HTTP base client.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The configured base URL is not usable.
    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl {
        /// The configured value.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    /// The HTTP client could not be initialised (e.g. TLS backend failure).
    #[error("Failed to initialise HTTP client: {0}")]
    Http(#[source] reqwest::Error),
}
