//! Core of the storefront extension layer.
//!
//! This crate defines the narrow base-client port ([`StoreClient`]), the
//! shared options every plugin receives ([`ClientOptions`]), the uniform
//! endpoint call path ([`ClientContext::send`]), and the registry that turns a
//! list of plugins into one aggregate of endpoint namespaces
//! ([`ExtensionsBuilder`] → [`Extensions`]).
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no I/O dependencies. The
//! `transport` crate supplies a real HTTP [`StoreClient`]; the `plugins`
//! crate supplies the endpoint namespaces.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype resource identifiers (`WishlistId`, `ProductId`, etc.) |
//! | [`types`] | Request value types (`HttpMethod`, `Headers`, `RequestSpec`) |
//! | [`client`] | Ports and options (`StoreClient`, `AuthHeaderProvider`, `ClientContext`) |
//! | [`registry`] | `Plugin`, `ExtensionsBuilder`, `Extensions` |
//! | [`errors`] | `TransportError`, `ClientError`, `RegistryError` |

pub mod client;
pub mod errors;
pub mod identifiers;
pub mod registry;
pub mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use client::{
    AsyncAuthFn, AuthFn, AuthHeaderProvider, BearerToken, ClientContext, ClientOptions,
    StoreClient, StoreConfig, PUBLISHABLE_KEY_HEADER,
};
pub use errors::{ClientError, RegistryError, TransportError};
pub use identifiers::{
    CustomerId, ProductId, ProductVariantId, ReviewId, SalesChannelId, WishlistId, WishlistItemId,
};
pub use registry::{DuplicatePolicy, Extensions, ExtensionsBuilder, Plugin};
pub use types::{encode_body, encode_query, Headers, HttpMethod, Query, RequestSpec};
