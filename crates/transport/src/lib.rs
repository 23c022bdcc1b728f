//! Storefront HTTP base client.
//!
//! Implements the [`extensions::StoreClient`] trait over HTTP using
//! [`reqwest`]. Plugins never see this crate; they only see the trait.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** URL resolution, query-string flattening, the
//! publishable-key header, JSON encoding, and status mapping all live here.
//! Non-success responses become [`extensions::TransportError::Status`] with
//! the raw body preserved; nothing is retried.
//!
//! ## Observability
//!
//! Every request runs inside a `store_request` span carrying `method`,
//! `path`, and a fresh `request_id` that is also sent as `x-request-id`.

pub mod client;
pub mod config;
pub mod error;
pub mod query;

pub use client::{HttpStoreClient, REQUEST_ID_HEADER};
pub use config::TransportConfig;
pub use error::BuildError;
pub use query::flatten_query;
