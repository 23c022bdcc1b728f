//! Storefront extension plugins.
//!
//! Each module defines one [`Plugin`](extensions::Plugin) and the typed
//! endpoint namespace it contributes to the registry:
//!
//! | Module | Namespace | Endpoints |
//! |--------|-----------|-----------|
//! | [`wishlist`] | `wishlist` | Wishlist CRUD, sharing, transfer, items |
//! | [`reviews`] | `reviews` | Reviews, rating aggregates, image upload |
//! | [`paypal`] | `paypal` | PayPal client token |
//! | [`econt`] | `econt` | Address validation, cities, quarters, offices |
//!
//! ## Architectural Layer
//!
//! **Adapter layer.** Plugins turn typed inputs into a
//! [`RequestSpec`](extensions::RequestSpec) and hand it to
//! [`ClientContext::send`](extensions::ClientContext::send). They hold no
//! state beyond the shared context, so every call reflects the current auth
//! headers. The review image upload is the one exception that talks HTTP
//! directly, because the base client only speaks JSON.

pub mod common;
pub mod econt;
pub mod paypal;
pub mod reviews;
pub mod wishlist;

pub use common::{PageMeta, Paginated, ResourceRef, DEFAULT_PAGE_LIMIT, DEFAULT_PAGE_OFFSET};
pub use econt::{EcontEndpoints, EcontPlugin};
pub use paypal::{PaypalEndpoints, PaypalPlugin};
pub use reviews::{ReviewsEndpoints, ReviewsPlugin};
pub use wishlist::{WishlistEndpoints, WishlistPlugin};
