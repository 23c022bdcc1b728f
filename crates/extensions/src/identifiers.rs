//! Newtype identifiers for storefront resources.
//!
//! Every remote resource that is addressed by id gets a distinct newtype so a
//! [`WishlistId`] can never be passed where a [`WishlistItemId`] is expected,
//! even though both are opaque strings on the wire.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Wishlist resources
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies a customer or guest wishlist (e.g. `"wl_01H..."`).
    WishlistId
}

string_id! {
    /// Identifies one line item inside a wishlist.
    WishlistItemId
}

// ---------------------------------------------------------------------------
// Catalog and commerce resources
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies a product in the storefront catalog.
    ProductId
}

string_id! {
    /// Identifies a purchasable variant of a product.
    ProductVariantId
}

string_id! {
    /// Identifies the sales channel a wishlist belongs to.
    SalesChannelId
}

string_id! {
    /// Identifies a customer account.
    CustomerId
}

string_id! {
    /// Identifies a product review.
    ReviewId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_values() {
        assert!(WishlistId::new("").is_none());
        assert_eq!(WishlistId::new("wl_1").unwrap().as_str(), "wl_1");
    }

    #[test]
    fn test_identifiers_serialize_as_plain_strings() {
        let id = ProductId::new("prod_1").unwrap();
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("prod_1"));

        let back: ProductId = serde_json::from_value(serde_json::json!("prod_1")).unwrap();
        assert_eq!(back, id);
        assert_eq!(back.to_string(), "prod_1");
    }
}
