//! Newtype IDs for Shopify global identifiers.
//!
//! Shopify addresses every resource with a GID of the form
//! `gid://shopify/<Resource>/<number>`. Use the `define_gid!` macro to create
//! type-safe wrappers that prevent accidentally mixing IDs from different
//! resource types.

/// Macro to define a type-safe Shopify GID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Constructors: `new()`, `from_numeric()`
/// - Accessors: `as_str()`, `numeric_id()`
/// - `Display` and `From<String>` implementations
///
/// # Example
///
/// ```rust
/// # use product_customization_core::define_gid;
/// define_gid!(OrderId, "Order");
///
/// let id = OrderId::from_numeric(42);
/// assert_eq!(id.as_str(), "gid://shopify/Order/42");
/// assert_eq!(id.numeric_id(), Some("42"));
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// GID prefix shared by every ID of this resource type.
            pub const PREFIX: &'static str = concat!("gid://shopify/", $resource, "/");

            /// Wrap a GID string as returned by the Admin API.
            #[must_use]
            pub fn new(gid: impl Into<String>) -> Self {
                Self(gid.into())
            }

            /// Build a GID from the numeric part used in admin URLs.
            #[must_use]
            pub fn from_numeric(id: u64) -> Self {
                Self(format!("{}{id}", Self::PREFIX))
            }

            /// Get the full GID string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Get the trailing numeric part, if this is a well-formed GID.
            #[must_use]
            pub fn numeric_id(&self) -> Option<&str> {
                self.0
                    .strip_prefix(Self::PREFIX)
                    .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(gid: String) -> Self {
                Self(gid)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_gid!(ProductId, "Product");
define_gid!(VariantId, "ProductVariant");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_numeric_builds_gid() {
        let id = ProductId::from_numeric(1);
        assert_eq!(id.as_str(), "gid://shopify/Product/1");
        assert_eq!(id.to_string(), "gid://shopify/Product/1");
    }

    #[test]
    fn test_numeric_id_round_trips() {
        let id = ProductId::new("gid://shopify/Product/8675309");
        assert_eq!(id.numeric_id(), Some("8675309"));
    }

    #[test]
    fn test_numeric_id_rejects_other_resources() {
        let id = ProductId::new("gid://shopify/ProductVariant/12");
        assert_eq!(id.numeric_id(), None);

        let variant = VariantId::new("gid://shopify/ProductVariant/12");
        assert_eq!(variant.numeric_id(), Some("12"));
    }

    #[test]
    fn test_numeric_id_rejects_malformed() {
        assert_eq!(ProductId::new("gid://shopify/Product/").numeric_id(), None);
        assert_eq!(ProductId::new("gid://shopify/Product/12a").numeric_id(), None);
        assert_eq!(ProductId::new("12").numeric_id(), None);
    }

    #[test]
    fn test_serde_transparent() {
        let id = ProductId::from_numeric(7);
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"gid://shopify/Product/7\"");

        let parsed: Result<ProductId, _> = serde_json::from_str(&json);
        assert!(matches!(parsed, Ok(p) if p == id));
    }
}
