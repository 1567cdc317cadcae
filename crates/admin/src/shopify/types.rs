//! Domain types for the product list.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! GraphQL response types in `admin::queries`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use product_customization_core::{ListPrice, ProductId, ProductStatus, VariantId};

/// A product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

/// One row of the product list.
///
/// A read-through projection of the upstream product: `status` and `price`
/// come from exactly one upstream record at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListItem {
    /// Product GID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL handle.
    pub handle: String,
    /// ACTIVE or DRAFT.
    pub status: ProductStatus,
    /// First variant's price, or "N/A" without a variant.
    pub price: ListPrice,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Featured image.
    pub featured_image: Option<Image>,
}

impl ProductListItem {
    /// Link to this product's page in the Shopify admin of `shop`.
    #[must_use]
    pub fn admin_url(&self, shop: &str) -> Option<String> {
        self.id
            .numeric_id()
            .map(|id| format!("https://{shop}/admin/products/{id}"))
    }

    /// Alt text for the featured image, falling back to the title.
    #[must_use]
    pub fn image_alt(&self) -> &str {
        self.featured_image
            .as_ref()
            .and_then(|img| img.alt_text.as_deref())
            .filter(|alt| !alt.is_empty())
            .unwrap_or(&self.title)
    }
}

/// Result of the `productCreate` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedProduct {
    /// The product as created, with the platform-default price.
    pub product: ProductListItem,
    /// The variant Shopify generated with the product, if any.
    pub default_variant_id: Option<VariantId>,
}

/// Confirmed `{id, status}` after a status toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Product GID.
    pub id: ProductId,
    /// New status as reported by Shopify.
    pub status: ProductStatus,
}

/// Confirmed variant price after a `productVariantsBulkUpdate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPriceUpdate {
    /// Variant GID.
    pub id: VariantId,
    /// New price.
    pub price: ListPrice,
}

/// A component product or variant, as listed by the configuration blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSummary {
    /// Component GID.
    pub id: String,
    /// Component title.
    pub title: String,
}

/// A product or variant together with its components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductComponents {
    /// Parent GID.
    pub id: String,
    /// Parent title.
    pub title: String,
    /// Components in upstream order.
    pub components: Vec<ComponentSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, alt: Option<&str>) -> ProductListItem {
        ProductListItem {
            id: ProductId::new(id),
            title: "Red Snowboard".to_string(),
            handle: "red-snowboard".to_string(),
            status: ProductStatus::Active,
            price: ListPrice::NotAvailable,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            featured_image: alt.map(|a| Image {
                url: "https://cdn.shopify.com/red.png".to_string(),
                alt_text: Some(a.to_string()),
            }),
        }
    }

    #[test]
    fn test_admin_url_uses_numeric_id() {
        let product = item("gid://shopify/Product/108828309", None);
        assert_eq!(
            product.admin_url("snow.myshopify.com").as_deref(),
            Some("https://snow.myshopify.com/admin/products/108828309")
        );
    }

    #[test]
    fn test_admin_url_requires_product_gid() {
        let product = item("not-a-gid", None);
        assert_eq!(product.admin_url("snow.myshopify.com"), None);
    }

    #[test]
    fn test_image_alt_falls_back_to_title() {
        assert_eq!(item("gid://shopify/Product/1", Some("")).image_alt(), "Red Snowboard");
        assert_eq!(item("gid://shopify/Product/1", None).image_alt(), "Red Snowboard");
        assert_eq!(item("gid://shopify/Product/1", Some("A red board")).image_alt(), "A red board");
    }
}
