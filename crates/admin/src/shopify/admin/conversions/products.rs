//! Product type conversion functions.

use chrono::{DateTime, Utc};

use product_customization_core::{ListPrice, ProductId, ProductStatus, VariantId};

use crate::shopify::AdminShopifyError;
use crate::shopify::types::{CreatedProduct, Image, ProductListItem, StatusUpdate, VariantPriceUpdate};

use super::super::queries::{get_products, product_create, product_update, product_variants_bulk_update};

// =============================================================================
// Status conversions
// =============================================================================

/// Map a listed product's status onto ACTIVE/DRAFT.
///
/// Returns `None` for statuses the list does not show.
fn convert_list_status(status: &get_products::ProductStatus) -> Option<ProductStatus> {
    match status {
        get_products::ProductStatus::ACTIVE => Some(ProductStatus::Active),
        get_products::ProductStatus::DRAFT => Some(ProductStatus::Draft),
        get_products::ProductStatus::ARCHIVED
        | get_products::ProductStatus::UNLISTED
        | get_products::ProductStatus::Other(_) => None,
    }
}

fn convert_created_status(status: &product_create::ProductStatus) -> Option<ProductStatus> {
    match status {
        product_create::ProductStatus::ACTIVE => Some(ProductStatus::Active),
        product_create::ProductStatus::DRAFT => Some(ProductStatus::Draft),
        product_create::ProductStatus::ARCHIVED
        | product_create::ProductStatus::UNLISTED
        | product_create::ProductStatus::Other(_) => None,
    }
}

fn convert_updated_status(status: &product_update::ProductStatus) -> Option<ProductStatus> {
    match status {
        product_update::ProductStatus::ACTIVE => Some(ProductStatus::Active),
        product_update::ProductStatus::DRAFT => Some(ProductStatus::Draft),
        product_update::ProductStatus::ARCHIVED
        | product_update::ProductStatus::UNLISTED
        | product_update::ProductStatus::Other(_) => None,
    }
}

/// Map a list-view status onto the `productUpdate` input enum.
pub const fn status_to_upstream(status: ProductStatus) -> product_update::ProductStatus {
    match status {
        ProductStatus::Active => product_update::ProductStatus::ACTIVE,
        ProductStatus::Draft => product_update::ProductStatus::DRAFT,
    }
}

// =============================================================================
// Shared product selection
// =============================================================================

/// The list-view selection, common to `GetProducts` and `productCreate`.
struct ProductFields {
    id: String,
    title: String,
    handle: String,
    status: Option<ProductStatus>,
    created_at: DateTime<Utc>,
    featured_image: Option<Image>,
    first_price: Option<String>,
}

impl ProductFields {
    /// Returns `Ok(None)` when the status is outside ACTIVE/DRAFT.
    fn into_list_item(self) -> Result<Option<ProductListItem>, AdminShopifyError> {
        let Some(status) = self.status else {
            return Ok(None);
        };

        Ok(Some(ProductListItem {
            id: ProductId::new(self.id),
            title: self.title,
            handle: self.handle,
            status,
            price: parse_price(self.first_price.as_deref())?,
            created_at: self.created_at,
            featured_image: self.featured_image,
        }))
    }
}

fn parse_price(price: Option<&str>) -> Result<ListPrice, AdminShopifyError> {
    ListPrice::from_first_variant(price)
        .map_err(|e| AdminShopifyError::InvalidResponse(e.to_string()))
}

// =============================================================================
// GetProducts conversions
// =============================================================================

/// Normalize one product node into a list row.
///
/// Returns `Ok(None)` when the product's status is outside ACTIVE/DRAFT.
///
/// # Errors
///
/// Returns `AdminShopifyError::InvalidResponse` if the variant price is not a decimal.
pub fn convert_product_node(
    node: get_products::GetProductsProductsEdgesNode,
) -> Result<Option<ProductListItem>, AdminShopifyError> {
    ProductFields {
        status: convert_list_status(&node.status),
        first_price: node.variants.edges.into_iter().next().map(|edge| edge.node.price),
        featured_image: node.featured_image.map(|img| Image {
            url: img.url,
            alt_text: img.alt_text,
        }),
        id: node.id,
        title: node.title,
        handle: node.handle,
        created_at: node.created_at,
    }
    .into_list_item()
}

/// Normalize a `products` connection into list rows, in upstream order.
///
/// # Errors
///
/// Returns `AdminShopifyError::InvalidResponse` if any row is malformed.
pub fn convert_product_connection(
    conn: get_products::GetProductsProducts,
) -> Result<Vec<ProductListItem>, AdminShopifyError> {
    let mut products = Vec::with_capacity(conn.edges.len());

    for edge in conn.edges {
        let id = edge.node.id.clone();
        let status = edge.node.status.clone();
        match convert_product_node(edge.node)? {
            Some(product) => products.push(product),
            None => tracing::warn!(product_id = %id, ?status, "Skipping product outside ACTIVE/DRAFT"),
        }
    }

    Ok(products)
}

// =============================================================================
// Mutation payload conversions
// =============================================================================

/// Convert the product returned by `productCreate`.
///
/// # Errors
///
/// Returns `AdminShopifyError::InvalidResponse` if the created product has an
/// unexpected status or a malformed price.
pub fn convert_created_product(
    product: product_create::ProductCreateProductCreateProduct,
) -> Result<CreatedProduct, AdminShopifyError> {
    let upstream_status = product.status.clone();
    let first_variant = product.variants.edges.into_iter().next().map(|edge| edge.node);
    let default_variant_id = first_variant
        .as_ref()
        .map(|variant| VariantId::new(variant.id.clone()));

    let fields = ProductFields {
        status: convert_created_status(&product.status),
        first_price: first_variant.map(|variant| variant.price),
        featured_image: product.featured_image.map(|img| Image {
            url: img.url,
            alt_text: img.alt_text,
        }),
        id: product.id,
        title: product.title,
        handle: product.handle,
        created_at: product.created_at,
    };

    let product = fields.into_list_item()?.ok_or_else(|| {
        AdminShopifyError::InvalidResponse(format!("created product has status {upstream_status:?}"))
    })?;

    Ok(CreatedProduct {
        product,
        default_variant_id,
    })
}

/// Convert the product returned by `productUpdate`.
///
/// # Errors
///
/// Returns `AdminShopifyError::InvalidResponse` if the status is outside ACTIVE/DRAFT.
pub fn convert_status_update(
    product: product_update::ProductUpdateProductUpdateProduct,
) -> Result<StatusUpdate, AdminShopifyError> {
    let status = convert_updated_status(&product.status).ok_or_else(|| {
        AdminShopifyError::InvalidResponse(format!(
            "updated product has status {:?}",
            product.status
        ))
    })?;

    Ok(StatusUpdate {
        id: ProductId::new(product.id),
        status,
    })
}

/// Convert a variant returned by `productVariantsBulkUpdate`.
///
/// # Errors
///
/// Returns `AdminShopifyError::InvalidResponse` if the price is not a decimal.
pub fn convert_variant_price(
    variant: product_variants_bulk_update::ProductVariantsBulkUpdateProductVariantsBulkUpdateProductVariants,
) -> Result<VariantPriceUpdate, AdminShopifyError> {
    Ok(VariantPriceUpdate {
        id: VariantId::new(variant.id),
        price: parse_price(Some(&variant.price))?,
    })
}
