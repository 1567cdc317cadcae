//! The upstream product catalog as seen by the product services.
//!
//! `ProductCatalog` is the seam between the services and the Admin API:
//! `AdminClient` implements it over GraphQL, and tests substitute a scripted
//! double.

use std::future::Future;

use product_customization_core::{
    ListPrice, PageSize, ProductId, ProductSortOrder, ProductStatus, VariantId,
};

use crate::shopify::{
    AdminClient, AdminShopifyError, CreatedProduct, ProductListItem, StatusUpdate,
    VariantPriceUpdate,
};

/// Read and write access to the shop's products.
pub trait ProductCatalog: Send + Sync {
    /// Fetch one normalized page of products.
    fn list_products(
        &self,
        page_size: PageSize,
        sort_order: ProductSortOrder,
    ) -> impl Future<Output = Result<Vec<ProductListItem>, AdminShopifyError>> + Send;

    /// Create a product with the given title.
    fn create_product(
        &self,
        title: &str,
    ) -> impl Future<Output = Result<CreatedProduct, AdminShopifyError>> + Send;

    /// Set the price of one of a product's variants.
    fn set_variant_price(
        &self,
        product_id: &ProductId,
        variant_id: &VariantId,
        price: &ListPrice,
    ) -> impl Future<Output = Result<VariantPriceUpdate, AdminShopifyError>> + Send;

    /// Set a product's status.
    fn set_product_status(
        &self,
        id: &ProductId,
        status: ProductStatus,
    ) -> impl Future<Output = Result<StatusUpdate, AdminShopifyError>> + Send;
}

impl ProductCatalog for AdminClient {
    async fn list_products(
        &self,
        page_size: PageSize,
        sort_order: ProductSortOrder,
    ) -> Result<Vec<ProductListItem>, AdminShopifyError> {
        self.get_products(page_size, sort_order).await
    }

    async fn create_product(&self, title: &str) -> Result<CreatedProduct, AdminShopifyError> {
        Self::create_product(self, title).await
    }

    async fn set_variant_price(
        &self,
        product_id: &ProductId,
        variant_id: &VariantId,
        price: &ListPrice,
    ) -> Result<VariantPriceUpdate, AdminShopifyError> {
        self.update_variant_price(product_id, variant_id, price).await
    }

    async fn set_product_status(
        &self,
        id: &ProductId,
        status: ProductStatus,
    ) -> Result<StatusUpdate, AdminShopifyError> {
        self.update_product_status(id, status).await
    }
}
