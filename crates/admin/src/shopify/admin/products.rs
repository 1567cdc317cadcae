//! Product list, create and status operations for the Admin API.

use tracing::instrument;

use product_customization_core::{
    ListPrice, PageSize, ProductId, ProductSortOrder, ProductStatus, VariantId,
};

use super::{
    AdminClient, AdminShopifyError, check_user_errors,
    conversions::{
        convert_created_product, convert_product_connection, convert_status_update,
        convert_variant_price, status_to_upstream,
    },
    queries::{
        GetProducts, ProductCreate, ProductUpdate, ProductVariantsBulkUpdate, get_products,
        product_create, product_update, product_variants_bulk_update,
    },
};
use crate::shopify::types::{CreatedProduct, ProductListItem, StatusUpdate, VariantPriceUpdate};

/// Search filter restricting the list to the statuses it can display.
const LIST_STATUS_FILTER: &str = "status:active,draft";

impl AdminClient {
    /// Get one page of products for the list view.
    ///
    /// # Arguments
    ///
    /// * `page_size` - Number of products to return (at most 20)
    /// * `sort_order` - Newest first, or upstream order
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails, returns an error response,
    /// or returns a product that cannot be normalized.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        page_size: PageSize,
        sort_order: ProductSortOrder,
    ) -> Result<Vec<ProductListItem>, AdminShopifyError> {
        let (sort_key, reverse) = match sort_order {
            ProductSortOrder::CreatedAtDesc => {
                (Some(get_products::ProductSortKeys::CREATED_AT), Some(true))
            }
            ProductSortOrder::Unsorted => (None, None),
        };

        let variables = get_products::Variables {
            first: i64::from(page_size.get()),
            sort_key,
            reverse,
            query: Some(LIST_STATUS_FILTER.to_string()),
        };

        let response = self.execute::<GetProducts>(variables).await?;

        convert_product_connection(response.products)
    }

    /// Create a new product with only a title.
    ///
    /// Shopify creates the product with a single default variant, which is
    /// returned alongside the product so its price can be set afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self))]
    pub async fn create_product(&self, title: &str) -> Result<CreatedProduct, AdminShopifyError> {
        let variables = product_create::Variables {
            product: product_create::ProductCreateInput {
                title: Some(title.to_string()),
            },
        };

        let response = self.send::<ProductCreate>(variables).await?;

        // Field-level errors take precedence over top-level ones
        if let Some(payload) = response.data.as_ref().and_then(|d| d.product_create.as_ref()) {
            check_user_errors(
                payload
                    .user_errors
                    .iter()
                    .map(|e| (e.field.as_deref(), e.message.as_str())),
            )?;
        }

        match response.into_data()?.product_create.and_then(|p| p.product) {
            Some(product) => convert_created_product(product),
            None => Err(AdminShopifyError::InvalidResponse(
                "productCreate returned no product".to_string(),
            )),
        }
    }

    /// Set the price of one variant of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(product_id = %product_id, variant_id = %variant_id))]
    pub async fn update_variant_price(
        &self,
        product_id: &ProductId,
        variant_id: &VariantId,
        price: &ListPrice,
    ) -> Result<VariantPriceUpdate, AdminShopifyError> {
        let Some(amount) = price.amount() else {
            return Err(AdminShopifyError::InvalidResponse(
                "cannot set a variant price to N/A".to_string(),
            ));
        };

        let variables = product_variants_bulk_update::Variables {
            product_id: product_id.to_string(),
            variants: vec![product_variants_bulk_update::ProductVariantsBulkInput {
                id: Some(variant_id.to_string()),
                price: Some(amount.to_string()),
            }],
        };

        let response = self.send::<ProductVariantsBulkUpdate>(variables).await?;

        if let Some(payload) = response
            .data
            .as_ref()
            .and_then(|d| d.product_variants_bulk_update.as_ref())
        {
            check_user_errors(
                payload
                    .user_errors
                    .iter()
                    .map(|e| (e.field.as_deref(), e.message.as_str())),
            )?;
        }

        let variant = response
            .into_data()?
            .product_variants_bulk_update
            .and_then(|p| p.product_variants)
            .and_then(|variants| variants.into_iter().next());

        match variant {
            Some(variant) => convert_variant_price(variant),
            None => Err(AdminShopifyError::InvalidResponse(
                "productVariantsBulkUpdate returned no variant".to_string(),
            )),
        }
    }

    /// Set a product's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn update_product_status(
        &self,
        id: &ProductId,
        status: ProductStatus,
    ) -> Result<StatusUpdate, AdminShopifyError> {
        let variables = product_update::Variables {
            product: product_update::ProductUpdateInput {
                id: Some(id.to_string()),
                status: Some(status_to_upstream(status)),
            },
        };

        let response = self.send::<ProductUpdate>(variables).await?;

        if let Some(payload) = response.data.as_ref().and_then(|d| d.product_update.as_ref()) {
            check_user_errors(
                payload
                    .user_errors
                    .iter()
                    .map(|e| (e.field.as_deref(), e.message.as_str())),
            )?;
        }

        match response.into_data()?.product_update.and_then(|p| p.product) {
            Some(product) => convert_status_update(product),
            None => Err(AdminShopifyError::InvalidResponse(
                "productUpdate returned no product".to_string(),
            )),
        }
    }
}
