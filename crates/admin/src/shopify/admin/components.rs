//! Component lookups behind the product and variant configuration blocks.

use tracing::instrument;

use product_customization_core::{ProductId, VariantId};

use super::{
    AdminClient, AdminShopifyError,
    conversions::{convert_product_components, convert_variant_components},
    queries::{
        GetProductComponents, GetProductVariantComponents, get_product_components,
        get_product_variant_components,
    },
};
use crate::shopify::types::ProductComponents;

impl AdminClient {
    /// Get a product's bundle components (first 100).
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::NotFound` if the product does not exist,
    /// or an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product_components(
        &self,
        id: &ProductId,
    ) -> Result<ProductComponents, AdminShopifyError> {
        let variables = get_product_components::Variables { id: id.to_string() };

        let response = self.execute::<GetProductComponents>(variables).await?;

        response
            .product
            .map(convert_product_components)
            .ok_or_else(|| AdminShopifyError::NotFound(id.to_string()))
    }

    /// Get a variant's component variants (first 100).
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::NotFound` if the variant does not exist,
    /// or an error if the API request fails.
    #[instrument(skip(self), fields(variant_id = %id))]
    pub async fn get_variant_components(
        &self,
        id: &VariantId,
    ) -> Result<ProductComponents, AdminShopifyError> {
        let variables = get_product_variant_components::Variables { id: id.to_string() };

        let response = self.execute::<GetProductVariantComponents>(variables).await?;

        response
            .product_variant
            .map(convert_variant_components)
            .ok_or_else(|| AdminShopifyError::NotFound(id.to_string()))
    }
}
