//! Product query and mutation services.
//!
//! Wraps a [`ProductCatalog`] with the list page's semantics:
//!
//! - `fetch_products` normalizes one page, newest first
//! - `create_random_product` runs the two-step create-then-price flow and
//!   reports partial failures distinctly
//! - `toggle_product_status` flips ACTIVE and DRAFT
//!
//! Every upstream failure is classified into a [`ProductServiceError`]
//! carrying the most specific upstream message available.

use rand::Rng;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};

use product_customization_core::{
    ListPrice, PageSize, ProductId, ProductSortOrder, ProductStatus,
};

use crate::shopify::{AdminShopifyError, ProductListItem, StatusUpdate};

use super::ProductCatalog;

/// Colors the demo product title is drawn from.
pub const SNOWBOARD_COLORS: [&str; 4] = ["Red", "Orange", "Yellow", "Green"];

/// Price given to a demo product's first variant (`100.00`).
pub const DEMO_VARIANT_PRICE: ListPrice = ListPrice::Amount(Decimal::from_parts(10000, 0, 0, false, 2));

/// Shown when a status update fails without any upstream detail.
pub const TOGGLE_FALLBACK_MESSAGE: &str = "Failed to update product.";

const QUERY_FALLBACK_MESSAGE: &str = "Failed to load products.";
const CREATE_FALLBACK_MESSAGE: &str = "Failed to create product.";
const PRICE_FALLBACK_MESSAGE: &str = "Failed to set product price.";

/// Product service errors.
///
/// The message is the upstream detail itself, suitable for showing to the
/// merchant as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductServiceError {
    /// The read path failed.
    #[error("{0}")]
    UpstreamQuery(String),

    /// A write failed.
    #[error("{0}")]
    UpstreamMutation(String),
}

impl ProductServiceError {
    /// The user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::UpstreamQuery(message) | Self::UpstreamMutation(message) => message,
        }
    }

    fn query(err: &AdminShopifyError) -> Self {
        Self::UpstreamQuery(
            err.upstream_message()
                .unwrap_or_else(|| QUERY_FALLBACK_MESSAGE.to_string()),
        )
    }

    fn mutation(err: &AdminShopifyError, fallback: &str) -> Self {
        Self::UpstreamMutation(err.upstream_message().unwrap_or_else(|| fallback.to_string()))
    }
}

/// Outcome of the two-step create flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Product created and priced.
    Succeeded(ProductListItem),
    /// Product created, but setting its price failed. The product keeps the
    /// platform-default price.
    PartialFailure {
        /// The product as created.
        product: ProductListItem,
        /// Why the price step failed.
        error: ProductServiceError,
    },
    /// Nothing was created.
    Failed(ProductServiceError),
}

impl CreateOutcome {
    /// The product that now exists upstream, if any.
    #[must_use]
    pub const fn product(&self) -> Option<&ProductListItem> {
        match self {
            Self::Succeeded(product) | Self::PartialFailure { product, .. } => Some(product),
            Self::Failed(_) => None,
        }
    }
}

/// Pick a demo title such as `"Green Snowboard"`.
pub fn random_title<R: Rng + ?Sized>(rng: &mut R) -> String {
    let color = SNOWBOARD_COLORS.choose(rng).copied().unwrap_or("Red");
    format!("{color} Snowboard")
}

/// Product query and mutation service.
#[derive(Debug)]
pub struct ProductService<C> {
    catalog: C,
}

impl<C: ProductCatalog> ProductService<C> {
    /// Create a service over a catalog.
    #[must_use]
    pub const fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// The underlying catalog.
    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Fetch one page of products for the list.
    ///
    /// With [`ProductSortOrder::CreatedAtDesc`] the result is ordered newest
    /// first (stable for equal timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`ProductServiceError::UpstreamQuery`] if the request fails or
    /// the response cannot be normalized.
    #[instrument(skip(self))]
    pub async fn fetch_products(
        &self,
        page_size: PageSize,
        sort_order: ProductSortOrder,
    ) -> Result<Vec<ProductListItem>, ProductServiceError> {
        let mut products = self
            .catalog
            .list_products(page_size, sort_order)
            .await
            .map_err(|e| {
                warn!(error = %e, "Product query failed");
                ProductServiceError::query(&e)
            })?;

        if sort_order == ProductSortOrder::CreatedAtDesc {
            products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }

        Ok(products)
    }

    /// Create a demo product with a random color in its title.
    pub async fn create_random_product(&self) -> CreateOutcome {
        let title = random_title(&mut rand::rng());
        self.create_product_titled(&title).await
    }

    /// Create a product and price its first variant at [`DEMO_VARIANT_PRICE`].
    ///
    /// The two upstream calls are not atomic: if the price step fails the
    /// product still exists, reported as [`CreateOutcome::PartialFailure`].
    #[instrument(skip(self))]
    pub async fn create_product_titled(&self, title: &str) -> CreateOutcome {
        let created = match self.catalog.create_product(title).await {
            Ok(created) => created,
            Err(e) => {
                warn!(error = %e, "Product create failed");
                return CreateOutcome::Failed(ProductServiceError::mutation(
                    &e,
                    CREATE_FALLBACK_MESSAGE,
                ));
            }
        };

        let mut product = created.product;
        let Some(variant_id) = created.default_variant_id else {
            warn!(product_id = %product.id, "Created product has no variant to price");
            return CreateOutcome::PartialFailure {
                product,
                error: ProductServiceError::UpstreamMutation(
                    "Product has no variant to price.".to_string(),
                ),
            };
        };

        match self
            .catalog
            .set_variant_price(&product.id, &variant_id, &DEMO_VARIANT_PRICE)
            .await
        {
            Ok(update) => {
                product.price = update.price;
                info!(product_id = %product.id, title = %product.title, "Product created");
                CreateOutcome::Succeeded(product)
            }
            Err(e) => {
                warn!(product_id = %product.id, error = %e, "Product created but price update failed");
                CreateOutcome::PartialFailure {
                    product,
                    error: ProductServiceError::mutation(&e, PRICE_FALLBACK_MESSAGE),
                }
            }
        }
    }

    /// Flip a product between ACTIVE and DRAFT.
    ///
    /// # Errors
    ///
    /// Returns [`ProductServiceError::UpstreamMutation`] with the upstream
    /// field-level message, else the generic upstream message, else
    /// [`TOGGLE_FALLBACK_MESSAGE`].
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn toggle_product_status(
        &self,
        id: &ProductId,
        current_status: ProductStatus,
    ) -> Result<StatusUpdate, ProductServiceError> {
        let new_status = current_status.toggled();

        let update = self
            .catalog
            .set_product_status(id, new_status)
            .await
            .map_err(|e| {
                warn!(error = %e, "Product status update failed");
                ProductServiceError::mutation(&e, TOGGLE_FALLBACK_MESSAGE)
            })?;

        info!(from = %current_status, to = %update.status, "Product status updated");
        Ok(update)
    }
}
