//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::services::ProductListController;
use crate::shopify::AdminClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The product list controller
/// lives here, so its per-row state spans requests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    shopify: AdminClient,
    products: ProductListController<AdminClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Admin configuration
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let shopify = AdminClient::new(&config.shopify);
        let products = ProductListController::new(
            shopify.clone(),
            config.shopify.store.clone(),
            config.page_size,
        )
        .with_sort_order(config.sort_order);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                shopify,
                products,
            }),
        }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get the Shopify Admin API client.
    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify
    }

    /// Get the product list controller.
    #[must_use]
    pub fn products(&self) -> &ProductListController<AdminClient> {
        &self.inner.products
    }
}
