//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                   - Health check
//!
//! # Product page (server-rendered)
//! GET    /                                         - Product list
//! POST   /                                         - Generate a product
//! POST   /products/{id}/toggle                     - Toggle status (form)
//! POST   /notification/dismiss                     - Dismiss banner (form)
//!
//! # Product API
//! GET    /api/products                             - Refreshed list snapshot
//! POST   /api/products                             - Generate a product
//! POST   /api/products/{id}/toggle                 - Toggle status
//! GET    /api/notification                         - Current notification
//! DELETE /api/notification                         - Dismiss notification
//!
//! # Configuration blocks
//! GET    /api/extensions/products/{id}/components  - Product bundle components
//! GET    /api/extensions/variants/{id}/components  - Variant components
//! ```
//!
//! `{id}` is the numeric part of the Shopify GID.

pub mod api;
pub mod products;

use axum::{Router, routing::get};

use product_customization_core::{ProductId, VariantId};

use crate::error::AppError;
use crate::state::AppState;

/// Build the complete router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(products::router())
        .merge(api::router())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

fn numeric_id(raw: &str) -> Result<u64, AppError> {
    raw.parse::<u64>()
        .map_err(|_| AppError::BadRequest(format!("Invalid id: {raw}")))
}

/// Parse a numeric path segment into a product GID.
pub(crate) fn product_id_from_path(raw: &str) -> Result<ProductId, AppError> {
    numeric_id(raw).map(ProductId::from_numeric)
}

/// Parse a numeric path segment into a variant GID.
pub(crate) fn variant_id_from_path(raw: &str) -> Result<VariantId, AppError> {
    numeric_id(raw).map(VariantId::from_numeric)
}
