//! Data for the product and variant configuration blocks.
//!
//! Each block shows the components of the product or variant it is rendered
//! on. Lookups go straight to the Admin API; nothing here touches the list
//! controller.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use tracing::instrument;

use crate::{
    error::AppError,
    routes::{product_id_from_path, variant_id_from_path},
    shopify::ProductComponents,
    state::AppState,
};

/// Build the extensions API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/extensions/products/{id}/components",
            get(product_components),
        )
        .route(
            "/api/extensions/variants/{id}/components",
            get(variant_components),
        )
}

/// Components of a bundle product.
///
/// # Errors
///
/// Returns 400 for a malformed id, 404 if the product does not exist, and
/// 502 if the lookup fails.
#[instrument(skip(state))]
pub async fn product_components(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductComponents>, AppError> {
    let id = product_id_from_path(&id)?;
    let components = state.shopify().get_product_components(&id).await?;
    Ok(Json(components))
}

/// Components of a variant.
///
/// # Errors
///
/// Returns 400 for a malformed id, 404 if the variant does not exist, and
/// 502 if the lookup fails.
#[instrument(skip(state))]
pub async fn variant_components(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductComponents>, AppError> {
    let id = variant_id_from_path(&id)?;
    let components = state.shopify().get_variant_components(&id).await?;
    Ok(Json(components))
}
