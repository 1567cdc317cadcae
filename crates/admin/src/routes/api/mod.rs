//! API route handlers for admin.
//!
//! JSON API endpoints for the product list and the configuration blocks.

pub mod extensions;
pub mod notifications;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(products::router())
        .merge(notifications::router())
        .merge(extensions::router())
}
