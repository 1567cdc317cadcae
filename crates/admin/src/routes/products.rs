//! Product list page handlers.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use product_customization_core::{ListPrice, ProductStatus};

use crate::{
    error::AppError,
    filters,
    services::{Notification, NotificationKind, ProductRow, RowState},
    state::AppState,
};

use super::product_id_from_path;

/// Build the product page router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(generate))
        .route("/products/{id}/toggle", post(toggle))
        .route("/notification/dismiss", post(dismiss_notification))
}

/// Toggle form body.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub current_status: ProductStatus,
}

/// Product view for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub numeric_id: String,
    pub title: String,
    pub price: String,
    pub status: String,
    pub current_status: String,
    pub toggle_label: String,
    pub image_url: Option<String>,
    pub image_alt: String,
    pub admin_url: Option<String>,
    pub submitting: bool,
}

/// Notification banner view for templates.
#[derive(Debug, Clone)]
pub struct BannerView {
    pub content: String,
    pub tone_class: String,
}

// =============================================================================
// Type Conversions
// =============================================================================

/// Prices render as `$100.00`; a product without a variant shows `$N/A`.
fn format_price(price: ListPrice) -> String {
    format!("${price}")
}

impl From<&ProductRow> for ProductView {
    fn from(row: &ProductRow) -> Self {
        let product = &row.product;

        Self {
            numeric_id: product.id.numeric_id().unwrap_or_default().to_string(),
            title: product.title.clone(),
            price: format_price(product.price),
            status: product.status.label().to_string(),
            current_status: product.status.as_str().to_string(),
            toggle_label: format!("Set {}", product.status.toggled().label()),
            image_url: product.featured_image.as_ref().map(|img| img.url.clone()),
            image_alt: product.image_alt().to_string(),
            admin_url: row.admin_url.clone(),
            submitting: row.state == RowState::Submitting,
        }
    }
}

impl From<&Notification> for BannerView {
    fn from(notification: &Notification) -> Self {
        let tone_class = match notification.kind {
            NotificationKind::Success => "bg-green-50 text-green-800",
            NotificationKind::PartialFailure => "bg-yellow-50 text-yellow-800",
            NotificationKind::Failure => "bg-red-50 text-red-800",
        };

        Self {
            content: notification.content.clone(),
            tone_class: tone_class.to_string(),
        }
    }
}

/// Products list page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub total: usize,
    pub creating: bool,
    pub notification: Option<BannerView>,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Products list page handler.
///
/// Every page load re-fetches the list. A failed fetch renders the error
/// state with an empty list.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let controller = state.products();

    if let Err(e) = controller.refresh().await {
        tracing::error!("Failed to fetch products: {e}");
    }
    let snapshot = controller.snapshot().await;

    let template = ProductsIndexTemplate {
        products: snapshot.products.iter().map(ProductView::from).collect(),
        total: snapshot.total,
        creating: snapshot.creating,
        notification: snapshot.notification.as_ref().map(BannerView::from),
        error: snapshot.error,
    };

    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// "Generate a Product" form handler.
#[instrument(skip(state))]
pub async fn generate(State(state): State<AppState>) -> Redirect {
    if let Err(e) = state.products().create_random_product().await {
        tracing::info!("Ignoring create intent: {e}");
    }
    Redirect::to("/")
}

/// Status toggle form handler.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ToggleForm>,
) -> Result<Redirect, AppError> {
    let id = product_id_from_path(&id)?;

    if let Err(e) = state
        .products()
        .toggle_status(&id, form.current_status)
        .await
    {
        tracing::info!("Ignoring toggle intent: {e}");
    }
    Ok(Redirect::to("/"))
}

/// Notification dismiss form handler.
pub async fn dismiss_notification(State(state): State<AppState>) -> impl IntoResponse {
    state.products().dismiss_notification().await;
    Redirect::to("/")
}
