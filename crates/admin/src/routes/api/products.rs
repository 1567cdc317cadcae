//! Product list JSON API handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use product_customization_core::ProductStatus;

use crate::{
    error::AppError,
    routes::product_id_from_path,
    services::{CreateOutcome, ListSnapshot, Notification, ToggleOutcome},
    shopify::{ProductListItem, StatusUpdate},
    state::AppState,
};

/// Build the products API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(create))
        .route("/api/products/{id}/toggle", post(toggle))
}

/// Request for toggling a product's status.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub current_status: ProductStatus,
}

/// Response for a status toggle.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub product: Option<StatusUpdate>,
    pub error: Option<String>,
    pub notification: Option<Notification>,
}

/// Outcome of a create, tagged by `outcome`.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CreateResult {
    Succeeded {
        product: ProductListItem,
    },
    PartialFailure {
        product: ProductListItem,
        error: String,
    },
    Failed {
        error: String,
    },
}

impl From<CreateOutcome> for CreateResult {
    fn from(outcome: CreateOutcome) -> Self {
        match outcome {
            CreateOutcome::Succeeded(product) => Self::Succeeded { product },
            CreateOutcome::PartialFailure { product, error } => Self::PartialFailure {
                product,
                error: error.message().to_string(),
            },
            CreateOutcome::Failed(error) => Self::Failed {
                error: error.message().to_string(),
            },
        }
    }
}

/// Response for a create.
#[derive(Debug, Serialize)]
pub struct CreateResponse {
    #[serde(flatten)]
    pub result: CreateResult,
    pub notification: Option<Notification>,
}

/// Refresh the list and return it.
///
/// # Errors
///
/// Returns 502 if the product query fails.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<ListSnapshot>, AppError> {
    let snapshot = state.products().refresh().await?;
    Ok(Json(snapshot))
}

/// Create a demo product.
///
/// Succeeded and partially failed creates return 200; a create where nothing
/// was created returns 502. Both carry the resulting notification.
///
/// # Errors
///
/// Returns 409 if a create is already in flight.
#[instrument(skip(state))]
pub async fn create(State(state): State<AppState>) -> Result<Response, AppError> {
    let controller = state.products();
    let outcome = controller.create_random_product().await?;

    let status = match &outcome {
        CreateOutcome::Failed(_) => StatusCode::BAD_GATEWAY,
        CreateOutcome::Succeeded(_) | CreateOutcome::PartialFailure { .. } => StatusCode::OK,
    };
    let body = CreateResponse {
        result: outcome.into(),
        notification: controller.notification().await,
    };

    Ok((status, Json(body)).into_response())
}

/// Flip a product between ACTIVE and DRAFT.
///
/// # Errors
///
/// Returns 400 for a malformed id and 409 if the row already has a mutation
/// in flight.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ToggleRequest>,
) -> Result<Response, AppError> {
    let id = product_id_from_path(&id)?;
    let controller = state.products();

    let outcome = controller.toggle_status(&id, body.current_status).await?;
    let notification = controller.notification().await;

    let (status, body) = match outcome {
        ToggleOutcome::Updated(update) => (
            StatusCode::OK,
            ToggleResponse {
                product: Some(update),
                error: None,
                notification,
            },
        ),
        ToggleOutcome::Failed(e) => (
            StatusCode::BAD_GATEWAY,
            ToggleResponse {
                product: None,
                error: Some(e.message().to_string()),
                notification,
            },
        ),
    };

    Ok((status, Json(body)).into_response())
}

#[cfg(test)]
mod tests {
    use product_customization_core::ListPrice;

    use super::*;
    use crate::services::ProductServiceError;
    use crate::services::testing::product;

    #[test]
    fn test_toggle_request_accepts_upstream_casing() {
        let request: ToggleRequest =
            serde_json::from_str(r#"{"current_status":"ACTIVE"}"#).unwrap_or(ToggleRequest {
                current_status: ProductStatus::Draft,
            });
        assert_eq!(request.current_status, ProductStatus::Active);
    }

    #[test]
    fn test_create_result_is_tagged() {
        let result = CreateResult::from(CreateOutcome::Failed(
            ProductServiceError::UpstreamMutation("Not authorized".to_string()),
        ));
        let json = serde_json::to_value(&result).unwrap_or_default();
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["error"], "Not authorized");
    }

    #[test]
    fn test_partial_failure_keeps_product() {
        let created = product(7, ProductStatus::Draft, None, 3);
        let result = CreateResult::from(CreateOutcome::PartialFailure {
            product: created,
            error: ProductServiceError::UpstreamMutation("Throttled".to_string()),
        });
        let json = serde_json::to_value(&result).unwrap_or_default();
        assert_eq!(json["outcome"], "partial_failure");
        assert_eq!(json["product"]["price"], ListPrice::NotAvailable.to_string());
    }
}
