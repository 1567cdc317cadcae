//! Unified error handling for admin.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::{ControllerError, ProductServiceError};
use crate::shopify::AdminShopifyError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] AdminShopifyError),

    /// Product query or mutation failed upstream.
    #[error("{0}")]
    Product(#[from] ProductServiceError),

    /// The row already has a mutation in flight.
    #[error("{0}")]
    Conflict(#[from] ControllerError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(
            self,
            Self::Internal(_) | Self::Shopify(_) | Self::Product(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let status = match &self {
            Self::Shopify(AdminShopifyError::NotFound(_)) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Shopify(_) | Self::Product(_) => StatusCode::BAD_GATEWAY,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Shopify(AdminShopifyError::NotFound(_)) => self.to_string(),
            Self::Shopify(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use product_customization_core::ProductId;

    use super::*;
    use crate::services::{MutationKind, RowKey};

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("gid://shopify/Product/1".to_string());
        assert_eq!(err.to_string(), "Not found: gid://shopify/Product/1");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");

        let err = AppError::Product(ProductServiceError::UpstreamQuery(
            "Not authorized".to_string(),
        ));
        assert_eq!(err.to_string(), "Not authorized");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Shopify(AdminShopifyError::NotFound(
                "test".to_string()
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Shopify(AdminShopifyError::RateLimited(2))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Conflict(ControllerError::AlreadySubmitting {
                target: RowKey::Product(ProductId::from_numeric(1)),
                kind: MutationKind::ToggleStatus,
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
