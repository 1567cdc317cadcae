//! Product Customization Admin library.
//!
//! This crate provides the merchant admin product list as a library,
//! allowing it to be tested and reused.
//!
//! # Security
//!
//! This crate holds the shop's Admin API access token, which grants write
//! access to products. It is read from configuration and never logged.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the application router with request tracing and request IDs.
///
/// Sentry layers are added by the binary, outermost.
pub fn app(state: AppState) -> Router {
    routes::routes()
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use secrecy::SecretString;
    use tower::ServiceExt;

    use product_customization_core::{PageSize, ProductSortOrder};

    use super::*;
    use crate::config::{AdminConfig, ShopifyAdminConfig};

    fn test_state() -> AppState {
        AppState::new(AdminConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            shopify: ShopifyAdminConfig {
                store: "snow.myshopify.com".to_string(),
                api_version: "2026-01".to_string(),
                access_token: SecretString::from("shpat_test"),
                endpoint_override: Some("http://127.0.0.1:9/graphql.json".to_string()),
            },
            page_size: PageSize::default(),
            sort_order: ProductSortOrder::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        })
    }

    #[tokio::test]
    async fn test_health_has_request_id() {
        let response = app(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_inbound_request_id_is_echoed() {
        let response = app(test_state())
            .oneshot(
                Request::get("/health")
                    .header("x-request-id", "edge-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("x-request-id").unwrap(),
            "edge-42"
        );
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let response = app(test_state())
            .oneshot(
                Request::post("/api/products/abc/toggle")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"current_status":"ACTIVE"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_notification_starts_empty() {
        let response = app(test_state())
            .oneshot(Request::get("/api/notification").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"null");
    }
}
