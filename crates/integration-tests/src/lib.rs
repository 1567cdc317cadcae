//! Integration test harness for the product customization admin.
//!
//! Runs the admin app and a scripted stand-in for the Shopify Admin GraphQL
//! endpoint on ephemeral local ports, so the full request path (router,
//! controller, client, wire format) is exercised without a real shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p product-customization-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let shopify = MockShopify::start().await;
//! shopify.respond("GetProducts", fixtures::products(&[]));
//!
//! let admin = TestAdmin::start(&shopify).await;
//! let resp = admin.client.get(admin.url("/api/products")).send().await?;
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use secrecy::SecretString;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use product_customization_admin::{
    app,
    config::{AdminConfig, ShopifyAdminConfig},
    state::AppState,
};
use product_customization_core::{PageSize, ProductSortOrder};

/// Store domain the harness pretends to be.
pub const TEST_STORE: &str = "snow.myshopify.com";

/// Access token the admin app is configured with.
pub const TEST_ACCESS_TOKEN: &str = "shpat_integration_token";

/// A scripted reply to one GraphQL operation.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

impl MockResponse {
    /// 200 with a JSON body.
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            headers: vec![],
            body,
        }
    }

    /// Any status with a JSON body.
    #[must_use]
    pub fn status(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: vec![],
            body,
        }
    }

    /// Add a response header.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

/// A GraphQL request as received by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub operation_name: Option<String>,
    pub query: String,
    pub variables: Value,
    pub access_token: Option<String>,
}

/// Holds one operation's replies until released.
#[derive(Debug, Default)]
pub struct Hold {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
struct MockState {
    responses: Mutex<HashMap<String, MockResponse>>,
    holds: Mutex<HashMap<String, Arc<Hold>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Stand-in for `https://{shop}/admin/api/{version}/graphql.json`.
///
/// Replies are keyed by `operationName` and stay in place until replaced.
/// Operations without a scripted reply get a GraphQL error.
pub struct MockShopify {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockShopify {
    /// Start the mock on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let router = Router::new()
            .route("/admin/api/{version}/graphql.json", post(graphql))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { addr, state }
    }

    /// GraphQL endpoint the admin app should post to.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("http://{}/admin/api/2026-01/graphql.json", self.addr)
    }

    /// Reply to `operation` with 200 and `body`.
    pub fn respond(&self, operation: &str, body: Value) {
        self.respond_with(operation, MockResponse::ok(body));
    }

    /// Reply to `operation` with a scripted response.
    pub fn respond_with(&self, operation: &str, response: MockResponse) {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(operation.to_string(), response);
    }

    /// Park `operation` requests until `Hold::release` is notified.
    #[must_use]
    pub fn hold(&self, operation: &str) -> Arc<Hold> {
        let hold = Arc::new(Hold::default());
        self.state
            .holds
            .lock()
            .unwrap()
            .insert(operation.to_string(), Arc::clone(&hold));
        hold
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests for one operation.
    #[must_use]
    pub fn requests_for(&self, operation: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.operation_name.as_deref() == Some(operation))
            .collect()
    }
}

async fn graphql(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let operation_name = body
        .get("operationName")
        .and_then(Value::as_str)
        .map(String::from);

    state.requests.lock().unwrap().push(RecordedRequest {
        operation_name: operation_name.clone(),
        query: body
            .get("query")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        variables: body.get("variables").cloned().unwrap_or(Value::Null),
        access_token: headers
            .get("x-shopify-access-token")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    });

    let operation = operation_name.unwrap_or_default();

    let hold = state.holds.lock().unwrap().get(&operation).cloned();
    if let Some(hold) = hold {
        hold.entered.notify_one();
        hold.release.notified().await;
    }

    let scripted = state.responses.lock().unwrap().get(&operation).cloned();
    let Some(scripted) = scripted else {
        return Json(serde_json::json!({
            "errors": [{ "message": format!("No mock response for {operation}") }]
        }))
        .into_response();
    };

    let mut response = (scripted.status, Json(scripted.body)).into_response();
    for (name, value) in scripted.headers {
        response
            .headers_mut()
            .insert(name, value.parse().unwrap());
    }
    response
}

/// The admin app served on an ephemeral port, talking to a [`MockShopify`].
pub struct TestAdmin {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub state: AppState,
}

impl TestAdmin {
    /// Start the admin app against `shopify`.
    pub async fn start(shopify: &MockShopify) -> Self {
        Self::start_with(test_config(shopify)).await
    }

    /// Start the admin app with a custom configuration.
    pub async fn start_with(config: AdminConfig) -> Self {
        let state = AppState::new(config);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            addr,
            client,
            state,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

/// Admin configuration pointing at `shopify`.
#[must_use]
pub fn test_config(shopify: &MockShopify) -> AdminConfig {
    AdminConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        shopify: ShopifyAdminConfig {
            store: TEST_STORE.to_string(),
            api_version: "2026-01".to_string(),
            access_token: SecretString::from(TEST_ACCESS_TOKEN),
            endpoint_override: Some(shopify.endpoint()),
        },
        page_size: PageSize::default(),
        sort_order: ProductSortOrder::default(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Admin API response bodies.
pub mod fixtures {
    use serde_json::{Value, json};

    /// A product node as returned by `GetProducts` and `productCreate`.
    #[must_use]
    pub fn product_node(
        id: u64,
        title: &str,
        status: &str,
        price: Option<&str>,
        created_at: &str,
    ) -> Value {
        let edges: Vec<Value> = price
            .map(|price| {
                json!({
                    "node": {
                        "id": format!("gid://shopify/ProductVariant/{}", id * 10),
                        "price": price,
                    }
                })
            })
            .into_iter()
            .collect();

        json!({
            "id": format!("gid://shopify/Product/{id}"),
            "title": title,
            "handle": title.to_lowercase().replace(' ', "-"),
            "status": status,
            "createdAt": created_at,
            "featuredImage": null,
            "variants": { "edges": edges },
        })
    }

    /// `GetProducts` response.
    #[must_use]
    pub fn products(nodes: &[Value]) -> Value {
        let edges: Vec<Value> = nodes.iter().map(|node| json!({ "node": node })).collect();
        json!({ "data": { "products": { "edges": edges } } })
    }

    /// `ProductCreate` response.
    #[must_use]
    pub fn product_created(node: Value) -> Value {
        json!({ "data": { "productCreate": { "product": node, "userErrors": [] } } })
    }

    /// `ProductVariantsBulkUpdate` response.
    #[must_use]
    pub fn variant_priced(variant_id: u64, price: &str) -> Value {
        json!({
            "data": {
                "productVariantsBulkUpdate": {
                    "productVariants": [{
                        "id": format!("gid://shopify/ProductVariant/{variant_id}"),
                        "price": price,
                    }],
                    "userErrors": [],
                }
            }
        })
    }

    /// `ProductUpdate` response.
    #[must_use]
    pub fn status_updated(id: u64, status: &str) -> Value {
        json!({
            "data": {
                "productUpdate": {
                    "product": { "id": format!("gid://shopify/Product/{id}"), "status": status },
                    "userErrors": [],
                }
            }
        })
    }

    /// A mutation payload that only carries `userErrors`.
    #[must_use]
    pub fn user_errors(payload: &str, messages: &[&str]) -> Value {
        let errors: Vec<Value> = messages
            .iter()
            .map(|message| json!({ "field": ["product"], "message": message }))
            .collect();
        json!({ "data": { payload: { "product": null, "userErrors": errors } } })
    }

    /// A top-level GraphQL error response.
    #[must_use]
    pub fn graphql_errors(messages: &[&str]) -> Value {
        let errors: Vec<Value> = messages.iter().map(|m| json!({ "message": m })).collect();
        json!({ "errors": errors })
    }
}
