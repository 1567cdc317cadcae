//! Shopify Admin API GraphQL client with access-token authentication.
//!
//! This module provides a type-safe client for interacting with the
//! Shopify Admin API using GraphQL. The access token comes from the
//! session/auth provider (here: configuration) and is sent with every call.

use std::sync::Arc;

use graphql_client::GraphQLQuery;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};

use crate::config::ShopifyAdminConfig;

use super::{AdminShopifyError, GraphQLError, GraphQLErrorLocation};

mod components;
mod conversions;
mod products;
pub mod queries;

/// Header Shopify reads the Admin API access token from.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Fallback when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 2;

/// Shopify sends fractional seconds (`"2.0"`); round up to whole seconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to >= 0 first
fn retry_after_secs(secs: f64) -> u64 {
    secs.max(0.0).ceil() as u64
}

/// Shopify Admin API GraphQL client.
///
/// Provides type-safe access to the Admin API for reading and mutating
/// products. Cheap to clone; clones share one connection pool.
///
/// # Security
///
/// This client holds the shop's Admin API access token. It is never logged.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    store: String,
    endpoint: String,
    access_token: SecretString,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("store", &self.inner.store)
            .field("endpoint", &self.inner.endpoint)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<GraphQLErrorsResponse>,
}

/// Shopify reports request-level failures either as a GraphQL error list or,
/// for some auth/throttle failures, as a bare string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GraphQLErrorsResponse {
    List(Vec<GraphQLErrorResponse>),
    Message(String),
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl From<GraphQLErrorsResponse> for Vec<GraphQLError> {
    fn from(errors: GraphQLErrorsResponse) -> Self {
        match errors {
            GraphQLErrorsResponse::List(errors) => errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e
                        .locations
                        .into_iter()
                        .map(|l| GraphQLErrorLocation {
                            line: l.line,
                            column: l.column,
                        })
                        .collect(),
                    path: e.path,
                })
                .collect(),
            GraphQLErrorsResponse::Message(message) => vec![GraphQLError::message(message)],
        }
    }
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Arguments
    ///
    /// * `config` - Shopify Admin API configuration
    #[must_use]
    pub fn new(config: &ShopifyAdminConfig) -> Self {
        let client = reqwest::Client::new();

        Self {
            inner: Arc::new(AdminClientInner {
                client,
                store: config.store.clone(),
                endpoint: config.graphql_endpoint(),
                access_token: config.access_token.clone(),
            }),
        }
    }

    /// Get the GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL operation.
    ///
    /// Top-level GraphQL `errors` fail the call even when partial data came
    /// back.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, AdminShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        self.send::<Q>(variables).await?.into_data()
    }

    /// Post an operation and decode the response envelope without judging it.
    ///
    /// Mutations use this directly so payload `userErrors` can be checked
    /// before any top-level `errors`.
    async fn send<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<GraphQLResponse<Q::ResponseData>, AdminShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        // Check for rate limiting
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<f64>().ok())
                .map_or(DEFAULT_RETRY_AFTER_SECS, retry_after_secs);
            return Err(AdminShopifyError::RateLimited(retry_after));
        }

        // Check for unauthorized
        if matches!(
            response.status(),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN
        ) {
            return Err(AdminShopifyError::Unauthorized(
                "Invalid or expired access token".to_string(),
            ));
        }

        let status = response.status();
        let text = response.text().await?;
        match serde_json::from_str(&text) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(AdminShopifyError::InvalidResponse(format!(
                "HTTP {status} from Admin API"
            ))),
            Err(e) => Err(AdminShopifyError::Parse(e)),
        }
    }
}

impl<T> GraphQLResponse<T> {
    /// The response data, unless GraphQL `errors` were reported or no data
    /// came back.
    fn into_data(self) -> Result<T, AdminShopifyError> {
        if let Some(errors) = self.errors {
            let converted_errors: Vec<GraphQLError> = errors.into();
            if !converted_errors.is_empty() {
                return Err(AdminShopifyError::GraphQL(converted_errors));
            }
        }

        self.data
            .ok_or_else(|| AdminShopifyError::InvalidResponse("No data in response".to_string()))
    }
}

/// Turn a mutation payload's `userErrors` into an error, if there are any.
///
/// Takes `(field, message)` pairs since every payload has its own generated
/// error type.
fn check_user_errors<'a>(
    user_errors: impl IntoIterator<Item = (Option<&'a [String]>, &'a str)>,
) -> Result<(), AdminShopifyError> {
    let mut error_messages = Vec::new();
    for (field, message) in user_errors {
        tracing::debug!(?field, %message, "Mutation user error");
        error_messages.push(message);
    }

    if error_messages.is_empty() {
        Ok(())
    } else {
        Err(AdminShopifyError::UserError(error_messages.join("; ")))
    }
}
