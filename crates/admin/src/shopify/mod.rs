//! Shopify Admin API client.
//!
//! # Security
//!
//! **This module holds the shop's Admin API access token.**
//!
//! The token grants write access to the shop's products. It never leaves the
//! server and is redacted from `Debug` output.
//!
//! # Architecture
//!
//! - Uses `graphql_client::GraphQLQuery` for typed GraphQL operations
//! - Direct API calls to Shopify (no local database sync)
//! - Rate limiting and authorization failures mapped to typed errors
//!
//! # Example
//!
//! ```rust,ignore
//! use product_customization_admin::shopify::AdminClient;
//!
//! let client = AdminClient::new(&config.shopify);
//!
//! // Newest 20 products
//! let products = client
//!     .get_products(PageSize::default(), ProductSortOrder::CreatedAtDesc)
//!     .await?;
//!
//! // Flip a product to DRAFT
//! client
//!     .update_product_status(&ProductId::from_numeric(1), ProductStatus::Draft)
//!     .await?;
//! ```

mod admin;
pub mod types;

pub use admin::AdminClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response parsed but did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),
}

impl AdminShopifyError {
    /// The most specific upstream message carried by this error.
    ///
    /// Field-level `userErrors` come first, then GraphQL `errors`, then the
    /// transport-level description. Returns `None` when Shopify sent nothing
    /// meaningful to show, including responses that parsed but were empty or
    /// malformed.
    #[must_use]
    pub fn upstream_message(&self) -> Option<String> {
        let message = match self {
            Self::UserError(message) | Self::Unauthorized(message) => message.clone(),
            Self::GraphQL(errors) => format_graphql_errors(errors),
            Self::Http(_) | Self::NotFound(_) | Self::RateLimited(_) => self.to_string(),
            Self::Parse(_) | Self::InvalidResponse(_) => return None,
        };

        let trimmed = message.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error with only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.trim())
        .filter(|m| !m.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}
