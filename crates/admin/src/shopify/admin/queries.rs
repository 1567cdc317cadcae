//! GraphQL query definitions for Shopify Admin API.
//!
//! Uses `graphql_client` to generate type-safe Rust code from the documents in
//! `graphql/admin/queries/`, validated against `graphql/admin/schema.graphql`.

use graphql_client::GraphQLQuery;

// =============================================================================
// Custom scalar type aliases (used by graphql_client)
// =============================================================================

/// ISO 8601 date-time, parsed straight into `chrono`.
type DateTime = chrono::DateTime<chrono::Utc>;

/// Money amount as decimal string.
type Money = String;

/// URL string.
#[allow(clippy::upper_case_acronyms)]
type URL = String;

// =============================================================================
// Product queries
// =============================================================================

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/admin/schema.graphql",
    query_path = "graphql/admin/queries/products.graphql",
    response_derives = "Debug, Clone",
    skip_serializing_none
)]
pub struct GetProducts;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/admin/schema.graphql",
    query_path = "graphql/admin/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct ProductCreate;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/admin/schema.graphql",
    query_path = "graphql/admin/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct ProductVariantsBulkUpdate;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/admin/schema.graphql",
    query_path = "graphql/admin/queries/products.graphql",
    response_derives = "Debug, Clone"
)]
pub struct ProductUpdate;

// =============================================================================
// Component queries
// =============================================================================

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/admin/schema.graphql",
    query_path = "graphql/admin/queries/components.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetProductComponents;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/admin/schema.graphql",
    query_path = "graphql/admin/queries/components.graphql",
    response_derives = "Debug, Clone"
)]
pub struct GetProductVariantComponents;
