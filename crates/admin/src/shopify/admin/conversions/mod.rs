//! Type conversions from GraphQL response types to domain types.
//!
//! These functions convert the GraphQL response types
//! into our clean domain types.

mod components;
mod products;

pub use components::{convert_product_components, convert_variant_components};
pub use products::{
    convert_created_product, convert_product_connection, convert_status_update,
    convert_variant_price, status_to_upstream,
};
