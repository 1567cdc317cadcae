//! Product Customization Core - Shared types library.
//!
//! This crate provides the types shared by the admin app and its tests:
//! - Shopify GID newtypes (`ProductId`, `VariantId`)
//! - Product status with the ACTIVE/DRAFT toggle
//! - List price with the "N/A" sentinel
//! - Page size and sort order for product list queries
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
