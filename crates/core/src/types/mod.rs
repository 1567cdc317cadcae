//! Core types for the product customization admin.
//!
//! This module provides type-safe wrappers for the product list domain.

pub mod id;
pub mod listing;
pub mod price;
pub mod status;

pub use id::*;
pub use listing::{PageSize, PageSizeError, ProductSortOrder};
pub use price::{ListPrice, PriceError};
pub use status::*;
