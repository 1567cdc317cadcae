//! Business logic services for admin.
//!
//! # Services
//!
//! - `catalog` - `ProductCatalog` seam over the Shopify Admin API
//! - `products` - Product query and mutation services
//! - `notification` - Single-slot notification mailbox
//! - `reconciliation` - Product list controller with per-row submitting state

pub mod catalog;
pub mod notification;
pub mod products;
pub mod reconciliation;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::ProductCatalog;
pub use notification::{Notification, NotificationKind, NotificationSlot};
pub use products::{
    CreateOutcome, DEMO_VARIANT_PRICE, ProductService, ProductServiceError, SNOWBOARD_COLORS,
    TOGGLE_FALLBACK_MESSAGE, random_title,
};
pub use reconciliation::{
    ControllerError, ListSnapshot, MutationKind, PendingMutation, ProductListController,
    ProductRow, RowKey, RowState, ToggleOutcome,
};
