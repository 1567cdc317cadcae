//! List reconciliation controller.
//!
//! Owns the displayed product list and coordinates mutations against it.
//! Each row is either idle or has exactly one mutation in flight; a second
//! intent for a busy row is rejected before any request is issued.
//!
//! # Round trips
//!
//! ```text
//! intent ── begin ──> SUBMITTING ── upstream call ── settle ──> IDLE
//!             │                                        │
//!             └─ busy row: AlreadySubmitting           ├─ success: merge + notify
//!                                                      └─ failure: notify only
//! ```
//!
//! A refresh replaces the list and supersedes every pending entry. Round trips
//! that were already in flight still settle (and still notify) but no longer
//! merge, since the list they were started against is gone. Their rows stay
//! SUBMITTING until they settle, so a refresh never opens a second mutation
//! on a busy row.
//!
//! The state lock is never held across an upstream call, so mutations on
//! different rows proceed concurrently.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use product_customization_core::{PageSize, ProductId, ProductSortOrder, ProductStatus};

use crate::shopify::{ProductListItem, StatusUpdate};

use super::notification::{Notification, NotificationKind, NotificationSlot};
use super::products::{CreateOutcome, ProductService, ProductServiceError};
use super::ProductCatalog;

/// Identifies a row that can have a mutation in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    /// An existing product.
    Product(ProductId),
    /// The not-yet-created product behind the "Generate a Product" button.
    NewProduct,
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Product(id) => write!(f, "{id}"),
            Self::NewProduct => f.write_str("new product"),
        }
    }
}

/// What an in-flight mutation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Create,
    ToggleStatus,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::ToggleStatus => "status update",
        })
    }
}

/// A mutation that has been issued and not yet settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    /// The row it belongs to.
    pub target: RowKey,
    /// What it does.
    pub kind: MutationKind,
    /// When it was issued.
    pub submitted_at: DateTime<Utc>,
    ticket: u64,
    generation: u64,
}

/// Per-row state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowState {
    Idle,
    Submitting,
}

/// Controller errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// The row already has a mutation in flight.
    #[error("A {kind} is already in progress for {target}")]
    AlreadySubmitting {
        /// The busy row.
        target: RowKey,
        /// The mutation that is in flight.
        kind: MutationKind,
    },
}

/// Result of a settled status toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Upstream confirmed the new status.
    Updated(StatusUpdate),
    /// Upstream rejected the change; the row is unchanged.
    Failed(ProductServiceError),
}

/// A displayed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRow {
    #[serde(flatten)]
    pub product: ProductListItem,
    /// Link to the product in the Shopify admin.
    pub admin_url: Option<String>,
    pub state: RowState,
}

/// Point-in-time copy of everything the page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSnapshot {
    pub products: Vec<ProductRow>,
    /// "Total Products: N".
    pub total: usize,
    /// Whether a create is in flight.
    pub creating: bool,
    pub notification: Option<Notification>,
    /// Why the last refresh failed, if it did.
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct ListState {
    products: Vec<ProductListItem>,
    pending: HashMap<RowKey, PendingMutation>,
    notifications: NotificationSlot,
    load_error: Option<String>,
    generation: u64,
    next_ticket: u64,
}

impl ListState {
    /// Release `mutation`'s row and report whether its result may still be
    /// merged into the list.
    fn settle(&mut self, mutation: &PendingMutation) -> bool {
        if self
            .pending
            .get(&mutation.target)
            .is_some_and(|p| p.ticket == mutation.ticket)
        {
            self.pending.remove(&mutation.target);
        }

        let current = mutation.generation == self.generation;
        if !current {
            debug!(target_row = %mutation.target, "Mutation settled after refresh, not merging");
        }
        current
    }

    fn row_state(&self, key: &RowKey) -> RowState {
        if self.pending.contains_key(key) {
            RowState::Submitting
        } else {
            RowState::Idle
        }
    }
}

/// Coordinates the displayed product list with upstream mutations.
#[derive(Debug)]
pub struct ProductListController<C> {
    service: ProductService<C>,
    shop: String,
    page_size: PageSize,
    sort_order: ProductSortOrder,
    state: RwLock<ListState>,
}

impl<C: ProductCatalog> ProductListController<C> {
    /// Create a controller with an empty list.
    ///
    /// `shop` is the `*.myshopify.com` domain used for admin links.
    pub fn new(catalog: C, shop: impl Into<String>, page_size: PageSize) -> Self {
        Self {
            service: ProductService::new(catalog),
            shop: shop.into(),
            page_size,
            sort_order: ProductSortOrder::default(),
            state: RwLock::new(ListState::default()),
        }
    }

    /// Use a different sort order for refreshes.
    #[must_use]
    pub const fn with_sort_order(mut self, sort_order: ProductSortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// The product service mutations go through.
    pub const fn service(&self) -> &ProductService<C> {
        &self.service
    }

    /// Re-fetch the list, superseding every pending row.
    ///
    /// Pending rows keep their entry until their own round trip settles; only
    /// the merge of that result is cancelled. On failure the list is emptied
    /// and the error is kept for display.
    ///
    /// # Errors
    ///
    /// Returns [`ProductServiceError::UpstreamQuery`] if the fetch fails.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<ListSnapshot, ProductServiceError> {
        let fetched = self
            .service
            .fetch_products(self.page_size, self.sort_order)
            .await;

        let mut state = self.state.write().await;
        state.generation += 1;

        match fetched {
            Ok(products) => {
                debug!(count = products.len(), "Product list refreshed");
                state.products = products;
                state.load_error = None;
                Ok(self.snapshot_of(&state))
            }
            Err(e) => {
                state.products.clear();
                state.load_error = Some(e.message().to_string());
                Err(e)
            }
        }
    }

    /// Current list, row states and notification.
    pub async fn snapshot(&self) -> ListSnapshot {
        let state = self.state.read().await;
        self.snapshot_of(&state)
    }

    /// State of one row.
    pub async fn row_state(&self, key: &RowKey) -> RowState {
        self.state.read().await.row_state(key)
    }

    /// The notification, if one is showing.
    pub async fn notification(&self) -> Option<Notification> {
        self.state.read().await.notifications.current().cloned()
    }

    /// Hide the current notification.
    pub async fn dismiss_notification(&self) {
        self.state.write().await.notifications.dismiss();
    }

    /// Mark `target` as submitting.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::AlreadySubmitting`] if the row is busy; the
    /// state is left untouched.
    pub async fn begin(
        &self,
        target: RowKey,
        kind: MutationKind,
    ) -> Result<PendingMutation, ControllerError> {
        let mut state = self.state.write().await;

        if let Some(existing) = state.pending.get(&target) {
            return Err(ControllerError::AlreadySubmitting {
                target,
                kind: existing.kind,
            });
        }

        state.next_ticket += 1;
        let mutation = PendingMutation {
            target: target.clone(),
            kind,
            submitted_at: Utc::now(),
            ticket: state.next_ticket,
            generation: state.generation,
        };
        state.pending.insert(target, mutation.clone());
        Ok(mutation)
    }

    /// Flip a product between ACTIVE and DRAFT.
    ///
    /// Upstream failures settle as [`ToggleOutcome::Failed`] with a failure
    /// notification; the row is only changed once upstream confirms.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::AlreadySubmitting`] if the row is busy. No
    /// request is issued in that case.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn toggle_status(
        &self,
        id: &ProductId,
        current_status: ProductStatus,
    ) -> Result<ToggleOutcome, ControllerError> {
        let mutation = self
            .begin(RowKey::Product(id.clone()), MutationKind::ToggleStatus)
            .await?;

        let result = self
            .service
            .toggle_product_status(id, current_status)
            .await;

        let mut state = self.state.write().await;
        let mergeable = state.settle(&mutation);

        Ok(match result {
            Ok(update) => {
                if mergeable
                    && let Some(row) = state.products.iter_mut().find(|p| p.id == update.id)
                {
                    row.status = update.status;
                }
                state.notifications.post(
                    format!("Product status updated to {}", update.status.label()),
                    NotificationKind::Success,
                );
                ToggleOutcome::Updated(update)
            }
            Err(e) => {
                state
                    .notifications
                    .post(e.message(), NotificationKind::Failure);
                ToggleOutcome::Failed(e)
            }
        })
    }

    /// Create a demo product and add it to the top of the list.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::AlreadySubmitting`] if a create is already
    /// in flight.
    #[instrument(skip(self))]
    pub async fn create_random_product(&self) -> Result<CreateOutcome, ControllerError> {
        let mutation = self.begin(RowKey::NewProduct, MutationKind::Create).await?;

        let outcome = self.service.create_random_product().await;

        let mut state = self.state.write().await;
        let mergeable = state.settle(&mutation);

        if mergeable && let Some(product) = outcome.product() {
            state.products.retain(|p| p.id != product.id);
            state.products.insert(0, product.clone());
            state.products.truncate(usize::from(self.page_size.get()));
        }

        match &outcome {
            CreateOutcome::Succeeded(product) => state.notifications.post(
                format!("{} created", product.title),
                NotificationKind::Success,
            ),
            CreateOutcome::PartialFailure { product, error } => state.notifications.post(
                format!(
                    "{} created, but setting its price failed: {}",
                    product.title,
                    error.message()
                ),
                NotificationKind::PartialFailure,
            ),
            CreateOutcome::Failed(error) => state
                .notifications
                .post(error.message(), NotificationKind::Failure),
        }

        Ok(outcome)
    }

    fn snapshot_of(&self, state: &ListState) -> ListSnapshot {
        let products: Vec<ProductRow> = state
            .products
            .iter()
            .map(|product| ProductRow {
                admin_url: product.admin_url(&self.shop),
                state: state.row_state(&RowKey::Product(product.id.clone())),
                product: product.clone(),
            })
            .collect();

        ListSnapshot {
            total: products.len(),
            products,
            creating: state.pending.contains_key(&RowKey::NewProduct),
            notification: state.notifications.current().cloned(),
            error: state.load_error.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use product_customization_core::ListPrice;

    use super::*;
    use crate::services::testing::{FakeCatalog, FakeFailure, product};

    fn controller(products: Vec<ProductListItem>) -> ProductListController<FakeCatalog> {
        ProductListController::new(
            FakeCatalog::with_products(products),
            "snow.myshopify.com",
            PageSize::default(),
        )
    }

    fn catalog(controller: &ProductListController<FakeCatalog>) -> &FakeCatalog {
        controller.service().catalog()
    }

    #[tokio::test]
    async fn test_empty_catalog_total_zero() {
        let controller = controller(vec![]);

        let snapshot = controller.refresh().await.unwrap();

        assert!(snapshot.products.is_empty());
        assert_eq!(snapshot.total, 0);
        assert_eq!(snapshot.error, None);
    }

    #[tokio::test]
    async fn test_refresh_builds_rows() {
        let controller = controller(vec![
            product(1, ProductStatus::Active, Some("10.00"), 1),
            product(2, ProductStatus::Draft, None, 2),
        ]);

        let snapshot = controller.refresh().await.unwrap();

        assert_eq!(snapshot.total, 2);
        assert_eq!(snapshot.products[0].product.id, ProductId::from_numeric(2));
        assert_eq!(snapshot.products[0].product.price, ListPrice::NotAvailable);
        assert_eq!(
            snapshot.products[0].admin_url.as_deref(),
            Some("https://snow.myshopify.com/admin/products/2")
        );
        assert!(snapshot.products.iter().all(|r| r.state == RowState::Idle));
    }

    #[tokio::test]
    async fn test_refresh_failure_shows_error_state() {
        let controller = controller(vec![product(1, ProductStatus::Active, None, 1)]);
        controller.refresh().await.unwrap();
        catalog(&controller).fail_list(FakeFailure::Unauthorized);

        let err = controller.refresh().await.unwrap_err();

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.total, 0);
        assert_eq!(snapshot.error.as_deref(), Some(err.message()));
    }

    #[tokio::test]
    async fn test_toggle_merges_and_notifies() {
        let controller = controller(vec![product(1, ProductStatus::Active, None, 1)]);
        controller.refresh().await.unwrap();
        let id = ProductId::from_numeric(1);

        let outcome = controller
            .toggle_status(&id, ProductStatus::Active)
            .await
            .unwrap();
        assert!(matches!(outcome, ToggleOutcome::Updated(ref u) if u.status == ProductStatus::Draft));

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.products[0].product.status, ProductStatus::Draft);
        assert_eq!(snapshot.products[0].state, RowState::Idle);
        let notification = snapshot.notification.unwrap();
        assert_eq!(notification.kind, NotificationKind::Success);

        controller
            .toggle_status(&id, ProductStatus::Draft)
            .await
            .unwrap();
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.products[0].product.status, ProductStatus::Active);
    }

    #[tokio::test]
    async fn test_toggle_failure_leaves_row_untouched() {
        let controller = controller(vec![
            product(1, ProductStatus::Active, Some("19.99"), 1),
            product(2, ProductStatus::Draft, None, 2),
        ]);
        let before = controller.refresh().await.unwrap().products;
        catalog(&controller).fail_status(FakeFailure::User("Product is locked".to_string()));

        let outcome = controller
            .toggle_status(&ProductId::from_numeric(1), ProductStatus::Active)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ToggleOutcome::Failed(ProductServiceError::UpstreamMutation(
                "Product is locked".to_string()
            ))
        );
        let after = controller.snapshot().await;
        assert_eq!(after.products, before);
        let notification = after.notification.unwrap();
        assert_eq!(notification.content, "Product is locked");
        assert_eq!(notification.kind, NotificationKind::Failure);
    }

    #[tokio::test]
    async fn test_not_authorized_notification() {
        let controller = controller(vec![product(1, ProductStatus::Active, None, 1)]);
        controller.refresh().await.unwrap();
        catalog(&controller).fail_status(FakeFailure::GraphQL(vec!["Not authorized".to_string()]));

        controller
            .toggle_status(&ProductId::from_numeric(1), ProductStatus::Active)
            .await
            .unwrap();

        let notification = controller.notification().await.unwrap();
        assert_eq!(notification.content, "Not authorized");
    }

    #[tokio::test]
    async fn test_second_toggle_rejected_while_submitting() {
        let controller = Arc::new(controller(vec![
            product(1, ProductStatus::Active, None, 1),
            product(2, ProductStatus::Active, None, 2),
        ]));
        controller.refresh().await.unwrap();
        let gate = catalog(&controller).gate_status();
        let id = ProductId::from_numeric(1);

        let first = tokio::spawn({
            let controller = Arc::clone(&controller);
            let id = id.clone();
            async move { controller.toggle_status(&id, ProductStatus::Active).await }
        });
        gate.entered.notified().await;

        let before = controller.snapshot().await;
        let err = controller
            .toggle_status(&id, ProductStatus::Active)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ControllerError::AlreadySubmitting {
                target: RowKey::Product(id.clone()),
                kind: MutationKind::ToggleStatus,
            }
        );
        assert_eq!(controller.snapshot().await, before);
        assert_eq!(catalog(&controller).calls_starting_with("status:"), 1);
        assert_eq!(
            controller.row_state(&RowKey::Product(id.clone())).await,
            RowState::Submitting
        );
        assert_eq!(
            controller
                .row_state(&RowKey::Product(ProductId::from_numeric(2)))
                .await,
            RowState::Idle
        );

        gate.release.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert!(matches!(outcome, ToggleOutcome::Updated(_)));
        assert_eq!(
            controller.row_state(&RowKey::Product(id)).await,
            RowState::Idle
        );
    }

    #[tokio::test]
    async fn test_refresh_supersedes_pending_row() {
        let controller = Arc::new(controller(vec![product(1, ProductStatus::Active, None, 1)]));
        controller.refresh().await.unwrap();
        let gate = catalog(&controller).gate_status();
        let id = ProductId::from_numeric(1);

        let toggle = tokio::spawn({
            let controller = Arc::clone(&controller);
            let id = id.clone();
            async move { controller.toggle_status(&id, ProductStatus::Active).await }
        });
        gate.entered.notified().await;

        let refreshed = controller.refresh().await.unwrap();
        assert_eq!(refreshed.products[0].state, RowState::Submitting);

        gate.release.notify_one();
        let outcome = toggle.await.unwrap().unwrap();
        assert!(matches!(outcome, ToggleOutcome::Updated(_)));

        // Settled against a list that no longer exists: notified, not merged
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.products[0].product.status, ProductStatus::Active);
        assert_eq!(snapshot.products[0].state, RowState::Idle);
        assert_eq!(
            snapshot.notification.map(|n| n.kind),
            Some(NotificationKind::Success)
        );
    }

    #[tokio::test]
    async fn test_refresh_keeps_row_locked_until_settled() {
        let controller = Arc::new(controller(vec![product(1, ProductStatus::Active, None, 1)]));
        controller.refresh().await.unwrap();
        let gate = catalog(&controller).gate_status();
        let id = ProductId::from_numeric(1);

        let first = tokio::spawn({
            let controller = Arc::clone(&controller);
            let id = id.clone();
            async move { controller.toggle_status(&id, ProductStatus::Active).await }
        });
        gate.entered.notified().await;

        controller.refresh().await.unwrap();
        let err = controller
            .toggle_status(&id, ProductStatus::Active)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ControllerError::AlreadySubmitting {
                target: RowKey::Product(id.clone()),
                kind: MutationKind::ToggleStatus,
            }
        );
        assert_eq!(catalog(&controller).calls_starting_with("status:"), 1);

        gate.release.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(
            controller.row_state(&RowKey::Product(id)).await,
            RowState::Idle
        );
    }

    #[tokio::test]
    async fn test_snapshot_shows_create_in_flight() {
        let controller = controller(vec![]);
        controller.refresh().await.unwrap();
        let mutation = controller
            .begin(RowKey::NewProduct, MutationKind::Create)
            .await
            .unwrap();

        let snapshot = controller.refresh().await.unwrap();
        assert!(snapshot.creating);

        let err = controller.create_random_product().await.unwrap_err();
        assert_eq!(
            err,
            ControllerError::AlreadySubmitting {
                target: RowKey::NewProduct,
                kind: MutationKind::Create,
            }
        );
        assert_eq!(mutation.target, RowKey::NewProduct);
        assert_eq!(catalog(&controller).calls_starting_with("create:"), 0);
    }

    #[tokio::test]
    async fn test_create_prepends_product() {
        let controller = controller(vec![product(1, ProductStatus::Active, None, 1)]);
        controller.refresh().await.unwrap();

        let outcome = controller.create_random_product().await.unwrap();

        let CreateOutcome::Succeeded(created) = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.total, 2);
        assert!(!snapshot.creating);
        assert_eq!(snapshot.products[0].product, created);
        assert_eq!(created.price.to_string(), "100.00");
        assert_eq!(
            snapshot.notification.map(|n| n.kind),
            Some(NotificationKind::Success)
        );
    }

    #[tokio::test]
    async fn test_create_partial_failure_notification() {
        let controller = controller(vec![]);
        controller.refresh().await.unwrap();
        catalog(&controller).fail_price(FakeFailure::GraphQL(vec!["Throttled".to_string()]));

        let outcome = controller.create_random_product().await.unwrap();

        let CreateOutcome::PartialFailure { product, .. } = outcome else {
            panic!("expected partial failure, got {outcome:?}");
        };
        assert!(product.title.ends_with(" Snowboard"));
        assert_eq!(product.price.to_string(), "0.00");

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.total, 1);
        let notification = snapshot.notification.unwrap();
        assert_eq!(notification.kind, NotificationKind::PartialFailure);
        assert!(notification.content.contains("Throttled"));
    }

    #[tokio::test]
    async fn test_create_failure_adds_nothing() {
        let controller = controller(vec![]);
        controller.refresh().await.unwrap();
        catalog(&controller).fail_create(FakeFailure::User("Title can't be blank".to_string()));

        let outcome = controller.create_random_product().await.unwrap();

        assert!(matches!(outcome, CreateOutcome::Failed(_)));
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.total, 0);
        assert_eq!(
            snapshot.notification.map(|n| n.content).as_deref(),
            Some("Title can't be blank")
        );
    }

    #[tokio::test]
    async fn test_dismiss_notification() {
        let controller = controller(vec![product(1, ProductStatus::Active, None, 1)]);
        controller.refresh().await.unwrap();
        controller
            .toggle_status(&ProductId::from_numeric(1), ProductStatus::Active)
            .await
            .unwrap();
        assert!(controller.notification().await.is_some());

        controller.dismiss_notification().await;

        assert_eq!(controller.notification().await, None);
    }

    #[tokio::test]
    async fn test_begin_rejects_busy_row_and_keeps_original() {
        let controller = controller(vec![]);

        let first = controller
            .begin(RowKey::NewProduct, MutationKind::Create)
            .await
            .unwrap();
        let err = controller
            .begin(RowKey::NewProduct, MutationKind::Create)
            .await
            .unwrap_err();

        assert!(matches!(err, ControllerError::AlreadySubmitting { .. }));
        assert!(controller.snapshot().await.creating);
        assert_eq!(first.kind, MutationKind::Create);
        assert_eq!(err.to_string(), "A create is already in progress for new product");
    }
}
