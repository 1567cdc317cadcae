//! Scripted `ProductCatalog` double for service and controller tests.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Notify;

use product_customization_core::{
    ListPrice, PageSize, ProductId, ProductSortOrder, ProductStatus, VariantId,
};

use crate::shopify::{
    AdminShopifyError, CreatedProduct, GraphQLError, ProductListItem, StatusUpdate,
    VariantPriceUpdate,
};

use super::ProductCatalog;

/// A failure the fake reports instead of calling upstream.
#[derive(Debug, Clone)]
pub enum FakeFailure {
    /// Top-level GraphQL `errors` with these messages.
    GraphQL(Vec<String>),
    /// Mutation `userErrors` with this message.
    User(String),
    /// Authorization failure.
    Unauthorized,
    /// A payload with neither a result nor any errors.
    EmptyPayload,
}

impl From<FakeFailure> for AdminShopifyError {
    fn from(failure: FakeFailure) -> Self {
        match failure {
            FakeFailure::GraphQL(messages) => {
                Self::GraphQL(messages.into_iter().map(GraphQLError::message).collect())
            }
            FakeFailure::User(message) => Self::UserError(message),
            FakeFailure::Unauthorized => {
                Self::Unauthorized("Invalid or expired access token".to_string())
            }
            FakeFailure::EmptyPayload => Self::InvalidResponse("payload returned no result".to_string()),
        }
    }
}

/// Parks status updates until the test lets them through.
#[derive(Debug, Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Debug, Default)]
pub struct FakeCatalog {
    pub products: Mutex<Vec<ProductListItem>>,
    pub list_failure: Mutex<Option<FakeFailure>>,
    pub create_failure: Mutex<Option<FakeFailure>>,
    pub price_failure: Mutex<Option<FakeFailure>>,
    pub status_failure: Mutex<Option<FakeFailure>>,
    /// Created products come back without a variant.
    pub create_without_variant: Mutex<bool>,
    pub status_gate: Mutex<Option<Arc<Gate>>>,
    pub calls: Mutex<Vec<String>>,
}

pub fn timestamp(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

pub fn product(id: u64, status: ProductStatus, price: Option<&str>, day: u32) -> ProductListItem {
    ProductListItem {
        id: ProductId::from_numeric(id),
        title: format!("Board {id}"),
        handle: format!("board-{id}"),
        status,
        price: ListPrice::from_first_variant(price).unwrap(),
        created_at: timestamp(day),
        featured_image: None,
    }
}

impl FakeCatalog {
    pub fn with_products(products: Vec<ProductListItem>) -> Self {
        Self {
            products: Mutex::new(products),
            ..Self::default()
        }
    }

    pub fn fail_list(&self, failure: FakeFailure) {
        *self.list_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_create(&self, failure: FakeFailure) {
        *self.create_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_price(&self, failure: FakeFailure) {
        *self.price_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_status(&self, failure: FakeFailure) {
        *self.status_failure.lock().unwrap() = Some(failure);
    }

    pub fn gate_status(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.status_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn failure(slot: &Mutex<Option<FakeFailure>>) -> Result<(), AdminShopifyError> {
        slot.lock().unwrap().clone().map_or(Ok(()), |f| Err(f.into()))
    }
}

impl ProductCatalog for FakeCatalog {
    async fn list_products(
        &self,
        page_size: PageSize,
        _sort_order: ProductSortOrder,
    ) -> Result<Vec<ProductListItem>, AdminShopifyError> {
        self.record(format!("list:{}", page_size.get()));
        Self::failure(&self.list_failure)?;
        let products = self.products.lock().unwrap();
        Ok(products
            .iter()
            .take(usize::from(page_size.get()))
            .cloned()
            .collect())
    }

    async fn create_product(&self, title: &str) -> Result<CreatedProduct, AdminShopifyError> {
        self.record(format!("create:{title}"));
        Self::failure(&self.create_failure)?;

        let mut products = self.products.lock().unwrap();
        let id = 1000 + products.len() as u64;
        let without_variant = *self.create_without_variant.lock().unwrap();
        let mut created = product(
            id,
            ProductStatus::Active,
            (!without_variant).then_some("0.00"),
            28,
        );
        created.title = title.to_string();
        products.insert(0, created.clone());

        Ok(CreatedProduct {
            product: created,
            default_variant_id: (!without_variant).then(|| VariantId::from_numeric(id * 10)),
        })
    }

    async fn set_variant_price(
        &self,
        product_id: &ProductId,
        variant_id: &VariantId,
        price: &ListPrice,
    ) -> Result<VariantPriceUpdate, AdminShopifyError> {
        self.record(format!("price:{product_id}:{variant_id}:{price}"));
        Self::failure(&self.price_failure)?;

        let mut products = self.products.lock().unwrap();
        if let Some(row) = products.iter_mut().find(|p| &p.id == product_id) {
            row.price = *price;
        }

        Ok(VariantPriceUpdate {
            id: variant_id.clone(),
            price: *price,
        })
    }

    async fn set_product_status(
        &self,
        id: &ProductId,
        status: ProductStatus,
    ) -> Result<StatusUpdate, AdminShopifyError> {
        self.record(format!("status:{id}:{status}"));

        let gate = self.status_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        Self::failure(&self.status_failure)?;

        let mut products = self.products.lock().unwrap();
        if let Some(row) = products.iter_mut().find(|p| &p.id == id) {
            row.status = status;
        }

        Ok(StatusUpdate {
            id: id.clone(),
            status,
        })
    }
}
