//! Seams between the sync logic and its collaborators: the external
//! paginated source and the tenant-scoped storage sink.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::{SourceError, StorageError};
use super::model::{Customer, Order, ProductRow, ResourceKind, SyncStatus, Tenant};

/// One page of raw resource records, already scoped to a tenant's store.
///
/// The cursor for the next page is the external id of the last record in
/// the current page (since-id pagination). A page shorter than
/// `page_size()` signals the final page. This port does not retry;
/// failures propagate to the orchestrator.
#[async_trait]
pub trait ShopSource: Send + Sync {
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        since_id: Option<i64>,
    ) -> Result<Vec<serde_json::Value>, SourceError>;

    /// Upper bound on records per page for this source.
    fn page_size(&self) -> usize;
}

/// Builds a source client for one tenant's credentials.
pub trait ShopSourceFactory: Send + Sync {
    fn source_for(&self, tenant: &Tenant) -> Arc<dyn ShopSource>;
}

#[async_trait]
pub trait CustomersRepository: Send + Sync {
    /// Insert-or-replace keyed by `(tenant_id, shopify_customer_id)`.
    /// All fields of an existing row are overwritten; safe to repeat.
    async fn upsert(&self, customer: &Customer) -> Result<(), StorageError>;

    /// Internal id of the customer with the given external id, if synced.
    async fn find_ref(
        &self,
        tenant_id: Uuid,
        shopify_customer_id: i64,
    ) -> Result<Option<Uuid>, StorageError>;

    async fn find_by_external_id(
        &self,
        tenant_id: Uuid,
        shopify_customer_id: i64,
    ) -> Result<Option<Customer>, StorageError>;

    async fn count(&self, tenant_id: Uuid) -> Result<u64, StorageError>;
}

#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Insert-or-replace keyed by `(tenant_id, shopify_order_id)`.
    async fn upsert(&self, order: &Order) -> Result<(), StorageError>;

    async fn find_by_external_id(
        &self,
        tenant_id: Uuid,
        shopify_order_id: i64,
    ) -> Result<Option<Order>, StorageError>;

    async fn count(&self, tenant_id: Uuid) -> Result<u64, StorageError>;
}

#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Insert-or-replace keyed by
    /// `(tenant_id, shopify_product_id, shopify_variant_id)`.
    async fn upsert(&self, product: &ProductRow) -> Result<(), StorageError>;

    async fn list_by_product(
        &self,
        tenant_id: Uuid,
        shopify_product_id: i64,
    ) -> Result<Vec<ProductRow>, StorageError>;

    async fn count(&self, tenant_id: Uuid) -> Result<u64, StorageError>;
}

#[async_trait]
pub trait TenantsRepository: Send + Sync {
    /// Insert-or-replace a tenant's configuration, keyed by id. Does not
    /// touch `last_sync_at` / `last_sync_status`.
    async fn upsert_config(&self, tenant: &Tenant) -> Result<(), StorageError>;

    async fn find(&self, id: Uuid) -> Result<Option<Tenant>, StorageError>;

    /// Tenants eligible for scheduled sync, re-read on every tick so
    /// tenant add/remove needs no restart.
    async fn list_active(&self) -> Result<Vec<Tenant>, StorageError>;

    async fn record_sync_outcome(
        &self,
        id: Uuid,
        status: SyncStatus,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError>;
}
