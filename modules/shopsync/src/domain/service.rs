//! The sync orchestrator: drives fetch -> map -> upsert for each
//! resource kind of one tenant and aggregates counts and failures.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use super::error::{StorageError, SyncError};
use super::mapper;
use super::model::{KindOutcome, ResourceKind, SyncReport, Tenant};
use super::ports::{
    CustomersRepository, OrdersRepository, ProductsRepository, ShopSource, ShopSourceFactory,
    TenantsRepository,
};

pub struct SyncService {
    source_factory: Arc<dyn ShopSourceFactory>,
    customers: Arc<dyn CustomersRepository>,
    orders: Arc<dyn OrdersRepository>,
    products: Arc<dyn ProductsRepository>,
    tenants: Arc<dyn TenantsRepository>,
}

impl SyncService {
    #[must_use]
    pub fn new(
        source_factory: Arc<dyn ShopSourceFactory>,
        customers: Arc<dyn CustomersRepository>,
        orders: Arc<dyn OrdersRepository>,
        products: Arc<dyn ProductsRepository>,
        tenants: Arc<dyn TenantsRepository>,
    ) -> Self {
        Self {
            source_factory,
            customers,
            orders,
            products,
            tenants,
        }
    }

    /// Full sync for one tenant: customers, then orders, then products.
    ///
    /// Customers run first so order->customer links resolve on the first
    /// pass; a link that still cannot be resolved stays null and is fixed
    /// on a later run. A failure in one kind never aborts the others;
    /// every kind's outcome lands in the report.
    #[instrument(skip_all, fields(tenant_id = %tenant.id, shop = %tenant.shopify_domain))]
    pub async fn run_full_sync(&self, tenant: &Tenant) -> SyncReport {
        tracing::info!("starting full sync");
        let source = self.source_factory.source_for(tenant);

        let customers = self
            .kind_outcome(ResourceKind::Customers, self.sync_customers(tenant, &source))
            .await;
        let orders = self
            .kind_outcome(ResourceKind::Orders, self.sync_orders(tenant, &source))
            .await;
        let products = self
            .kind_outcome(ResourceKind::Products, self.sync_products(tenant, &source))
            .await;

        let report = SyncReport {
            tenant_id: tenant.id,
            customers,
            orders,
            products,
            completed_at: Utc::now(),
        };
        tracing::info!(
            status = report.status().as_str(),
            customers = report.customers.synced(),
            orders = report.orders.synced(),
            products = report.products.synced(),
            "full sync finished"
        );
        report
    }

    /// Full sync plus the per-tenant last-sync bookkeeping the operators
    /// read to detect silently-skipped ticks.
    pub async fn sync_tenant(&self, tenant: &Tenant) -> SyncReport {
        let report = self.run_full_sync(tenant).await;
        if let Err(e) = self
            .tenants
            .record_sync_outcome(tenant.id, report.status(), report.completed_at)
            .await
        {
            tracing::warn!(tenant_id = %tenant.id, error = %e, "failed to record sync outcome");
        }
        report
    }

    /// On-demand "sync now" for a single tenant looked up by id.
    pub async fn sync_now(&self, tenant_id: Uuid) -> Result<SyncReport, StorageError> {
        let tenant = self
            .tenants
            .find(tenant_id)
            .await?
            .ok_or(StorageError::TenantNotFound { id: tenant_id })?;
        Ok(self.sync_tenant(&tenant).await)
    }

    async fn kind_outcome(
        &self,
        kind: ResourceKind,
        fut: impl std::future::Future<Output = Result<(u64, u64), SyncError>>,
    ) -> KindOutcome {
        match fut.await {
            Ok((synced, skipped)) => {
                tracing::info!(kind = %kind, synced, skipped, "resource kind synced");
                KindOutcome::Completed { synced, skipped }
            }
            Err(e) => {
                tracing::error!(kind = %kind, error = %e, "resource kind sync failed");
                KindOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn sync_customers(
        &self,
        tenant: &Tenant,
        source: &Arc<dyn ShopSource>,
    ) -> Result<(u64, u64), SyncError> {
        let mut cursor = None;
        let mut synced = 0u64;
        let mut skipped = 0u64;

        loop {
            let page = source.fetch_page(ResourceKind::Customers, cursor).await?;
            if page.is_empty() {
                break;
            }
            let page_len = page.len();
            cursor = last_external_id(&page);

            for record in page {
                match mapper::customer_from_record(tenant.id, record) {
                    Ok(customer) => {
                        self.customers.upsert(&customer).await?;
                        synced += 1;
                    }
                    Err(e) => {
                        skipped += 1;
                        tracing::warn!(kind = "customers", error = %e, "skipping malformed record");
                    }
                }
            }

            if page_len < source.page_size() {
                break;
            }
            if cursor.is_none() {
                tracing::warn!(kind = "customers", "last record has no id, cannot advance cursor");
                break;
            }
        }
        Ok((synced, skipped))
    }

    async fn sync_orders(
        &self,
        tenant: &Tenant,
        source: &Arc<dyn ShopSource>,
    ) -> Result<(u64, u64), SyncError> {
        let mut cursor = None;
        let mut synced = 0u64;
        let mut skipped = 0u64;

        loop {
            let page = source.fetch_page(ResourceKind::Orders, cursor).await?;
            if page.is_empty() {
                break;
            }
            let page_len = page.len();
            cursor = last_external_id(&page);

            for record in page {
                match mapper::order_from_record(tenant.id, record) {
                    Ok(mut order) => {
                        // Link resolution happens right before the upsert;
                        // unresolved links stay null, never an error.
                        if let Some(ext_id) = order.shopify_customer_id {
                            order.customer_id =
                                self.customers.find_ref(tenant.id, ext_id).await?;
                        }
                        self.orders.upsert(&order).await?;
                        synced += 1;
                    }
                    Err(e) => {
                        skipped += 1;
                        tracing::warn!(kind = "orders", error = %e, "skipping malformed record");
                    }
                }
            }

            if page_len < source.page_size() {
                break;
            }
            if cursor.is_none() {
                tracing::warn!(kind = "orders", "last record has no id, cannot advance cursor");
                break;
            }
        }
        Ok((synced, skipped))
    }

    async fn sync_products(
        &self,
        tenant: &Tenant,
        source: &Arc<dyn ShopSource>,
    ) -> Result<(u64, u64), SyncError> {
        let mut cursor = None;
        let mut synced = 0u64;
        let mut skipped = 0u64;

        loop {
            let page = source.fetch_page(ResourceKind::Products, cursor).await?;
            if page.is_empty() {
                break;
            }
            let page_len = page.len();
            cursor = last_external_id(&page);

            for record in page {
                match mapper::product_rows_from_record(tenant.id, record) {
                    Ok(rows) => {
                        for row in &rows {
                            self.products.upsert(row).await?;
                            synced += 1;
                        }
                    }
                    Err(e) => {
                        skipped += 1;
                        tracing::warn!(kind = "products", error = %e, "skipping malformed record");
                    }
                }
            }

            if page_len < source.page_size() {
                break;
            }
            if cursor.is_none() {
                tracing::warn!(kind = "products", "last record has no id, cannot advance cursor");
                break;
            }
        }
        Ok((synced, skipped))
    }
}

/// Since-id cursor for the next page: the external id of the last record
/// of the current page.
fn last_external_id(page: &[Value]) -> Option<i64> {
    page.last().and_then(|r| r.get("id")).and_then(Value::as_i64)
}
