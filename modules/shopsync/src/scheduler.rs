//! Fixed-cadence schedule driver: fans one full-sync task out per active
//! tenant on every tick, with per-tenant failure isolation and at most
//! one in-flight run per tenant.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::model::SyncStatus;
use crate::domain::ports::TenantsRepository;
use crate::domain::service::SyncService;

/// Tracks which tenants have a sync run in flight. Shared between the
/// scheduler and the manual-trigger API so the two cannot double-run the
/// same tenant.
#[derive(Default)]
pub struct InFlightTenants {
    map: DashMap<Uuid, ()>,
}

impl InFlightTenants {
    /// Claims the tenant for one run; `None` when a run is already in
    /// flight. The claim is released when the guard drops.
    #[must_use]
    pub fn try_begin(self: &Arc<Self>, tenant_id: Uuid) -> Option<InFlightGuard> {
        match self.map.entry(tenant_id) {
            Entry::Occupied(_) => None,
            Entry::Vacant(vacant) => {
                vacant.insert(());
                Some(InFlightGuard {
                    tenants: Arc::clone(self),
                    tenant_id,
                })
            }
        }
    }
}

pub struct InFlightGuard {
    tenants: Arc<InFlightTenants>,
    tenant_id: Uuid,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.tenants.map.remove(&self.tenant_id);
    }
}

pub struct SyncScheduler {
    service: Arc<SyncService>,
    tenants: Arc<dyn TenantsRepository>,
    in_flight: Arc<InFlightTenants>,
    interval: Duration,
}

impl SyncScheduler {
    #[must_use]
    pub fn new(
        service: Arc<SyncService>,
        tenants: Arc<dyn TenantsRepository>,
        in_flight: Arc<InFlightTenants>,
        interval: Duration,
    ) -> Self {
        Self {
            service,
            tenants,
            in_flight,
            interval,
        }
    }

    /// Ticks until cancelled. The first tick fires immediately, so a
    /// freshly started process syncs right away. There is no persistent
    /// job queue: ticks missed while the process is down are skipped.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(interval = ?self.interval, "sync scheduler started");

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("sync scheduler stopping");
                    break;
                }
                _ = ticker.tick() => self.tick_once().await,
            }
        }
    }

    /// One scheduler tick: re-reads the active tenant list and runs a
    /// full sync per tenant, concurrently. A tenant whose previous run
    /// is still in flight is skipped. One tenant's failure never blocks
    /// the others; nothing here is fatal to the process.
    pub async fn tick_once(&self) {
        let tenants = match self.tenants.list_active().await {
            Ok(tenants) => tenants,
            Err(e) => {
                tracing::error!(error = %e, "could not list tenants, skipping tick");
                return;
            }
        };
        tracing::debug!(tenants = tenants.len(), "scheduler tick");

        let mut handles = Vec::with_capacity(tenants.len());
        for tenant in tenants {
            let Some(guard) = self.in_flight.try_begin(tenant.id) else {
                tracing::warn!(tenant_id = %tenant.id, "previous sync still in flight, skipping");
                continue;
            };
            let service = Arc::clone(&self.service);
            handles.push(tokio::spawn(async move {
                let _guard = guard;
                let report = service.sync_tenant(&tenant).await;
                if report.status() != SyncStatus::Ok {
                    for (kind, cause) in report.failures() {
                        tracing::warn!(tenant_id = %tenant.id, kind = %kind, cause, "sync failure");
                    }
                }
            }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "sync task aborted");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_most_one_claim_per_tenant() {
        let in_flight = Arc::new(InFlightTenants::default());
        let tenant = Uuid::now_v7();

        let first = in_flight.try_begin(tenant);
        assert!(first.is_some());
        assert!(in_flight.try_begin(tenant).is_none());

        drop(first);
        assert!(in_flight.try_begin(tenant).is_some());
    }

    #[test]
    fn claims_are_independent_across_tenants() {
        let in_flight = Arc::new(InFlightTenants::default());
        let a = in_flight.try_begin(Uuid::now_v7());
        let b = in_flight.try_begin(Uuid::now_v7());
        assert!(a.is_some() && b.is_some());
    }
}
