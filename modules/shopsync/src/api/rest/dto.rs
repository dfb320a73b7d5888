use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::model::{KindOutcome, SyncReport, Tenant};

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum KindOutcomeDto {
    Completed { synced: u64, skipped: u64 },
    Failed { error: String },
}

impl From<KindOutcome> for KindOutcomeDto {
    fn from(outcome: KindOutcome) -> Self {
        match outcome {
            KindOutcome::Completed { synced, skipped } => Self::Completed { synced, skipped },
            KindOutcome::Failed { error } => Self::Failed { error },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SyncReportDto {
    pub tenant_id: Uuid,
    pub status: &'static str,
    pub customers: KindOutcomeDto,
    pub orders: KindOutcomeDto,
    pub products: KindOutcomeDto,
    pub completed_at: DateTime<Utc>,
}

impl From<SyncReport> for SyncReportDto {
    fn from(report: SyncReport) -> Self {
        let status = report.status().as_str();
        Self {
            tenant_id: report.tenant_id,
            status,
            customers: report.customers.into(),
            orders: report.orders.into(),
            products: report.products.into(),
            completed_at: report.completed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SyncStatusDto {
    pub tenant_id: Uuid,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub last_sync_status: Option<&'static str>,
    pub connected: bool,
}

impl From<&Tenant> for SyncStatusDto {
    fn from(tenant: &Tenant) -> Self {
        Self {
            tenant_id: tenant.id,
            last_sync_at: tenant.last_sync_at,
            last_sync_status: tenant.last_sync_status.map(|s| s.as_str()),
            connected: !tenant.shopify_domain.is_empty(),
        }
    }
}
