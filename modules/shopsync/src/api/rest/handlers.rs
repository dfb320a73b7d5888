use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use super::error::ApiError;
use super::routes::AppState;
use super::dto::{SyncReportDto, SyncStatusDto};

pub(super) async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Operator-triggered "sync now" with the same orchestration contract as
/// the scheduler. 409 when that tenant already has a run in flight.
pub(super) async fn sync_now(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<SyncReportDto>, ApiError> {
    let tenant = state
        .tenants
        .find(tenant_id)
        .await?
        .ok_or(ApiError::TenantNotFound(tenant_id))?;

    let Some(_guard) = state.in_flight.try_begin(tenant_id) else {
        return Err(ApiError::SyncInFlight(tenant_id));
    };

    tracing::info!(tenant_id = %tenant_id, "manual sync requested");
    let report = state.service.sync_tenant(&tenant).await;
    Ok(Json(report.into()))
}

pub(super) async fn sync_status(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<SyncStatusDto>, ApiError> {
    let tenant = state
        .tenants
        .find(tenant_id)
        .await?
        .ok_or(ApiError::TenantNotFound(tenant_id))?;
    Ok(Json(SyncStatusDto::from(&tenant)))
}
