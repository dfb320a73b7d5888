use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::domain::ports::TenantsRepository;
use crate::domain::service::SyncService;
use crate::scheduler::InFlightTenants;

use super::handlers;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SyncService>,
    pub tenants: Arc<dyn TenantsRepository>,
    pub in_flight: Arc<InFlightTenants>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/sync/{tenant_id}", post(handlers::sync_now))
        .route("/api/sync/{tenant_id}/status", get(handlers::sync_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
