use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::error::StorageError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("tenant not found: {0}")]
    TenantNotFound(Uuid),

    #[error("a sync is already in flight for tenant {0}")]
    SyncInFlight(Uuid),

    #[error("internal storage error")]
    Storage(#[source] StorageError),
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::TenantNotFound { id } => Self::TenantNotFound(id),
            other => Self::Storage(other),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            Self::TenantNotFound(_) => (StatusCode::NOT_FOUND, "tenant_not_found"),
            Self::SyncInFlight(_) => (StatusCode::CONFLICT, "sync_in_flight"),
            Self::Storage(e) => {
                // Internals are logged, not exposed.
                tracing::error!(error = %e, "storage error while handling request");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };
        let body = ErrorBody {
            error,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
