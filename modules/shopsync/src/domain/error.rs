use thiserror::Error;
use uuid::Uuid;

/// Failure against the external source store. Fails the resource kind it
/// occurred in; sibling kinds and sibling tenants continue.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request to source failed: {message}")]
    Request { message: String },

    #[error("source returned HTTP {status}")]
    Status { status: u16 },

    #[error("source response was not valid JSON: {message}")]
    Decode { message: String },
}

impl SourceError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Failure in the storage sink. Previously written rows stay intact;
/// each record's upsert is independently correct.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {message}")]
    Database { message: String },

    #[error("stored {field} value '{value}' could not be decoded")]
    Decode { field: &'static str, value: String },

    #[error("tenant not found: {id}")]
    TenantNotFound { id: Uuid },
}

impl StorageError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn decode(field: &'static str, value: impl Into<String>) -> Self {
        Self::Decode {
            field,
            value: value.into(),
        }
    }
}

impl From<sea_orm::DbErr> for StorageError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::database(e.to_string())
    }
}

/// Error for one resource kind within a full sync run.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
