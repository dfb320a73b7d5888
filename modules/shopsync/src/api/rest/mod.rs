mod dto;
mod error;
mod handlers;
mod routes;

pub use dto::{KindOutcomeDto, SyncReportDto, SyncStatusDto};
pub use error::ApiError;
pub use routes::{router, AppState};
