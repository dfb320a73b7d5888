//! Multi-tenant Shopify data synchronization.
//!
//! The crate is laid out in three layers: `domain` holds the models,
//! pure mappers, ports and the sync orchestrator; `infra` holds the
//! REST source client and the sea-orm storage adapters; `api` and
//! `scheduler` are the two entry points that drive a sync, on demand
//! and on a fixed cadence.

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod scheduler;

pub use domain::service::SyncService;
