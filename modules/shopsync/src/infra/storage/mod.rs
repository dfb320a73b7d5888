pub mod entity;
pub mod migrations;

mod customers_sea_repo;
mod orders_sea_repo;
mod products_sea_repo;
mod tenants_sea_repo;

pub use customers_sea_repo::SeaOrmCustomersRepository;
pub use orders_sea_repo::SeaOrmOrdersRepository;
pub use products_sea_repo::SeaOrmProductsRepository;
pub use tenants_sea_repo::SeaOrmTenantsRepository;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Connect to the store behind the given DSN.
///
/// In-memory SQLite is pinned to a single pooled connection; with a
/// larger pool every connection would see its own empty database.
///
/// # Errors
///
/// Fails when the DSN is malformed or the database is unreachable.
pub async fn connect(dsn: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(dsn.to_owned());
    if dsn.starts_with("sqlite::memory:") {
        options.max_connections(1);
    }
    options.sqlx_logging(false);
    Database::connect(options).await
}
