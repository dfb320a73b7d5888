//! Shared fixtures: an in-memory store with migrations applied and a
//! sync service wired against a stub HTTP source.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use httpmock::Mock;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use secrecy::SecretString;
use serde_json::{json, Value};
use uuid::Uuid;

use shopsync::config::SourceConfig;
use shopsync::domain::model::{ResourceKind, Tenant, TenantStatus};
use shopsync::domain::ports::{
    CustomersRepository, OrdersRepository, ProductsRepository, ShopSourceFactory,
    TenantsRepository,
};
use shopsync::infra::source::RestSourceFactory;
use shopsync::infra::storage::{
    self, migrations::Migrator, SeaOrmCustomersRepository, SeaOrmOrdersRepository,
    SeaOrmProductsRepository, SeaOrmTenantsRepository,
};
use shopsync::scheduler::InFlightTenants;
use shopsync::SyncService;

pub const API_VERSION: &str = "2024-07";

pub struct TestApp {
    pub service: Arc<SyncService>,
    pub customers: Arc<dyn CustomersRepository>,
    pub orders: Arc<dyn OrdersRepository>,
    pub products: Arc<dyn ProductsRepository>,
    pub tenants: Arc<dyn TenantsRepository>,
    pub in_flight: Arc<InFlightTenants>,
}

pub async fn test_db() -> DatabaseConnection {
    let db = storage::connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    Migrator::up(&db, None).await.expect("migrations");
    db
}

/// Service stack talking to `server` instead of a real store, with a
/// small page size so pagination is exercised without bulky payloads.
pub async fn test_app(server: &MockServer, page_size: usize) -> TestApp {
    let db = test_db().await;

    let customers: Arc<dyn CustomersRepository> =
        Arc::new(SeaOrmCustomersRepository::new(db.clone()));
    let orders: Arc<dyn OrdersRepository> = Arc::new(SeaOrmOrdersRepository::new(db.clone()));
    let products: Arc<dyn ProductsRepository> =
        Arc::new(SeaOrmProductsRepository::new(db.clone()));
    let tenants: Arc<dyn TenantsRepository> = Arc::new(SeaOrmTenantsRepository::new(db));

    let source_factory: Arc<dyn ShopSourceFactory> = Arc::new(
        RestSourceFactory::new(SourceConfig {
            page_size,
            api_version: API_VERSION.to_owned(),
            http_timeout: Duration::from_secs(5),
            base_url: Some(server.base_url()),
        })
        .expect("source factory"),
    );

    let service = Arc::new(SyncService::new(
        source_factory,
        Arc::clone(&customers),
        Arc::clone(&orders),
        Arc::clone(&products),
        Arc::clone(&tenants),
    ));

    TestApp {
        service,
        customers,
        orders,
        products,
        tenants,
        in_flight: Arc::new(InFlightTenants::default()),
    }
}

pub fn tenant(name: &str) -> Tenant {
    Tenant {
        id: Uuid::now_v7(),
        name: name.to_owned(),
        shopify_domain: format!("{}.myshopify.com", name.to_lowercase()),
        access_token: SecretString::from("shpat_test".to_owned()),
        status: TenantStatus::Active,
        last_sync_at: None,
        last_sync_status: None,
    }
}

fn kind_path(kind: ResourceKind) -> String {
    format!("/admin/api/{API_VERSION}/{kind}.json")
}

/// Stub one page of `kind` for a given cursor position.
pub async fn mock_page<'a>(
    server: &'a MockServer,
    kind: ResourceKind,
    since_id: i64,
    records: Vec<Value>,
) -> Mock<'a> {
    let mut envelope = serde_json::Map::new();
    envelope.insert(kind.as_str().to_owned(), Value::Array(records));
    let body = Value::Object(envelope);
    server
        .mock_async(move |when, then| {
            when.method(GET)
                .path(kind_path(kind))
                .query_param("since_id", since_id.to_string());
            then.status(200).json_body(body);
        })
        .await
}

/// Stub an empty first page for every kind except the listed ones.
pub async fn mock_empty_except(server: &MockServer, except: &[ResourceKind]) {
    for kind in [
        ResourceKind::Customers,
        ResourceKind::Orders,
        ResourceKind::Products,
    ] {
        if !except.contains(&kind) {
            mock_page(server, kind, 0, vec![]).await;
        }
    }
}

pub fn customer_record(id: i64, first_name: &str, total_spent: &str) -> Value {
    json!({
        "id": id,
        "first_name": first_name,
        "last_name": "Example",
        "email": format!("{}@example.com", first_name.to_lowercase()),
        "total_spent": total_spent,
        "orders_count": 2,
        "default_address": { "city": "Boston", "country": "US" }
    })
}

pub fn order_record(id: i64, customer: Option<(i64, &str)>) -> Value {
    let mut record = json!({
        "id": id,
        "order_number": 1000 + id,
        "total_price": "49.90",
        "currency": "USD",
        "financial_status": "paid",
        "fulfillment_status": "fulfilled",
        "line_items": [{}, {}],
        "created_at": "2026-08-01T12:00:00Z"
    });
    if let Some((customer_id, first_name)) = customer {
        record["customer"] = json!({
            "id": customer_id,
            "first_name": first_name,
            "last_name": "Example"
        });
    }
    record
}

pub fn product_record(id: i64, title: &str, variants: Vec<Value>) -> Value {
    json!({
        "id": id,
        "title": title,
        "product_type": "Apparel",
        "status": "active",
        "variants": variants
    })
}

pub fn variant(id: i64, title: &str, price: &str) -> Value {
    json!({ "id": id, "title": title, "price": price, "inventory_quantity": 5, "sku": format!("SKU-{id}") })
}
