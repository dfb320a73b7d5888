use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let conn = manager.get_connection();

        let sql = match backend {
            sea_orm::DatabaseBackend::Postgres => {
                r#"
CREATE TABLE IF NOT EXISTS tenants (
    id UUID PRIMARY KEY NOT NULL,
    name VARCHAR(255) NOT NULL,
    shopify_domain VARCHAR(255) NOT NULL,
    access_token TEXT NOT NULL,
    status VARCHAR(16) NOT NULL,
    last_sync_at TIMESTAMPTZ,
    last_sync_status VARCHAR(16),
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tenants_status ON tenants(status);

CREATE TABLE IF NOT EXISTS customers (
    id UUID PRIMARY KEY NOT NULL,
    tenant_id UUID NOT NULL,
    shopify_customer_id BIGINT NOT NULL,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    total_spent DECIMAL(12, 2) NOT NULL,
    orders_count INTEGER NOT NULL,
    location VARCHAR(255),
    segment VARCHAR(16) NOT NULL,
    phone VARCHAR(64),
    tags TEXT,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_customers_natural_key
    ON customers(tenant_id, shopify_customer_id);
CREATE INDEX IF NOT EXISTS idx_customers_tenant_segment ON customers(tenant_id, segment);

CREATE TABLE IF NOT EXISTS orders (
    id UUID PRIMARY KEY NOT NULL,
    tenant_id UUID NOT NULL,
    shopify_order_id BIGINT NOT NULL,
    order_number VARCHAR(64) NOT NULL,
    customer_id UUID,
    shopify_customer_id BIGINT,
    customer_name VARCHAR(255) NOT NULL,
    amount DECIMAL(12, 2) NOT NULL,
    currency VARCHAR(8) NOT NULL,
    status VARCHAR(16) NOT NULL,
    items_count INTEGER NOT NULL,
    placed_at TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_orders_natural_key
    ON orders(tenant_id, shopify_order_id);
CREATE INDEX IF NOT EXISTS idx_orders_tenant_customer ON orders(tenant_id, customer_id);
CREATE INDEX IF NOT EXISTS idx_orders_tenant_status ON orders(tenant_id, status);

CREATE TABLE IF NOT EXISTS products (
    id UUID PRIMARY KEY NOT NULL,
    tenant_id UUID NOT NULL,
    shopify_product_id BIGINT NOT NULL,
    shopify_variant_id BIGINT NOT NULL,
    name VARCHAR(512) NOT NULL,
    price DECIMAL(10, 2) NOT NULL,
    category VARCHAR(255) NOT NULL,
    inventory INTEGER NOT NULL,
    sku VARCHAR(255),
    status VARCHAR(16) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_products_natural_key
    ON products(tenant_id, shopify_product_id, shopify_variant_id);
CREATE INDEX IF NOT EXISTS idx_products_tenant_category ON products(tenant_id, category);
                "#
            }
            sea_orm::DatabaseBackend::MySql => {
                r#"
CREATE TABLE IF NOT EXISTS tenants (
    id VARCHAR(36) PRIMARY KEY NOT NULL,
    name VARCHAR(255) NOT NULL,
    shopify_domain VARCHAR(255) NOT NULL,
    access_token TEXT NOT NULL,
    status VARCHAR(16) NOT NULL,
    last_sync_at TIMESTAMP NULL,
    last_sync_status VARCHAR(16) NULL,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL,
    KEY idx_tenants_status (status)
);

CREATE TABLE IF NOT EXISTS customers (
    id VARCHAR(36) PRIMARY KEY NOT NULL,
    tenant_id VARCHAR(36) NOT NULL,
    shopify_customer_id BIGINT NOT NULL,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    total_spent DECIMAL(12, 2) NOT NULL,
    orders_count INT NOT NULL,
    location VARCHAR(255) NULL,
    segment VARCHAR(16) NOT NULL,
    phone VARCHAR(64) NULL,
    tags TEXT NULL,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL,
    UNIQUE KEY idx_customers_natural_key (tenant_id, shopify_customer_id),
    KEY idx_customers_tenant_segment (tenant_id, segment)
);

CREATE TABLE IF NOT EXISTS orders (
    id VARCHAR(36) PRIMARY KEY NOT NULL,
    tenant_id VARCHAR(36) NOT NULL,
    shopify_order_id BIGINT NOT NULL,
    order_number VARCHAR(64) NOT NULL,
    customer_id VARCHAR(36) NULL,
    shopify_customer_id BIGINT NULL,
    customer_name VARCHAR(255) NOT NULL,
    amount DECIMAL(12, 2) NOT NULL,
    currency VARCHAR(8) NOT NULL,
    status VARCHAR(16) NOT NULL,
    items_count INT NOT NULL,
    placed_at TIMESTAMP NOT NULL,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL,
    UNIQUE KEY idx_orders_natural_key (tenant_id, shopify_order_id),
    KEY idx_orders_tenant_customer (tenant_id, customer_id),
    KEY idx_orders_tenant_status (tenant_id, status)
);

CREATE TABLE IF NOT EXISTS products (
    id VARCHAR(36) PRIMARY KEY NOT NULL,
    tenant_id VARCHAR(36) NOT NULL,
    shopify_product_id BIGINT NOT NULL,
    shopify_variant_id BIGINT NOT NULL,
    name VARCHAR(512) NOT NULL,
    price DECIMAL(10, 2) NOT NULL,
    category VARCHAR(255) NOT NULL,
    inventory INT NOT NULL,
    sku VARCHAR(255) NULL,
    status VARCHAR(16) NOT NULL,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL,
    UNIQUE KEY idx_products_natural_key (tenant_id, shopify_product_id, shopify_variant_id),
    KEY idx_products_tenant_category (tenant_id, category)
);
                "#
            }
            sea_orm::DatabaseBackend::Sqlite => {
                r#"
CREATE TABLE IF NOT EXISTS tenants (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    shopify_domain TEXT NOT NULL,
    access_token TEXT NOT NULL,
    status TEXT NOT NULL,
    last_sync_at TEXT,
    last_sync_status TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tenants_status ON tenants(status);

CREATE TABLE IF NOT EXISTS customers (
    id TEXT PRIMARY KEY NOT NULL,
    tenant_id TEXT NOT NULL,
    shopify_customer_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    total_spent TEXT NOT NULL,
    orders_count INTEGER NOT NULL,
    location TEXT,
    segment TEXT NOT NULL,
    phone TEXT,
    tags TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_customers_natural_key
    ON customers(tenant_id, shopify_customer_id);
CREATE INDEX IF NOT EXISTS idx_customers_tenant_segment ON customers(tenant_id, segment);

CREATE TABLE IF NOT EXISTS orders (
    id TEXT PRIMARY KEY NOT NULL,
    tenant_id TEXT NOT NULL,
    shopify_order_id INTEGER NOT NULL,
    order_number TEXT NOT NULL,
    customer_id TEXT,
    shopify_customer_id INTEGER,
    customer_name TEXT NOT NULL,
    amount TEXT NOT NULL,
    currency TEXT NOT NULL,
    status TEXT NOT NULL,
    items_count INTEGER NOT NULL,
    placed_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_orders_natural_key
    ON orders(tenant_id, shopify_order_id);
CREATE INDEX IF NOT EXISTS idx_orders_tenant_customer ON orders(tenant_id, customer_id);
CREATE INDEX IF NOT EXISTS idx_orders_tenant_status ON orders(tenant_id, status);

CREATE TABLE IF NOT EXISTS products (
    id TEXT PRIMARY KEY NOT NULL,
    tenant_id TEXT NOT NULL,
    shopify_product_id INTEGER NOT NULL,
    shopify_variant_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    price TEXT NOT NULL,
    category TEXT NOT NULL,
    inventory INTEGER NOT NULL,
    sku TEXT,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_products_natural_key
    ON products(tenant_id, shopify_product_id, shopify_variant_id);
CREATE INDEX IF NOT EXISTS idx_products_tenant_category ON products(tenant_id, category);
                "#
            }
        };

        conn.execute_unprepared(sql).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        let sql = r#"
DROP TABLE IF EXISTS products;
DROP TABLE IF EXISTS orders;
DROP TABLE IF EXISTS customers;
DROP TABLE IF EXISTS tenants;
        "#;
        conn.execute_unprepared(sql).await?;
        Ok(())
    }
}
