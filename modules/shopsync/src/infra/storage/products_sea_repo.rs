use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::error::StorageError;
use crate::domain::model::{ProductRow, ProductStatus};
use crate::domain::ports::ProductsRepository;

use super::entity::product::{ActiveModel, Column, Entity as ProductEntity, Model};

pub struct SeaOrmProductsRepository {
    db: DatabaseConnection,
}

impl SeaOrmProductsRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(m: Model) -> Result<ProductRow, StorageError> {
    let status =
        ProductStatus::parse(&m.status).ok_or_else(|| StorageError::decode("status", m.status))?;
    Ok(ProductRow {
        tenant_id: m.tenant_id,
        shopify_product_id: m.shopify_product_id,
        shopify_variant_id: m.shopify_variant_id,
        name: m.name,
        price: m.price,
        category: m.category,
        inventory: m.inventory,
        sku: m.sku,
        status,
    })
}

#[async_trait]
impl ProductsRepository for SeaOrmProductsRepository {
    async fn upsert(&self, product: &ProductRow) -> Result<(), StorageError> {
        let now = Utc::now();
        let m = ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(product.tenant_id),
            shopify_product_id: Set(product.shopify_product_id),
            shopify_variant_id: Set(product.shopify_variant_id),
            name: Set(product.name.clone()),
            price: Set(product.price),
            category: Set(product.category.clone()),
            inventory: Set(product.inventory),
            sku: Set(product.sku.clone()),
            status: Set(product.status.as_str().to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        ProductEntity::insert(m)
            .on_conflict(
                OnConflict::columns([
                    Column::TenantId,
                    Column::ShopifyProductId,
                    Column::ShopifyVariantId,
                ])
                .update_columns([
                    Column::Name,
                    Column::Price,
                    Column::Category,
                    Column::Inventory,
                    Column::Sku,
                    Column::Status,
                    Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn list_by_product(
        &self,
        tenant_id: Uuid,
        shopify_product_id: i64,
    ) -> Result<Vec<ProductRow>, StorageError> {
        let rows = ProductEntity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::ShopifyProductId.eq(shopify_product_id))
            .order_by_asc(Column::ShopifyVariantId)
            .all(&self.db)
            .await?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn count(&self, tenant_id: Uuid) -> Result<u64, StorageError> {
        let count = ProductEntity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
