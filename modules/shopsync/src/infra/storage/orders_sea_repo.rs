use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::domain::error::StorageError;
use crate::domain::model::{Order, OrderStatus};
use crate::domain::ports::OrdersRepository;

use super::entity::order::{ActiveModel, Column, Entity as OrderEntity, Model};

pub struct SeaOrmOrdersRepository {
    db: DatabaseConnection,
}

impl SeaOrmOrdersRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(m: Model) -> Result<Order, StorageError> {
    let status =
        OrderStatus::parse(&m.status).ok_or_else(|| StorageError::decode("status", m.status))?;
    Ok(Order {
        tenant_id: m.tenant_id,
        shopify_order_id: m.shopify_order_id,
        order_number: m.order_number,
        customer_id: m.customer_id,
        shopify_customer_id: m.shopify_customer_id,
        customer_name: m.customer_name,
        amount: m.amount,
        currency: m.currency,
        status,
        items_count: m.items_count,
        placed_at: m.placed_at,
    })
}

#[async_trait]
impl OrdersRepository for SeaOrmOrdersRepository {
    async fn upsert(&self, order: &Order) -> Result<(), StorageError> {
        let now = Utc::now();
        let m = ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(order.tenant_id),
            shopify_order_id: Set(order.shopify_order_id),
            order_number: Set(order.order_number.clone()),
            customer_id: Set(order.customer_id),
            shopify_customer_id: Set(order.shopify_customer_id),
            customer_name: Set(order.customer_name.clone()),
            amount: Set(order.amount),
            currency: Set(order.currency.clone()),
            status: Set(order.status.as_str().to_owned()),
            items_count: Set(order.items_count),
            placed_at: Set(order.placed_at),
            created_at: Set(now),
            updated_at: Set(now),
        };

        OrderEntity::insert(m)
            .on_conflict(
                OnConflict::columns([Column::TenantId, Column::ShopifyOrderId])
                    .update_columns([
                        Column::OrderNumber,
                        Column::CustomerId,
                        Column::ShopifyCustomerId,
                        Column::CustomerName,
                        Column::Amount,
                        Column::Currency,
                        Column::Status,
                        Column::ItemsCount,
                        Column::PlacedAt,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn find_by_external_id(
        &self,
        tenant_id: Uuid,
        shopify_order_id: i64,
    ) -> Result<Option<Order>, StorageError> {
        let found = OrderEntity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::ShopifyOrderId.eq(shopify_order_id))
            .one(&self.db)
            .await?;
        found.map(to_domain).transpose()
    }

    async fn count(&self, tenant_id: Uuid) -> Result<u64, StorageError> {
        let count = OrderEntity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
