use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::domain::error::StorageError;
use crate::domain::model::{Customer, Segment};
use crate::domain::ports::CustomersRepository;

use super::entity::customer::{ActiveModel, Column, Entity as CustomerEntity, Model};

/// ORM-backed implementation of the customers sink.
pub struct SeaOrmCustomersRepository {
    db: DatabaseConnection,
}

impl SeaOrmCustomersRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(m: Model) -> Result<Customer, StorageError> {
    let segment =
        Segment::parse(&m.segment).ok_or_else(|| StorageError::decode("segment", m.segment))?;
    Ok(Customer {
        tenant_id: m.tenant_id,
        shopify_customer_id: m.shopify_customer_id,
        name: m.name,
        email: m.email,
        total_spent: m.total_spent,
        orders_count: m.orders_count,
        location: m.location,
        segment,
        phone: m.phone,
        tags: m.tags,
    })
}

#[async_trait]
impl CustomersRepository for SeaOrmCustomersRepository {
    async fn upsert(&self, customer: &Customer) -> Result<(), StorageError> {
        let now = Utc::now();
        let m = ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(customer.tenant_id),
            shopify_customer_id: Set(customer.shopify_customer_id),
            name: Set(customer.name.clone()),
            email: Set(customer.email.clone()),
            total_spent: Set(customer.total_spent),
            orders_count: Set(customer.orders_count),
            location: Set(customer.location.clone()),
            segment: Set(customer.segment.as_str().to_owned()),
            phone: Set(customer.phone.clone()),
            tags: Set(customer.tags.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // Full replace on conflict; internal id and created_at survive.
        CustomerEntity::insert(m)
            .on_conflict(
                OnConflict::columns([Column::TenantId, Column::ShopifyCustomerId])
                    .update_columns([
                        Column::Name,
                        Column::Email,
                        Column::TotalSpent,
                        Column::OrdersCount,
                        Column::Location,
                        Column::Segment,
                        Column::Phone,
                        Column::Tags,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn find_ref(
        &self,
        tenant_id: Uuid,
        shopify_customer_id: i64,
    ) -> Result<Option<Uuid>, StorageError> {
        let found = CustomerEntity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::ShopifyCustomerId.eq(shopify_customer_id))
            .one(&self.db)
            .await?;
        Ok(found.map(|m| m.id))
    }

    async fn find_by_external_id(
        &self,
        tenant_id: Uuid,
        shopify_customer_id: i64,
    ) -> Result<Option<Customer>, StorageError> {
        let found = CustomerEntity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::ShopifyCustomerId.eq(shopify_customer_id))
            .one(&self.db)
            .await?;
        found.map(to_domain).transpose()
    }

    async fn count(&self, tenant_id: Uuid) -> Result<u64, StorageError> {
        let count = CustomerEntity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
