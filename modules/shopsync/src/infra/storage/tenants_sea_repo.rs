use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::domain::error::StorageError;
use crate::domain::model::{SyncStatus, Tenant, TenantStatus};
use crate::domain::ports::TenantsRepository;

use super::entity::tenant::{ActiveModel, Column, Entity as TenantEntity, Model};

pub struct SeaOrmTenantsRepository {
    db: DatabaseConnection,
}

impl SeaOrmTenantsRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(m: Model) -> Result<Tenant, StorageError> {
    let status =
        TenantStatus::parse(&m.status).ok_or_else(|| StorageError::decode("status", m.status))?;
    let last_sync_status = m
        .last_sync_status
        .map(|s| SyncStatus::parse(&s).ok_or_else(|| StorageError::decode("last_sync_status", s)))
        .transpose()?;
    Ok(Tenant {
        id: m.id,
        name: m.name,
        shopify_domain: m.shopify_domain,
        access_token: SecretString::from(m.access_token),
        status,
        last_sync_at: m.last_sync_at,
        last_sync_status,
    })
}

#[async_trait]
impl TenantsRepository for SeaOrmTenantsRepository {
    async fn upsert_config(&self, tenant: &Tenant) -> Result<(), StorageError> {
        let now = Utc::now();
        let m = ActiveModel {
            id: Set(tenant.id),
            name: Set(tenant.name.clone()),
            shopify_domain: Set(tenant.shopify_domain.clone()),
            access_token: Set(tenant.access_token.expose_secret().to_owned()),
            status: Set(tenant.status.as_str().to_owned()),
            last_sync_at: Set(None),
            last_sync_status: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // Configuration fields only; sync bookkeeping is left alone.
        TenantEntity::insert(m)
            .on_conflict(
                OnConflict::column(Column::Id)
                    .update_columns([
                        Column::Name,
                        Column::ShopifyDomain,
                        Column::AccessToken,
                        Column::Status,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Tenant>, StorageError> {
        let found = TenantEntity::find_by_id(id).one(&self.db).await?;
        found.map(to_domain).transpose()
    }

    async fn list_active(&self) -> Result<Vec<Tenant>, StorageError> {
        let rows = TenantEntity::find()
            .filter(Column::Status.eq(TenantStatus::Active.as_str()))
            .all(&self.db)
            .await?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn record_sync_outcome(
        &self,
        id: Uuid,
        status: SyncStatus,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        TenantEntity::update_many()
            .col_expr(Column::LastSyncAt, Expr::value(at))
            .col_expr(Column::LastSyncStatus, Expr::value(status.as_str()))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
