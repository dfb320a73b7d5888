use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub shopify_order_id: i64,
    pub order_number: String,
    /// Internal customer link; null for guest checkouts and for orders
    /// whose customer has not been synced yet.
    pub customer_id: Option<Uuid>,
    pub shopify_customer_id: Option<i64>,
    pub customer_name: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub items_count: i32,
    pub placed_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
