use sea_orm::entity::prelude::*;
use uuid::Uuid;

/// One row per product variant; a source product with N variants expands
/// to N rows sharing `shopify_product_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub shopify_product_id: i64,
    pub shopify_variant_id: i64,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub inventory: i32,
    pub sku: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
