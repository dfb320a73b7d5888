//! Pure mapping from raw source records to normalized entities.
//!
//! Every function here is total for any JSON the source can produce:
//! missing optional fields default deterministically (empty strings,
//! zero amounts, zero inventory). A record that does not match the
//! expected shape at all is a [`MappingError`]; the orchestrator skips
//! it, logs it, and counts it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use super::model::{Customer, Order, OrderStatus, ProductRow, ProductStatus, Segment};

/// Shopify's marker for the implicit single variant of a product.
const DEFAULT_VARIANT_TITLE: &str = "Default Title";

#[derive(Error, Debug)]
#[error("record does not match the expected shape: {message}")]
pub struct MappingError {
    pub message: String,
}

impl From<serde_json::Error> for MappingError {
    fn from(e: serde_json::Error) -> Self {
        Self {
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CustomerResource {
    id: i64,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    total_spent: Option<String>,
    #[serde(default)]
    orders_count: Option<i32>,
    #[serde(default)]
    default_address: Option<AddressResource>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    tags: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AddressResource {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderResource {
    id: i64,
    #[serde(default)]
    order_number: Option<i64>,
    #[serde(default)]
    customer: Option<OrderCustomerResource>,
    #[serde(default)]
    total_price: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    financial_status: Option<String>,
    #[serde(default)]
    fulfillment_status: Option<String>,
    #[serde(default)]
    line_items: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct OrderCustomerResource {
    id: i64,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductResource {
    id: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    product_type: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    variants: Option<Vec<VariantResource>>,
}

#[derive(Debug, Deserialize)]
struct VariantResource {
    id: i64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    inventory_quantity: Option<i32>,
    #[serde(default)]
    sku: Option<String>,
}

/// Absent or malformed monetary strings parse to zero.
fn parse_money(raw: Option<&str>) -> Decimal {
    raw.and_then(|s| s.trim().parse::<Decimal>().ok())
        .unwrap_or_default()
}

fn joined_name(first: Option<&str>, last: Option<&str>) -> String {
    format!(
        "{} {}",
        first.unwrap_or_default().trim(),
        last.unwrap_or_default().trim()
    )
    .trim()
    .to_owned()
}

/// `total_spent >= 1000 -> VIP`, `>= 100 -> Regular`, else `New`.
#[must_use]
pub fn classify_segment(total_spent: Decimal) -> Segment {
    if total_spent >= Decimal::from(1000) {
        Segment::Vip
    } else if total_spent >= Decimal::from(100) {
        Segment::Regular
    } else {
        Segment::New
    }
}

/// Fixed priority, first match wins: fulfillment `fulfilled`, then
/// fulfillment `partial`, then financial `pending`, then financial
/// `voided`/`refunded`, else `Processing`. An order can be pending and
/// partially fulfilled at the same time; the fulfillment checks win.
#[must_use]
pub fn classify_order_status(
    fulfillment_status: Option<&str>,
    financial_status: Option<&str>,
) -> OrderStatus {
    match (fulfillment_status, financial_status) {
        (Some("fulfilled"), _) => OrderStatus::Fulfilled,
        (Some("partial"), _) => OrderStatus::Processing,
        (_, Some("pending")) => OrderStatus::Pending,
        (_, Some("voided" | "refunded")) => OrderStatus::Cancelled,
        _ => OrderStatus::Processing,
    }
}

pub fn customer_from_record(
    tenant_id: Uuid,
    record: serde_json::Value,
) -> Result<Customer, MappingError> {
    let dto: CustomerResource = serde_json::from_value(record)?;

    let name = match joined_name(dto.first_name.as_deref(), dto.last_name.as_deref()) {
        n if n.is_empty() => "Unknown".to_owned(),
        n => n,
    };
    let total_spent = parse_money(dto.total_spent.as_deref());
    let location = dto.default_address.as_ref().and_then(|a| {
        let parts: Vec<&str> = [a.city.as_deref(), a.country.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    });

    Ok(Customer {
        tenant_id,
        shopify_customer_id: dto.id,
        name,
        email: dto.email.unwrap_or_default(),
        segment: classify_segment(total_spent),
        total_spent,
        orders_count: dto.orders_count.unwrap_or(0),
        location,
        phone: dto.phone,
        tags: dto.tags,
    })
}

/// Maps an order without resolving the customer link; `customer_id` is a
/// sink-time concern and starts out `None`. Orders with no customer
/// reference get the literal `Guest` display name.
pub fn order_from_record(
    tenant_id: Uuid,
    record: serde_json::Value,
) -> Result<Order, MappingError> {
    let dto: OrderResource = serde_json::from_value(record)?;

    let customer_name = dto
        .customer
        .as_ref()
        .map(|c| joined_name(c.first_name.as_deref(), c.last_name.as_deref()))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Guest".to_owned());

    Ok(Order {
        tenant_id,
        shopify_order_id: dto.id,
        order_number: dto.order_number.unwrap_or(dto.id).to_string(),
        customer_id: None,
        shopify_customer_id: dto.customer.as_ref().map(|c| c.id),
        customer_name,
        amount: parse_money(dto.total_price.as_deref()),
        currency: dto.currency.unwrap_or_else(|| "USD".to_owned()),
        status: classify_order_status(
            dto.fulfillment_status.as_deref(),
            dto.financial_status.as_deref(),
        ),
        items_count: i32::try_from(dto.line_items.map_or(0, |v| v.len())).unwrap_or(i32::MAX),
        placed_at: dto.created_at.unwrap_or_else(Utc::now),
    })
}

/// Fans one external product out into one row per variant. The product
/// title stands alone when the variant is the default one, otherwise the
/// variant title is suffixed.
pub fn product_rows_from_record(
    tenant_id: Uuid,
    record: serde_json::Value,
) -> Result<Vec<ProductRow>, MappingError> {
    let dto: ProductResource = serde_json::from_value(record)?;

    let title = dto.title.unwrap_or_default();
    let category = dto
        .product_type
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "Uncategorized".to_owned());
    let status = if dto.status.as_deref() == Some("active") {
        ProductStatus::Active
    } else {
        ProductStatus::Inactive
    };

    Ok(dto
        .variants
        .unwrap_or_default()
        .into_iter()
        .map(|variant| {
            let name = match variant.title.as_deref() {
                Some(vt) if vt != DEFAULT_VARIANT_TITLE => format!("{title} - {vt}"),
                _ => title.clone(),
            };
            ProductRow {
                tenant_id,
                shopify_product_id: dto.id,
                shopify_variant_id: variant.id,
                name,
                price: parse_money(variant.price.as_deref()),
                category: category.clone(),
                inventory: variant.inventory_quantity.unwrap_or(0),
                sku: variant.sku,
                status,
            }
        })
        .collect())
}
