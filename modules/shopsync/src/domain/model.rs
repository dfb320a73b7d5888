use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::SecretString;
use uuid::Uuid;

/// A tenant is an isolated customer account; every entity and every sync
/// run is scoped to exactly one tenant.
#[derive(Clone, Debug)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    /// Shopify store domain, e.g. `acme.myshopify.com`.
    pub shopify_domain: String,
    pub access_token: SecretString,
    pub status: TenantStatus,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub last_sync_status: Option<SyncStatus>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TenantStatus {
    Active,
    Inactive,
}

impl TenantStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Derived customer tier, recomputed from `total_spent` on every sync.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    Vip,
    Regular,
    New,
}

impl Segment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vip => "VIP",
            Self::Regular => "Regular",
            Self::New => "New",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "VIP" => Some(Self::Vip),
            "Regular" => Some(Self::Regular),
            "New" => Some(Self::New),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    Fulfilled,
    Processing,
    Pending,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fulfilled => "Fulfilled",
            Self::Processing => "Processing",
            Self::Pending => "Pending",
            Self::Cancelled => "Cancelled",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Fulfilled" => Some(Self::Fulfilled),
            "Processing" => Some(Self::Processing),
            "Pending" => Some(Self::Pending),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductStatus {
    Active,
    Inactive,
}

impl ProductStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(Self::Active),
            "Inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// The three resource collections synced from the source store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Customers,
    Orders,
    Products,
}

impl ResourceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Orders => "orders",
            Self::Products => "products",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized customer, keyed by `(tenant_id, shopify_customer_id)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Customer {
    pub tenant_id: Uuid,
    pub shopify_customer_id: i64,
    pub name: String,
    pub email: String,
    pub total_spent: Decimal,
    pub orders_count: i32,
    pub location: Option<String>,
    pub segment: Segment,
    pub phone: Option<String>,
    pub tags: Option<String>,
}

/// Normalized order, keyed by `(tenant_id, shopify_order_id)`.
///
/// `customer_id` is the resolved internal link; it stays `None` for guest
/// checkouts and for orders whose customer has not been synced yet.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub tenant_id: Uuid,
    pub shopify_order_id: i64,
    pub order_number: String,
    pub customer_id: Option<Uuid>,
    /// External id of the order's customer, used for link resolution.
    pub shopify_customer_id: Option<i64>,
    pub customer_name: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: OrderStatus,
    pub items_count: i32,
    pub placed_at: DateTime<Utc>,
}

/// One normalized row per product variant, keyed by
/// `(tenant_id, shopify_product_id, shopify_variant_id)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductRow {
    pub tenant_id: Uuid,
    pub shopify_product_id: i64,
    pub shopify_variant_id: i64,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub inventory: i32,
    pub sku: Option<String>,
    pub status: ProductStatus,
}

/// Overall status of a tenant's most recent full sync.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncStatus {
    Ok,
    Partial,
    Failed,
}

impl SyncStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ok" => Some(Self::Ok),
            "partial" => Some(Self::Partial),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Outcome of syncing one resource kind for one tenant.
#[derive(Clone, Debug, PartialEq)]
pub enum KindOutcome {
    Completed {
        /// Records upserted into storage.
        synced: u64,
        /// Malformed records skipped (logged, never silently dropped).
        skipped: u64,
    },
    Failed {
        error: String,
    },
}

impl KindOutcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    #[must_use]
    pub fn synced(&self) -> u64 {
        match self {
            Self::Completed { synced, .. } => *synced,
            Self::Failed { .. } => 0,
        }
    }
}

/// Aggregate result of one full sync run for one tenant.
///
/// A failure in one resource kind never hides the results of the kinds
/// that succeeded; callers can act on whatever completed.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncReport {
    pub tenant_id: Uuid,
    pub customers: KindOutcome,
    pub orders: KindOutcome,
    pub products: KindOutcome,
    pub completed_at: DateTime<Utc>,
}

impl SyncReport {
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        let failed = [&self.customers, &self.orders, &self.products]
            .iter()
            .filter(|o| o.is_failed())
            .count();
        match failed {
            0 => SyncStatus::Ok,
            3 => SyncStatus::Failed,
            _ => SyncStatus::Partial,
        }
    }

    /// Kinds that failed, with their causes.
    #[must_use]
    pub fn failures(&self) -> Vec<(ResourceKind, &str)> {
        let mut out = Vec::new();
        for (kind, outcome) in [
            (ResourceKind::Customers, &self.customers),
            (ResourceKind::Orders, &self.orders),
            (ResourceKind::Products, &self.products),
        ] {
            if let KindOutcome::Failed { error } = outcome {
                out.push((kind, error.as_str()));
            }
        }
        out
    }
}
