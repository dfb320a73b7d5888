use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::domain::model::{Tenant, TenantStatus};

/// Settings for the external source client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Upper bound on records per page; a shorter page ends pagination.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Shopify Admin API version segment, e.g. `2024-07`.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(with = "humantime_serde", default = "default_http_timeout")]
    pub http_timeout: Duration,

    /// Overrides the per-tenant `https://{shopify_domain}` base URL;
    /// meant for local stubs, leave unset in production.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            api_version: default_api_version(),
            http_timeout: default_http_timeout(),
            base_url: None,
        }
    }
}

/// Settings for the recurring sync schedule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Wall-clock cadence between full-sync ticks. Missed ticks are
    /// skipped, not backfilled.
    #[serde(with = "humantime_serde", default = "default_interval")]
    pub interval: Duration,

    #[serde(default)]
    pub source: SourceConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            source: SourceConfig::default(),
        }
    }
}

/// One tenant as declared in configuration; seeded into storage at
/// startup and re-read from there on every scheduler tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TenantConfig {
    pub id: Uuid,
    pub name: String,
    pub shopify_domain: String,
    #[serde(serialize_with = "redact")]
    pub access_token: SecretString,
}

impl TenantConfig {
    #[must_use]
    pub fn into_tenant(self) -> Tenant {
        Tenant {
            id: self.id,
            name: self.name,
            shopify_domain: self.shopify_domain,
            access_token: self.access_token,
            status: TenantStatus::Active,
            last_sync_at: None,
            last_sync_status: None,
        }
    }
}

fn redact<S: Serializer>(_: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str("[REDACTED]")
}

fn default_interval() -> Duration {
    Duration::from_secs(3600)
}

fn default_page_size() -> usize {
    250
}

fn default_api_version() -> String {
    "2024-07".to_owned()
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(30)
}
