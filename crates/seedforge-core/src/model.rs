//! Fixture entity model.
//!
//! Records are generated fully client-side (ids, timestamps, derived fields)
//! and handed to the store for persistence, so every entity here is the
//! complete persisted shape rather than an insert payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Commercial tier of an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgTier {
    Starter,
    Business,
    Enterprise,
}

impl OrgTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrgTier::Starter => "starter",
            OrgTier::Business => "business",
            OrgTier::Enterprise => "enterprise",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "starter" => Some(OrgTier::Starter),
            "business" => Some(OrgTier::Business),
            "enterprise" => Some(OrgTier::Enterprise),
            _ => None,
        }
    }
}

/// Action recorded by a license access log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    Validate,
    Activate,
    Renew,
    RevokeCheck,
}

impl LogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogAction::Validate => "validate",
            LogAction::Activate => "activate",
            LogAction::Renew => "renew",
            LogAction::RevokeCheck => "revoke_check",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "validate" => Some(LogAction::Validate),
            "activate" => Some(LogAction::Activate),
            "renew" => Some(LogAction::Renew),
            "revoke_check" => Some(LogAction::RevokeCheck),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub id: Uuid,
    /// Unique machine-readable code, e.g. `licenses.read`.
    pub code: String,
    pub name: String,
    pub category: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    /// Unique machine-readable code, e.g. `org_admin`.
    pub code: String,
    pub name: String,
    pub description: String,
    pub permission_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    /// Unique short code, e.g. `ORG-4F2A81`.
    pub code: String,
    pub name: String,
    pub tier: OrgTier,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    /// Unique code scoped globally, e.g. `DEP-ORG-4F2A81-01`.
    pub code: String,
    pub name: String,
    pub organization_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Unique login email.
    pub email: String,
    pub name: String,
    /// SHA-256 hex digest of the account password.
    pub password_hash: String,
    pub role_code: String,
    /// `None` only for org-less system accounts such as the bootstrap admin.
    pub organization_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub active: bool,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub id: Uuid,
    /// Unique license key, e.g. `LIC-9B3C-0F7A-52E1`.
    pub key: String,
    pub organization_id: Uuid,
    pub holder_id: Option<Uuid>,
    pub seats: u32,
    /// Monetary amount in the org's billing currency, two decimal places.
    pub amount: f64,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Derived from `expires_at` at generation time; never set directly.
    pub expired: bool,
    pub created_at: DateTime<Utc>,
}

impl License {
    /// Derivation rule for the `expired` flag: a license without an expiry
    /// never expires; a future expiry is not yet expired.
    pub fn is_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        matches!(expires_at, Some(at) if at < now)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessLog {
    pub id: Uuid,
    pub license_id: Uuid,
    pub user_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub action: LogAction,
    pub ip: String,
}
