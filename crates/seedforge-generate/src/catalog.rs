//! Fixed catalogs and preset (named, non-random) records.
//!
//! Presets cover fixed test scenarios such as an expired license or a
//! suspended organization, and are created find-or-create so a re-run
//! reports them as existing instead of duplicating them.

use chrono::{Duration, Utc};
use uuid::Uuid;

use seedforge_core::{License, OrgTier, Organization, Permission, Role, SeedConfig, User};

/// code, name, category, description
const PERMISSIONS: &[(&str, &str, &str, &str)] = &[
    ("orgs.read", "View organizations", "organizations", "List and inspect organizations"),
    ("orgs.manage", "Manage organizations", "organizations", "Create, update, and suspend organizations"),
    ("users.read", "View users", "users", "List and inspect user accounts"),
    ("users.manage", "Manage users", "users", "Create, update, and deactivate user accounts"),
    ("licenses.read", "View licenses", "licenses", "List and inspect licenses"),
    ("licenses.issue", "Issue licenses", "licenses", "Issue new licenses"),
    ("licenses.revoke", "Revoke licenses", "licenses", "Revoke or expire licenses"),
    ("logs.read", "View access logs", "logs", "Inspect license access logs"),
    ("reports.read", "View reports", "reports", "Run read-only usage reports"),
    ("system.admin", "System administration", "system", "Unrestricted system access"),
];

/// code, name, description, permission codes
const ROLES: &[(&str, &str, &str, &[&str])] = &[
    (
        "super_admin",
        "Super Administrator",
        "Full access to every subsystem",
        &["system.admin"],
    ),
    (
        "org_admin",
        "Organization Administrator",
        "Manages one organization's users and licenses",
        &["orgs.read", "users.read", "users.manage", "licenses.read", "licenses.issue"],
    ),
    (
        "license_manager",
        "License Manager",
        "Issues and revokes licenses",
        &["licenses.read", "licenses.issue", "licenses.revoke", "logs.read"],
    ),
    (
        "auditor",
        "Auditor",
        "Read-only access for compliance review",
        &["orgs.read", "users.read", "licenses.read", "logs.read", "reports.read"],
    ),
    (
        "viewer",
        "Viewer",
        "Minimal read-only access",
        &["orgs.read", "licenses.read"],
    ),
];

pub fn permission_catalog() -> Vec<Permission> {
    PERMISSIONS
        .iter()
        .map(|(code, name, category, description)| Permission {
            id: Uuid::new_v4(),
            code: (*code).to_string(),
            name: (*name).to_string(),
            category: (*category).to_string(),
            description: (*description).to_string(),
        })
        .collect()
}

pub fn role_catalog() -> Vec<Role> {
    ROLES
        .iter()
        .map(|(code, name, description, permissions)| Role {
            id: Uuid::new_v4(),
            code: (*code).to_string(),
            name: (*name).to_string(),
            description: (*description).to_string(),
            permission_codes: permissions.iter().map(|p| (*p).to_string()).collect(),
        })
        .collect()
}

/// The bootstrap admin account, built from explicit configuration.
pub fn bootstrap_admin(config: &SeedConfig) -> User {
    User {
        id: Uuid::new_v4(),
        email: config.admin_email.clone(),
        name: config.admin_name.clone(),
        password_hash: crate::users::password_hash(&config.admin_password),
        role_code: "super_admin".to_string(),
        organization_id: None,
        department_id: None,
        active: true,
        admin: true,
        created_at: Utc::now(),
    }
}

/// Named organizations covering fixed scenarios.
pub fn preset_organizations() -> Vec<Organization> {
    let now = Utc::now();
    vec![
        Organization {
            id: Uuid::new_v4(),
            code: "ORG-PRESET-SUSPENDED".to_string(),
            name: "Suspended Test Org".to_string(),
            tier: OrgTier::Starter,
            active: false,
            created_at: now - Duration::days(400),
        },
        Organization {
            id: Uuid::new_v4(),
            code: "ORG-PRESET-ENTERPRISE".to_string(),
            name: "Enterprise Test Org".to_string(),
            tier: OrgTier::Enterprise,
            active: true,
            created_at: now - Duration::days(900),
        },
    ]
}

/// Named licenses for one organization: one already expired, one premium.
pub fn preset_licenses(organization_id: Uuid) -> Vec<License> {
    let now = Utc::now();
    let expired_at = now - Duration::days(30);
    vec![
        License {
            id: Uuid::new_v4(),
            key: "LIC-PRESET-EXPIRED".to_string(),
            organization_id,
            holder_id: None,
            seats: 5,
            amount: 149.90,
            issued_at: now - Duration::days(395),
            expires_at: Some(expired_at),
            expired: License::is_expired(Some(expired_at), now),
            created_at: now,
        },
        License {
            id: Uuid::new_v4(),
            key: "LIC-PRESET-PREMIUM".to_string(),
            organization_id,
            holder_id: None,
            seats: 250,
            amount: 12500.00,
            issued_at: now - Duration::days(10),
            expires_at: Some(now + Duration::days(720)),
            expired: false,
            created_at: now,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn role_permissions_all_exist_in_the_catalog() {
        let codes: HashSet<String> = permission_catalog()
            .into_iter()
            .map(|p| p.code)
            .collect();
        for role in role_catalog() {
            for code in &role.permission_codes {
                assert!(codes.contains(code), "role references unknown {code}");
            }
        }
    }

    #[test]
    fn preset_license_scenarios_hold() {
        let licenses = preset_licenses(Uuid::new_v4());
        let expired = licenses.iter().find(|l| l.key == "LIC-PRESET-EXPIRED").unwrap();
        assert!(expired.expired);
        let premium = licenses.iter().find(|l| l.key == "LIC-PRESET-PREMIUM").unwrap();
        assert!(!premium.expired);
        assert!(premium.amount >= 5000.0);
    }

    #[test]
    fn catalog_codes_are_unique() {
        let permissions = permission_catalog();
        let unique: HashSet<&str> = permissions.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(unique.len(), permissions.len());
    }
}
