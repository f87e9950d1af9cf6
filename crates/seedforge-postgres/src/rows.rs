//! Row → entity mapping.
//!
//! Mapping is done by hand so `seedforge-core` stays free of sqlx; enum
//! columns are stored as text and re-parsed here.

use sqlx::Row;
use sqlx::postgres::PgRow;

use seedforge_core::{
    Department, License, OrgTier, Organization, Permission, Role, StoreError, User,
};

fn bad_column(column: &str, error: impl std::fmt::Display) -> StoreError {
    StoreError::Query(format!("column {column}: {error}"))
}

pub(crate) fn permission_row(row: &PgRow) -> Result<Permission, StoreError> {
    Ok(Permission {
        id: row.try_get("id").map_err(|e| bad_column("id", e))?,
        code: row.try_get("code").map_err(|e| bad_column("code", e))?,
        name: row.try_get("name").map_err(|e| bad_column("name", e))?,
        category: row
            .try_get("category")
            .map_err(|e| bad_column("category", e))?,
        description: row
            .try_get("description")
            .map_err(|e| bad_column("description", e))?,
    })
}

pub(crate) fn role_row(row: &PgRow) -> Result<Role, StoreError> {
    Ok(Role {
        id: row.try_get("id").map_err(|e| bad_column("id", e))?,
        code: row.try_get("code").map_err(|e| bad_column("code", e))?,
        name: row.try_get("name").map_err(|e| bad_column("name", e))?,
        description: row
            .try_get("description")
            .map_err(|e| bad_column("description", e))?,
        permission_codes: row
            .try_get("permission_codes")
            .map_err(|e| bad_column("permission_codes", e))?,
    })
}

pub(crate) fn organization_row(row: &PgRow) -> Result<Organization, StoreError> {
    let tier: String = row.try_get("tier").map_err(|e| bad_column("tier", e))?;
    Ok(Organization {
        id: row.try_get("id").map_err(|e| bad_column("id", e))?,
        code: row.try_get("code").map_err(|e| bad_column("code", e))?,
        name: row.try_get("name").map_err(|e| bad_column("name", e))?,
        tier: OrgTier::parse(&tier)
            .ok_or_else(|| bad_column("tier", format!("unknown tier '{tier}'")))?,
        active: row.try_get("active").map_err(|e| bad_column("active", e))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| bad_column("created_at", e))?,
    })
}

pub(crate) fn department_row(row: &PgRow) -> Result<Department, StoreError> {
    Ok(Department {
        id: row.try_get("id").map_err(|e| bad_column("id", e))?,
        code: row.try_get("code").map_err(|e| bad_column("code", e))?,
        name: row.try_get("name").map_err(|e| bad_column("name", e))?,
        organization_id: row
            .try_get("organization_id")
            .map_err(|e| bad_column("organization_id", e))?,
    })
}

pub(crate) fn user_row(row: &PgRow) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id").map_err(|e| bad_column("id", e))?,
        email: row.try_get("email").map_err(|e| bad_column("email", e))?,
        name: row.try_get("name").map_err(|e| bad_column("name", e))?,
        password_hash: row
            .try_get("password_hash")
            .map_err(|e| bad_column("password_hash", e))?,
        role_code: row
            .try_get("role_code")
            .map_err(|e| bad_column("role_code", e))?,
        organization_id: row
            .try_get("organization_id")
            .map_err(|e| bad_column("organization_id", e))?,
        department_id: row
            .try_get("department_id")
            .map_err(|e| bad_column("department_id", e))?,
        active: row.try_get("active").map_err(|e| bad_column("active", e))?,
        admin: row.try_get("admin").map_err(|e| bad_column("admin", e))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| bad_column("created_at", e))?,
    })
}

pub(crate) fn license_row(row: &PgRow) -> Result<License, StoreError> {
    let seats: i32 = row.try_get("seats").map_err(|e| bad_column("seats", e))?;
    Ok(License {
        id: row.try_get("id").map_err(|e| bad_column("id", e))?,
        key: row.try_get("key").map_err(|e| bad_column("key", e))?,
        organization_id: row
            .try_get("organization_id")
            .map_err(|e| bad_column("organization_id", e))?,
        holder_id: row
            .try_get("holder_id")
            .map_err(|e| bad_column("holder_id", e))?,
        seats: seats.max(0) as u32,
        amount: row.try_get("amount").map_err(|e| bad_column("amount", e))?,
        issued_at: row
            .try_get("issued_at")
            .map_err(|e| bad_column("issued_at", e))?,
        expires_at: row
            .try_get("expires_at")
            .map_err(|e| bad_column("expires_at", e))?,
        expired: row.try_get("expired").map_err(|e| bad_column("expired", e))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| bad_column("created_at", e))?,
    })
}
