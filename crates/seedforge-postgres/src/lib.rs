//! PostgreSQL [`FixtureStore`] backed by sqlx.
//!
//! Every create runs in its own scoped transaction with a 30s server-side
//! statement timeout; pool acquisition waits at most 5s. Unique-constraint
//! violations map to [`StoreError::Conflict`] so the batch factory can treat
//! the database as the authoritative uniqueness signal.

mod rows;

use std::time::Duration;

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use seedforge_core::{
    AccessLog, Department, FixtureStore, License, Organization, Permission, Role, StoreError,
    User,
};

use rows::{
    department_row, license_row, organization_row, permission_row, role_row, user_row,
};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const STATEMENT_TIMEOUT: &str = "SET LOCAL statement_timeout = '30s'";
/// Postgres `query_canceled`, raised when statement_timeout fires.
const QUERY_CANCELED: &str = "57014";

pub struct PgFixtureStore {
    pool: PgPool,
}

impl PgFixtureStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(url)
            .await
            .map_err(map_err)?;
        debug!("connected to fixture database");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// One scoped transaction per create, with the statement timeout set.
    async fn begin(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_err)?;
        sqlx::query(STATEMENT_TIMEOUT)
            .execute(&mut *tx)
            .await
            .map_err(map_err)?;
        Ok(tx)
    }

    async fn count(&self, sql: &str) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(count.max(0) as u64)
    }

    async fn delete(&self, sql: &str) -> Result<u64, StoreError> {
        let mut tx = self.begin().await?;
        let result = sqlx::query(sql).execute(&mut *tx).await.map_err(map_err)?;
        tx.commit().await.map_err(map_err)?;
        Ok(result.rows_affected())
    }
}

fn map_err(error: sqlx::Error) -> StoreError {
    match &error {
        sqlx::Error::PoolTimedOut => StoreError::Timeout,
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) => StoreError::Connection(error.to_string()),
        sqlx::Error::Database(db) => {
            if matches!(db.kind(), ErrorKind::UniqueViolation) {
                StoreError::Conflict {
                    constraint: db.constraint().unwrap_or("unknown").to_string(),
                }
            } else if db.code().as_deref() == Some(QUERY_CANCELED) {
                StoreError::Timeout
            } else {
                StoreError::Query(error.to_string())
            }
        }
        _ => StoreError::Query(error.to_string()),
    }
}

#[async_trait]
impl FixtureStore for PgFixtureStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|error| StoreError::Connection(error.to_string()))
    }

    async fn create_permission(&self, permission: Permission) -> Result<Permission, StoreError> {
        let mut tx = self.begin().await?;
        sqlx::query(
            "INSERT INTO permissions (id, code, name, category, description) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(permission.id)
        .bind(&permission.code)
        .bind(&permission.name)
        .bind(&permission.category)
        .bind(&permission.description)
        .execute(&mut *tx)
        .await
        .map_err(map_err)?;
        tx.commit().await.map_err(map_err)?;
        Ok(permission)
    }

    async fn find_permission_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Permission>, StoreError> {
        let row = sqlx::query("SELECT * FROM permissions WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?;
        row.as_ref().map(permission_row).transpose()
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>, StoreError> {
        let rows = sqlx::query("SELECT * FROM permissions ORDER BY code")
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)?;
        rows.iter().map(permission_row).collect()
    }

    async fn count_permissions(&self) -> Result<u64, StoreError> {
        self.count("SELECT COUNT(*) FROM permissions").await
    }

    async fn delete_permissions(&self) -> Result<u64, StoreError> {
        self.delete("DELETE FROM permissions").await
    }

    async fn create_role(&self, role: Role) -> Result<Role, StoreError> {
        let mut tx = self.begin().await?;
        sqlx::query(
            "INSERT INTO roles (id, code, name, description, permission_codes) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(role.id)
        .bind(&role.code)
        .bind(&role.name)
        .bind(&role.description)
        .bind(&role.permission_codes)
        .execute(&mut *tx)
        .await
        .map_err(map_err)?;
        tx.commit().await.map_err(map_err)?;
        Ok(role)
    }

    async fn find_role_by_code(&self, code: &str) -> Result<Option<Role>, StoreError> {
        let row = sqlx::query("SELECT * FROM roles WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?;
        row.as_ref().map(role_row).transpose()
    }

    async fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        let rows = sqlx::query("SELECT * FROM roles ORDER BY code")
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)?;
        rows.iter().map(role_row).collect()
    }

    async fn count_roles(&self) -> Result<u64, StoreError> {
        self.count("SELECT COUNT(*) FROM roles").await
    }

    async fn delete_roles(&self) -> Result<u64, StoreError> {
        self.delete("DELETE FROM roles").await
    }

    async fn create_organization(
        &self,
        organization: Organization,
    ) -> Result<Organization, StoreError> {
        let mut tx = self.begin().await?;
        sqlx::query(
            "INSERT INTO organizations (id, code, name, tier, active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(organization.id)
        .bind(&organization.code)
        .bind(&organization.name)
        .bind(organization.tier.as_str())
        .bind(organization.active)
        .bind(organization.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_err)?;
        tx.commit().await.map_err(map_err)?;
        Ok(organization)
    }

    async fn find_organization_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Organization>, StoreError> {
        let row = sqlx::query("SELECT * FROM organizations WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?;
        row.as_ref().map(organization_row).transpose()
    }

    async fn list_active_organizations(&self) -> Result<Vec<Organization>, StoreError> {
        let rows = sqlx::query("SELECT * FROM organizations WHERE active ORDER BY code")
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)?;
        rows.iter().map(organization_row).collect()
    }

    async fn count_organizations(&self) -> Result<u64, StoreError> {
        self.count("SELECT COUNT(*) FROM organizations").await
    }

    async fn delete_organizations(&self) -> Result<u64, StoreError> {
        self.delete("DELETE FROM organizations").await
    }

    async fn create_department(&self, department: Department) -> Result<Department, StoreError> {
        let mut tx = self.begin().await?;
        sqlx::query(
            "INSERT INTO departments (id, code, name, organization_id) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(department.id)
        .bind(&department.code)
        .bind(&department.name)
        .bind(department.organization_id)
        .execute(&mut *tx)
        .await
        .map_err(map_err)?;
        tx.commit().await.map_err(map_err)?;
        Ok(department)
    }

    async fn list_departments(&self) -> Result<Vec<Department>, StoreError> {
        let rows = sqlx::query("SELECT * FROM departments ORDER BY code")
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)?;
        rows.iter().map(department_row).collect()
    }

    async fn count_departments(&self) -> Result<u64, StoreError> {
        self.count("SELECT COUNT(*) FROM departments").await
    }

    async fn delete_departments(&self) -> Result<u64, StoreError> {
        self.delete("DELETE FROM departments").await
    }

    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        let mut tx = self.begin().await?;
        sqlx::query(
            "INSERT INTO users \
             (id, email, name, password_hash, role_code, organization_id, department_id, \
              active, admin, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.role_code)
        .bind(user.organization_id)
        .bind(user.department_id)
        .bind(user.active)
        .bind(user.admin)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_err)?;
        tx.commit().await.map_err(map_err)?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?;
        row.as_ref().map(user_row).transpose()
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?;
        row.as_ref().map(user_row).transpose()
    }

    async fn list_active_users(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query("SELECT * FROM users WHERE active ORDER BY email")
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)?;
        rows.iter().map(user_row).collect()
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        self.count("SELECT COUNT(*) FROM users").await
    }

    async fn delete_users(&self, preserve_admin: bool) -> Result<u64, StoreError> {
        if preserve_admin {
            self.delete("DELETE FROM users WHERE NOT admin").await
        } else {
            self.delete("DELETE FROM users").await
        }
    }

    async fn create_license(&self, license: License) -> Result<License, StoreError> {
        let mut tx = self.begin().await?;
        sqlx::query(
            "INSERT INTO licenses \
             (id, key, organization_id, holder_id, seats, amount, issued_at, expires_at, expired, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(license.id)
        .bind(&license.key)
        .bind(license.organization_id)
        .bind(license.holder_id)
        .bind(license.seats as i32)
        .bind(license.amount)
        .bind(license.issued_at)
        .bind(license.expires_at)
        .bind(license.expired)
        .bind(license.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_err)?;
        tx.commit().await.map_err(map_err)?;
        Ok(license)
    }

    async fn find_license_by_key(&self, key: &str) -> Result<Option<License>, StoreError> {
        let row = sqlx::query("SELECT * FROM licenses WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?;
        row.as_ref().map(license_row).transpose()
    }

    async fn list_licenses(&self) -> Result<Vec<License>, StoreError> {
        let rows = sqlx::query("SELECT * FROM licenses ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)?;
        rows.iter().map(license_row).collect()
    }

    async fn count_licenses(&self) -> Result<u64, StoreError> {
        self.count("SELECT COUNT(*) FROM licenses").await
    }

    async fn delete_licenses(&self) -> Result<u64, StoreError> {
        self.delete("DELETE FROM licenses").await
    }

    async fn create_access_log(&self, log: AccessLog) -> Result<AccessLog, StoreError> {
        let mut tx = self.begin().await?;
        sqlx::query(
            "INSERT INTO access_logs (id, license_id, user_id, occurred_at, action, ip) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(log.id)
        .bind(log.license_id)
        .bind(log.user_id)
        .bind(log.occurred_at)
        .bind(log.action.as_str())
        .bind(&log.ip)
        .execute(&mut *tx)
        .await
        .map_err(map_err)?;
        tx.commit().await.map_err(map_err)?;
        Ok(log)
    }

    async fn count_access_logs(&self) -> Result<u64, StoreError> {
        self.count("SELECT COUNT(*) FROM access_logs").await
    }

    async fn delete_access_logs(&self) -> Result<u64, StoreError> {
        self.delete("DELETE FROM access_logs").await
    }
}
