//! The narrow persistence contract consumed by seeders.
//!
//! Implementations run every `create_*` call inside exactly one scoped
//! transaction, enforce each entity's unique key (reporting collisions as
//! [`StoreError::Conflict`]), and keep every `find_*`/`count_*` read-only.
//! The store's own unique constraints are the authoritative collision
//! signal; the uniqueness resolver upstream is only a pre-filter.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{AccessLog, Department, License, Organization, Permission, Role, User};

#[async_trait]
pub trait FixtureStore: Send + Sync {
    /// Cheap connectivity probe used by the seeder lifecycle's fail-fast
    /// connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;

    // Permissions
    async fn create_permission(&self, permission: Permission) -> Result<Permission, StoreError>;
    async fn find_permission_by_code(&self, code: &str)
    -> Result<Option<Permission>, StoreError>;
    async fn list_permissions(&self) -> Result<Vec<Permission>, StoreError>;
    async fn count_permissions(&self) -> Result<u64, StoreError>;
    async fn delete_permissions(&self) -> Result<u64, StoreError>;

    // Roles
    async fn create_role(&self, role: Role) -> Result<Role, StoreError>;
    async fn find_role_by_code(&self, code: &str) -> Result<Option<Role>, StoreError>;
    async fn list_roles(&self) -> Result<Vec<Role>, StoreError>;
    async fn count_roles(&self) -> Result<u64, StoreError>;
    async fn delete_roles(&self) -> Result<u64, StoreError>;

    // Organizations
    async fn create_organization(
        &self,
        organization: Organization,
    ) -> Result<Organization, StoreError>;
    async fn find_organization_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Organization>, StoreError>;
    async fn list_active_organizations(&self) -> Result<Vec<Organization>, StoreError>;
    async fn count_organizations(&self) -> Result<u64, StoreError>;
    async fn delete_organizations(&self) -> Result<u64, StoreError>;

    // Departments
    async fn create_department(&self, department: Department) -> Result<Department, StoreError>;
    async fn list_departments(&self) -> Result<Vec<Department>, StoreError>;
    async fn count_departments(&self) -> Result<u64, StoreError>;
    async fn delete_departments(&self) -> Result<u64, StoreError>;

    // Users
    async fn create_user(&self, user: User) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn list_active_users(&self) -> Result<Vec<User>, StoreError>;
    async fn count_users(&self) -> Result<u64, StoreError>;
    /// Delete users; when `preserve_admin` is set, admin accounts survive.
    async fn delete_users(&self, preserve_admin: bool) -> Result<u64, StoreError>;

    // Licenses
    async fn create_license(&self, license: License) -> Result<License, StoreError>;
    async fn find_license_by_key(&self, key: &str) -> Result<Option<License>, StoreError>;
    async fn list_licenses(&self) -> Result<Vec<License>, StoreError>;
    async fn count_licenses(&self) -> Result<u64, StoreError>;
    async fn delete_licenses(&self) -> Result<u64, StoreError>;

    // Access logs
    async fn create_access_log(&self, log: AccessLog) -> Result<AccessLog, StoreError>;
    async fn count_access_logs(&self) -> Result<u64, StoreError>;
    async fn delete_access_logs(&self) -> Result<u64, StoreError>;
}
