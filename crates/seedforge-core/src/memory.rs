//! In-memory [`FixtureStore`] used by tests and offline dry runs.
//!
//! Mirrors the contract of the real store closely enough to exercise every
//! failure path: unique keys are enforced and collisions come back as
//! [`StoreError::Conflict`], and transient faults can be injected to drive
//! the batch factory's retry handling.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{AccessLog, Department, License, Organization, Permission, Role, User};
use crate::store::FixtureStore;

#[derive(Debug, Default)]
struct Tables {
    permissions: Vec<Permission>,
    roles: Vec<Role>,
    organizations: Vec<Organization>,
    departments: Vec<Department>,
    users: Vec<User>,
    licenses: Vec<License>,
    access_logs: Vec<AccessLog>,
}

#[derive(Debug, Default)]
struct Faults {
    /// Remaining create calls to fail with `error` before recovering.
    remaining: u32,
    error: Option<StoreError>,
    /// When set, every ping fails (store "unreachable").
    offline: bool,
}

/// Thread-safe in-memory store. Locks are never held across await points.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    faults: Mutex<Faults>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` create calls with a clone of `error`.
    pub fn fail_next_creates(&self, count: u32, error: StoreError) {
        let mut faults = self.faults.lock().unwrap();
        faults.remaining = count;
        faults.error = Some(error);
    }

    /// Toggle connectivity for the `ping` probe.
    pub fn set_offline(&self, offline: bool) {
        self.faults.lock().unwrap().offline = offline;
    }

    /// Snapshot of the access-log table. The store contract only exposes
    /// counts for logs; assertions about their shape go through here.
    pub fn access_logs(&self) -> Vec<AccessLog> {
        self.tables.lock().unwrap().access_logs.clone()
    }

    fn take_fault(&self) -> Option<StoreError> {
        let mut faults = self.faults.lock().unwrap();
        if faults.remaining > 0 {
            faults.remaining -= 1;
            return faults.error.clone();
        }
        None
    }

    fn check_fault(&self) -> Result<(), StoreError> {
        match self.take_fault() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn conflict(constraint: &str) -> StoreError {
    StoreError::Conflict {
        constraint: constraint.to_string(),
    }
}

#[async_trait]
impl FixtureStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        if self.faults.lock().unwrap().offline {
            return Err(StoreError::Connection("store offline".to_string()));
        }
        Ok(())
    }

    async fn create_permission(&self, permission: Permission) -> Result<Permission, StoreError> {
        self.check_fault()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.permissions.iter().any(|p| p.code == permission.code) {
            return Err(conflict("permissions_code_key"));
        }
        tables.permissions.push(permission.clone());
        Ok(permission)
    }

    async fn find_permission_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Permission>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.permissions.iter().find(|p| p.code == code).cloned())
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>, StoreError> {
        Ok(self.tables.lock().unwrap().permissions.clone())
    }

    async fn count_permissions(&self) -> Result<u64, StoreError> {
        Ok(self.tables.lock().unwrap().permissions.len() as u64)
    }

    async fn delete_permissions(&self) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let removed = tables.permissions.len() as u64;
        tables.permissions.clear();
        Ok(removed)
    }

    async fn create_role(&self, role: Role) -> Result<Role, StoreError> {
        self.check_fault()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.roles.iter().any(|r| r.code == role.code) {
            return Err(conflict("roles_code_key"));
        }
        tables.roles.push(role.clone());
        Ok(role)
    }

    async fn find_role_by_code(&self, code: &str) -> Result<Option<Role>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.roles.iter().find(|r| r.code == code).cloned())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        Ok(self.tables.lock().unwrap().roles.clone())
    }

    async fn count_roles(&self) -> Result<u64, StoreError> {
        Ok(self.tables.lock().unwrap().roles.len() as u64)
    }

    async fn delete_roles(&self) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let removed = tables.roles.len() as u64;
        tables.roles.clear();
        Ok(removed)
    }

    async fn create_organization(
        &self,
        organization: Organization,
    ) -> Result<Organization, StoreError> {
        self.check_fault()?;
        let mut tables = self.tables.lock().unwrap();
        if tables
            .organizations
            .iter()
            .any(|o| o.code == organization.code)
        {
            return Err(conflict("organizations_code_key"));
        }
        tables.organizations.push(organization.clone());
        Ok(organization)
    }

    async fn find_organization_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Organization>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.organizations.iter().find(|o| o.code == code).cloned())
    }

    async fn list_active_organizations(&self) -> Result<Vec<Organization>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .organizations
            .iter()
            .filter(|o| o.active)
            .cloned()
            .collect())
    }

    async fn count_organizations(&self) -> Result<u64, StoreError> {
        Ok(self.tables.lock().unwrap().organizations.len() as u64)
    }

    async fn delete_organizations(&self) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let removed = tables.organizations.len() as u64;
        tables.organizations.clear();
        Ok(removed)
    }

    async fn create_department(&self, department: Department) -> Result<Department, StoreError> {
        self.check_fault()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.departments.iter().any(|d| d.code == department.code) {
            return Err(conflict("departments_code_key"));
        }
        tables.departments.push(department.clone());
        Ok(department)
    }

    async fn list_departments(&self) -> Result<Vec<Department>, StoreError> {
        Ok(self.tables.lock().unwrap().departments.clone())
    }

    async fn count_departments(&self) -> Result<u64, StoreError> {
        Ok(self.tables.lock().unwrap().departments.len() as u64)
    }

    async fn delete_departments(&self) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let removed = tables.departments.len() as u64;
        tables.departments.clear();
        Ok(removed)
    }

    async fn create_user(&self, user: User) -> Result<User, StoreError> {
        self.check_fault()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(conflict("users_email_key"));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_active_users(&self) -> Result<Vec<User>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().filter(|u| u.active).cloned().collect())
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        Ok(self.tables.lock().unwrap().users.len() as u64)
    }

    async fn delete_users(&self, preserve_admin: bool) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.users.len();
        if preserve_admin {
            tables.users.retain(|u| u.admin);
        } else {
            tables.users.clear();
        }
        Ok((before - tables.users.len()) as u64)
    }

    async fn create_license(&self, license: License) -> Result<License, StoreError> {
        self.check_fault()?;
        let mut tables = self.tables.lock().unwrap();
        if tables.licenses.iter().any(|l| l.key == license.key) {
            return Err(conflict("licenses_key_key"));
        }
        tables.licenses.push(license.clone());
        Ok(license)
    }

    async fn find_license_by_key(&self, key: &str) -> Result<Option<License>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.licenses.iter().find(|l| l.key == key).cloned())
    }

    async fn list_licenses(&self) -> Result<Vec<License>, StoreError> {
        Ok(self.tables.lock().unwrap().licenses.clone())
    }

    async fn count_licenses(&self) -> Result<u64, StoreError> {
        Ok(self.tables.lock().unwrap().licenses.len() as u64)
    }

    async fn delete_licenses(&self) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let removed = tables.licenses.len() as u64;
        tables.licenses.clear();
        Ok(removed)
    }

    async fn create_access_log(&self, log: AccessLog) -> Result<AccessLog, StoreError> {
        self.check_fault()?;
        let mut tables = self.tables.lock().unwrap();
        tables.access_logs.push(log.clone());
        Ok(log)
    }

    async fn count_access_logs(&self) -> Result<u64, StoreError> {
        Ok(self.tables.lock().unwrap().access_logs.len() as u64)
    }

    async fn delete_access_logs(&self) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let removed = tables.access_logs.len() as u64;
        tables.access_logs.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn org(code: &str) -> Organization {
        Organization {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: format!("Org {code}"),
            tier: crate::model::OrgTier::Starter,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn duplicate_code_is_a_conflict() {
        let store = MemoryStore::new();
        store.create_organization(org("ORG-1")).await.unwrap();
        let err = store.create_organization(org("ORG-1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
        assert_eq!(store.count_organizations().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn injected_faults_clear_after_budget() {
        let store = MemoryStore::new();
        store.fail_next_creates(1, StoreError::Timeout);
        let err = store.create_organization(org("ORG-2")).await.unwrap_err();
        assert_eq!(err, StoreError::Timeout);
        store.create_organization(org("ORG-2")).await.unwrap();
    }

    #[tokio::test]
    async fn preserve_admin_keeps_only_admin_accounts() {
        let store = MemoryStore::new();
        let base = User {
            id: Uuid::new_v4(),
            email: "a@b.c".to_string(),
            name: "A".to_string(),
            password_hash: "0".repeat(64),
            role_code: "viewer".to_string(),
            organization_id: Some(Uuid::new_v4()),
            department_id: None,
            active: true,
            admin: false,
            created_at: Utc::now(),
        };
        store.create_user(base.clone()).await.unwrap();
        store
            .create_user(User {
                id: Uuid::new_v4(),
                email: "admin@b.c".to_string(),
                admin: true,
                ..base
            })
            .await
            .unwrap();

        let removed = store.delete_users(true).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.count_users().await.unwrap(), 1);
    }
}
