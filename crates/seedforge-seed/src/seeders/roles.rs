//! Role catalog seeder.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use seedforge_core::{CleanOptions, FixtureStore, SeedCounts, SeedError, SeedOptions};
use seedforge_generate::catalog::role_catalog;

use crate::seeder::Seeder;

/// Seeds the fixed role catalog. Roles reference permission codes, so the
/// permission seeder must have run first.
pub struct RoleSeeder {
    store: Arc<dyn FixtureStore>,
}

impl RoleSeeder {
    pub const NAME: &'static str = "roles";

    pub fn new(store: Arc<dyn FixtureStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Seeder for RoleSeeder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["permissions"]
    }

    fn store(&self) -> &dyn FixtureStore {
        self.store.as_ref()
    }

    async fn do_seed(&self, _options: &SeedOptions) -> Result<SeedCounts, SeedError> {
        if self.store.count_permissions().await? == 0 {
            return Err(SeedError::DependencyMissing("permissions".to_string()));
        }

        let mut counts = SeedCounts::default();
        for role in role_catalog() {
            match self.store.find_role_by_code(&role.code).await? {
                Some(_) => counts.existing += 1,
                None => {
                    self.store.create_role(role).await?;
                    counts.created += 1;
                }
            }
        }
        Ok(counts)
    }

    async fn do_clean(&self, _options: &CleanOptions) -> Result<u64, SeedError> {
        Ok(self.store.delete_roles().await?)
    }

    async fn stats(&self) -> Result<BTreeMap<String, u64>, SeedError> {
        let mut stats = BTreeMap::new();
        stats.insert("roles".to_string(), self.store.count_roles().await?);
        Ok(stats)
    }
}
