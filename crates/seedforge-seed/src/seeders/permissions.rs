//! Permission catalog seeder.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use seedforge_core::{CleanOptions, FixtureStore, SeedCounts, SeedError, SeedOptions};
use seedforge_generate::catalog::permission_catalog;

use crate::seeder::Seeder;

/// Seeds the fixed permission catalog, find-or-create per code.
pub struct PermissionSeeder {
    store: Arc<dyn FixtureStore>,
}

impl PermissionSeeder {
    pub const NAME: &'static str = "permissions";

    pub fn new(store: Arc<dyn FixtureStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Seeder for PermissionSeeder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn store(&self) -> &dyn FixtureStore {
        self.store.as_ref()
    }

    async fn do_seed(&self, _options: &SeedOptions) -> Result<SeedCounts, SeedError> {
        let mut counts = SeedCounts::default();
        for permission in permission_catalog() {
            match self.store.find_permission_by_code(&permission.code).await? {
                Some(_) => counts.existing += 1,
                None => {
                    self.store.create_permission(permission).await?;
                    counts.created += 1;
                }
            }
        }
        Ok(counts)
    }

    async fn do_clean(&self, _options: &CleanOptions) -> Result<u64, SeedError> {
        Ok(self.store.delete_permissions().await?)
    }

    async fn stats(&self) -> Result<BTreeMap<String, u64>, SeedError> {
        let mut stats = BTreeMap::new();
        stats.insert(
            "permissions".to_string(),
            self.store.count_permissions().await?,
        );
        Ok(stats)
    }
}
