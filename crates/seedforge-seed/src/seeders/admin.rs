//! Bootstrap admin seeder.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use seedforge_core::{
    CleanOptions, FixtureStore, SeedConfig, SeedCounts, SeedError, SeedOptions,
};
use seedforge_generate::catalog::bootstrap_admin;

use crate::seeder::Seeder;

/// Ensures the single bootstrap admin account exists. Idempotent: a re-run
/// reports the account as existing, never duplicating it.
pub struct AdminSeeder {
    store: Arc<dyn FixtureStore>,
    config: SeedConfig,
}

impl AdminSeeder {
    pub const NAME: &'static str = "admin";

    pub fn new(store: Arc<dyn FixtureStore>, config: SeedConfig) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl Seeder for AdminSeeder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["roles"]
    }

    fn store(&self) -> &dyn FixtureStore {
        self.store.as_ref()
    }

    async fn do_seed(&self, _options: &SeedOptions) -> Result<SeedCounts, SeedError> {
        match self
            .store
            .find_user_by_email(&self.config.admin_email)
            .await?
        {
            Some(_) => Ok(SeedCounts {
                existing: 1,
                ..SeedCounts::default()
            }),
            None => {
                let admin = self.store.create_user(bootstrap_admin(&self.config)).await?;
                info!(email = %admin.email, "bootstrap admin created");
                Ok(SeedCounts::created(1))
            }
        }
    }

    /// User rows, the admin included, are cleaned by the user seeder;
    /// `CleanOptions::preserve_admin` is honored there.
    async fn do_clean(&self, _options: &CleanOptions) -> Result<u64, SeedError> {
        Ok(0)
    }

    async fn stats(&self) -> Result<BTreeMap<String, u64>, SeedError> {
        let present = self
            .store
            .find_user_by_email(&self.config.admin_email)
            .await?
            .map(|_| 1)
            .unwrap_or(0);
        let mut stats = BTreeMap::new();
        stats.insert("admin".to_string(), present);
        Ok(stats)
    }
}
