//! Access-log seeder.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use seedforge_core::{
    AccessLog, CleanOptions, FixtureStore, GenerationRequest, License, SeedConfig, SeedCounts,
    SeedError, SeedOptions, User,
};
use seedforge_generate::access_logs::{
    AccessLogOverrides, DEFAULT_REALISTIC_DAYS, access_log,
};
use seedforge_generate::seeded_rng;

use crate::batch::{BatchFactory, RecordFactory};
use crate::seeder::Seeder;

const DEFAULT_LOGS_PER_LICENSE: usize = 10;

pub struct AccessLogSeeder {
    store: Arc<dyn FixtureStore>,
    config: SeedConfig,
}

impl AccessLogSeeder {
    pub const NAME: &'static str = "access_logs";

    pub fn new(store: Arc<dyn FixtureStore>, config: SeedConfig) -> Self {
        Self { store, config }
    }
}

struct AccessLogFactory {
    store: Arc<dyn FixtureStore>,
    licenses: Vec<License>,
    users: Vec<User>,
    logs_per_license: usize,
    realistic_days: i64,
    rng: Mutex<ChaCha8Rng>,
}

#[async_trait]
impl RecordFactory for AccessLogFactory {
    type Record = AccessLog;
    type Overrides = AccessLogOverrides;

    async fn generate(
        &self,
        index: usize,
        overrides: Option<&AccessLogOverrides>,
    ) -> Result<AccessLog, SeedError> {
        let mut base = overrides.cloned().unwrap_or_default();
        if base.license_id.is_none() {
            // Slot indices are striped so every license receives exactly
            // its quota; slots past the quota plan fall back to a random
            // license inside the generator.
            base.license_id = self
                .licenses
                .get(index / self.logs_per_license)
                .map(|license| license.id);
        }
        let mut rng = self.rng.lock().unwrap();
        access_log(
            &mut *rng,
            &self.licenses,
            &self.users,
            self.realistic_days,
            &base,
        )
    }

    async fn persist(&self, record: AccessLog) -> Result<AccessLog, SeedError> {
        Ok(self.store.create_access_log(record).await?)
    }
}

#[async_trait]
impl Seeder for AccessLogSeeder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["licenses", "users"]
    }

    fn store(&self) -> &dyn FixtureStore {
        self.store.as_ref()
    }

    async fn do_seed(&self, options: &SeedOptions) -> Result<SeedCounts, SeedError> {
        let licenses = self.store.list_licenses().await?;
        if licenses.is_empty() {
            return Err(SeedError::DependencyMissing("licenses".to_string()));
        }
        let users = self.store.list_active_users().await?;
        if users.is_empty() {
            return Err(SeedError::DependencyMissing("active users".to_string()));
        }

        let logs_per_license = options
            .logs_per_license
            .unwrap_or(DEFAULT_LOGS_PER_LICENSE);
        let default_count = licenses.len() * logs_per_license;

        let factory = AccessLogFactory {
            store: self.store.clone(),
            licenses,
            users,
            // `max(1)` keeps the quota stripe well-defined when a caller
            // asks for zero logs per license with an explicit count.
            logs_per_license: logs_per_license.max(1),
            realistic_days: options.realistic_days.unwrap_or(DEFAULT_REALISTIC_DAYS),
            rng: Mutex::new(seeded_rng(self.config.rng_seed, Self::NAME)),
        };
        let request = GenerationRequest::of(options.effective_count(default_count));
        let outcome = BatchFactory::from_config(&self.config)
            .create_batch(&factory, &request)
            .await;
        if !outcome.failed.is_empty() {
            warn!(
                failed = outcome.failed.len(),
                requested = request.count,
                "some access logs were not created"
            );
        }
        Ok(SeedCounts::created(outcome.succeeded.len() as u64))
    }

    async fn do_clean(&self, _options: &CleanOptions) -> Result<u64, SeedError> {
        Ok(self.store.delete_access_logs().await?)
    }

    async fn stats(&self) -> Result<BTreeMap<String, u64>, SeedError> {
        let mut stats = BTreeMap::new();
        stats.insert(
            "access_logs".to_string(),
            self.store.count_access_logs().await?,
        );
        Ok(stats)
    }
}
