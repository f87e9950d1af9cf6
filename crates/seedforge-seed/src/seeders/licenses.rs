//! License seeder.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use seedforge_core::{
    CleanOptions, FixtureStore, GenerationRequest, License, Organization, SeedConfig,
    SeedCounts, SeedError, SeedOptions, User,
};
use seedforge_generate::catalog::preset_licenses;
use seedforge_generate::licenses::{LicenseOverrides, license, license_key};
use seedforge_generate::{resolve_unique, seeded_rng};

use crate::batch::{BatchFactory, RecordFactory};
use crate::seeder::Seeder;

const DEFAULT_COUNT: usize = 75;

pub struct LicenseSeeder {
    store: Arc<dyn FixtureStore>,
    config: SeedConfig,
}

impl LicenseSeeder {
    pub const NAME: &'static str = "licenses";

    pub fn new(store: Arc<dyn FixtureStore>, config: SeedConfig) -> Self {
        Self { store, config }
    }
}

struct LicenseFactory {
    store: Arc<dyn FixtureStore>,
    organizations: Vec<Organization>,
    users: Vec<User>,
    rng: Mutex<ChaCha8Rng>,
    allocated: Mutex<HashSet<String>>,
    attempts: u32,
}

#[async_trait]
impl RecordFactory for LicenseFactory {
    type Record = License;
    type Overrides = LicenseOverrides;

    async fn generate(
        &self,
        _index: usize,
        overrides: Option<&LicenseOverrides>,
    ) -> Result<License, SeedError> {
        let base = overrides.cloned().unwrap_or_default();
        let key = resolve_unique(
            || {
                let mut rng = self.rng.lock().unwrap();
                base.key.clone().unwrap_or_else(|| license_key(&mut *rng))
            },
            |candidate| {
                let candidate = candidate.clone();
                async move {
                    if self.allocated.lock().unwrap().contains(&candidate) {
                        return Ok(true);
                    }
                    Ok(self.store.find_license_by_key(&candidate).await?.is_some())
                }
            },
            self.attempts,
        )
        .await?;

        let mut effective = base;
        effective.key = Some(key.clone());
        let record = {
            let mut rng = self.rng.lock().unwrap();
            license(&mut *rng, &self.organizations, &self.users, &effective)?
        };
        self.allocated.lock().unwrap().insert(key);
        Ok(record)
    }

    async fn persist(&self, record: License) -> Result<License, SeedError> {
        Ok(self.store.create_license(record).await?)
    }

    async fn validate(&self, record: &License) -> Result<(), SeedError> {
        let found = self.store.find_license_by_key(&record.key).await?;
        match found {
            Some(found) if found.id == record.id => {
                // Integrity of the derived flag is part of the contract.
                if found.expired != License::is_expired(found.expires_at, record.created_at) {
                    return Err(SeedError::Validation(format!(
                        "license {} has an inconsistent expired flag",
                        record.key
                    )));
                }
                Ok(())
            }
            _ => Err(SeedError::Validation(format!(
                "license {} not readable after create",
                record.key
            ))),
        }
    }
}

#[async_trait]
impl Seeder for LicenseSeeder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["organizations", "users"]
    }

    fn store(&self) -> &dyn FixtureStore {
        self.store.as_ref()
    }

    async fn do_seed(&self, options: &SeedOptions) -> Result<SeedCounts, SeedError> {
        let organizations = self.store.list_active_organizations().await?;
        if organizations.is_empty() {
            return Err(SeedError::DependencyMissing(
                "active organizations".to_string(),
            ));
        }
        let users = self.store.list_active_users().await?;

        let mut counts = SeedCounts::default();
        if options.include_presets {
            for preset in preset_licenses(organizations[0].id) {
                match self.store.find_license_by_key(&preset.key).await? {
                    Some(_) => counts.existing += 1,
                    None => {
                        self.store.create_license(preset).await?;
                        counts.created += 1;
                    }
                }
            }
        }

        let factory = LicenseFactory {
            store: self.store.clone(),
            organizations,
            users,
            rng: Mutex::new(seeded_rng(self.config.rng_seed, Self::NAME)),
            allocated: Mutex::new(HashSet::new()),
            attempts: self.config.uniqueness_attempts,
        };
        let request = GenerationRequest::of(options.effective_count(DEFAULT_COUNT));
        let outcome = BatchFactory::from_config(&self.config)
            .create_batch(&factory, &request)
            .await;
        if !outcome.failed.is_empty() {
            warn!(
                failed = outcome.failed.len(),
                requested = request.count,
                "some licenses were not created"
            );
        }
        counts.created += outcome.succeeded.len() as u64;
        Ok(counts)
    }

    async fn do_clean(&self, _options: &CleanOptions) -> Result<u64, SeedError> {
        Ok(self.store.delete_licenses().await?)
    }

    async fn stats(&self) -> Result<BTreeMap<String, u64>, SeedError> {
        let mut stats = BTreeMap::new();
        stats.insert("licenses".to_string(), self.store.count_licenses().await?);
        Ok(stats)
    }
}
