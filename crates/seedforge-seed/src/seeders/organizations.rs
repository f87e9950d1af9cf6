//! Organization seeder: random orgs, their departments, and the named
//! scenario presets.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use seedforge_core::{
    CleanOptions, FixtureStore, GenerationRequest, Organization, SeedConfig, SeedCounts,
    SeedError, SeedOptions,
};
use seedforge_generate::catalog::preset_organizations;
use seedforge_generate::organizations::{
    OrganizationOverrides, departments_for, org_code, organization,
};
use seedforge_generate::{resolve_unique, seeded_rng};

use crate::batch::{BatchFactory, RecordFactory};
use crate::seeder::Seeder;

const DEFAULT_COUNT: usize = 25;

pub struct OrganizationSeeder {
    store: Arc<dyn FixtureStore>,
    config: SeedConfig,
}

impl OrganizationSeeder {
    pub const NAME: &'static str = "organizations";

    pub fn new(store: Arc<dyn FixtureStore>, config: SeedConfig) -> Self {
        Self { store, config }
    }
}

struct OrganizationFactory {
    store: Arc<dyn FixtureStore>,
    rng: Mutex<ChaCha8Rng>,
    /// Codes already claimed by in-flight slots of this batch.
    allocated: Mutex<HashSet<String>>,
    attempts: u32,
}

#[async_trait]
impl RecordFactory for OrganizationFactory {
    type Record = Organization;
    type Overrides = OrganizationOverrides;

    async fn generate(
        &self,
        _index: usize,
        overrides: Option<&OrganizationOverrides>,
    ) -> Result<Organization, SeedError> {
        let base = overrides.cloned().unwrap_or_default();
        let code = resolve_unique(
            || {
                let mut rng = self.rng.lock().unwrap();
                base.code.clone().unwrap_or_else(|| org_code(&mut *rng))
            },
            |candidate| {
                let candidate = candidate.clone();
                async move {
                    if self.allocated.lock().unwrap().contains(&candidate) {
                        return Ok(true);
                    }
                    Ok(self
                        .store
                        .find_organization_by_code(&candidate)
                        .await?
                        .is_some())
                }
            },
            self.attempts,
        )
        .await?;

        let mut effective = base;
        effective.code = Some(code.clone());
        let record = {
            let mut rng = self.rng.lock().unwrap();
            organization(&mut *rng, &effective)
        };
        self.allocated.lock().unwrap().insert(code);
        Ok(record)
    }

    async fn persist(&self, record: Organization) -> Result<Organization, SeedError> {
        Ok(self.store.create_organization(record).await?)
    }

    async fn validate(&self, record: &Organization) -> Result<(), SeedError> {
        match self.store.find_organization_by_code(&record.code).await? {
            Some(found) if found.id == record.id => Ok(()),
            _ => Err(SeedError::Validation(format!(
                "organization {} not readable after create",
                record.code
            ))),
        }
    }
}

#[async_trait]
impl Seeder for OrganizationSeeder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn store(&self) -> &dyn FixtureStore {
        self.store.as_ref()
    }

    async fn do_seed(&self, options: &SeedOptions) -> Result<SeedCounts, SeedError> {
        let mut counts = SeedCounts::default();

        if options.include_presets {
            for preset in preset_organizations() {
                match self.store.find_organization_by_code(&preset.code).await? {
                    Some(_) => counts.existing += 1,
                    None => {
                        self.store.create_organization(preset).await?;
                        counts.created += 1;
                    }
                }
            }
        }

        let factory = OrganizationFactory {
            store: self.store.clone(),
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
                "some organizations were not created"
            );
        }
        counts.created += outcome.succeeded.len() as u64;

        // Departments ride along with their organizations. Suspended orgs
        // stay department-less.
        let mut rng = seeded_rng(self.config.rng_seed, "departments");
        for org in outcome.succeeded.iter().filter(|org| org.active) {
            for department in departments_for(&mut rng, org) {
                match self.store.create_department(department).await {
                    Ok(_) => counts.created += 1,
                    Err(error) => warn!(org = %org.code, %error, "department create failed"),
                }
            }
        }

        Ok(counts)
    }

    async fn do_clean(&self, _options: &CleanOptions) -> Result<u64, SeedError> {
        // Departments first: they reference organizations.
        let departments = self.store.delete_departments().await?;
        let organizations = self.store.delete_organizations().await?;
        Ok(departments + organizations)
    }

    async fn stats(&self) -> Result<BTreeMap<String, u64>, SeedError> {
        let mut stats = BTreeMap::new();
        stats.insert(
            "organizations".to_string(),
            self.store.count_organizations().await?,
        );
        stats.insert(
            "departments".to_string(),
            self.store.count_departments().await?,
        );
        Ok(stats)
    }
}
