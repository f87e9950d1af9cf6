//! User seeder.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use seedforge_core::{
    CleanOptions, Department, FixtureStore, GenerationRequest, Organization, Role, SeedConfig,
    SeedCounts, SeedError, SeedOptions, User,
};
use seedforge_generate::users::{UserOverrides, email_for, user};
use seedforge_generate::{resolve_unique, seeded_rng};

use crate::batch::{BatchFactory, RecordFactory};
use crate::seeder::Seeder;

const DEFAULT_COUNT: usize = 150;

pub struct UserSeeder {
    store: Arc<dyn FixtureStore>,
    config: SeedConfig,
}

impl UserSeeder {
    pub const NAME: &'static str = "users";

    pub fn new(store: Arc<dyn FixtureStore>, config: SeedConfig) -> Self {
        Self { store, config }
    }
}

struct UserFactory {
    store: Arc<dyn FixtureStore>,
    organizations: Vec<Organization>,
    departments: Vec<Department>,
    roles: Vec<Role>,
    rng: Mutex<ChaCha8Rng>,
    allocated: Mutex<HashSet<String>>,
    attempts: u32,
}

#[async_trait]
impl RecordFactory for UserFactory {
    type Record = User;
    type Overrides = UserOverrides;

    async fn generate(
        &self,
        _index: usize,
        overrides: Option<&UserOverrides>,
    ) -> Result<User, SeedError> {
        let base = overrides.cloned().unwrap_or_default();
        let mut record = {
            let mut rng = self.rng.lock().unwrap();
            user(
                &mut *rng,
                &self.organizations,
                &self.departments,
                &self.roles,
                &base,
            )?
        };

        if base.email.is_none() {
            let name = record.name.clone();
            record.email = resolve_unique(
                || {
                    let mut rng = self.rng.lock().unwrap();
                    email_for(&mut *rng, &name)
                },
                |candidate| {
                    let candidate = candidate.clone();
                    async move {
                        if self.allocated.lock().unwrap().contains(&candidate) {
                            return Ok(true);
                        }
                        Ok(self.store.find_user_by_email(&candidate).await?.is_some())
                    }
                },
                self.attempts,
            )
            .await?;
        }
        self.allocated.lock().unwrap().insert(record.email.clone());
        Ok(record)
    }

    async fn persist(&self, record: User) -> Result<User, SeedError> {
        Ok(self.store.create_user(record).await?)
    }

    async fn validate(&self, record: &User) -> Result<(), SeedError> {
        match self.store.find_user_by_email(&record.email).await? {
            Some(found) if found.id == record.id => Ok(()),
            _ => Err(SeedError::Validation(format!(
                "user {} not readable after create",
                record.email
            ))),
        }
    }
}

#[async_trait]
impl Seeder for UserSeeder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["roles", "organizations"]
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
        let roles = self.store.list_roles().await?;
        if roles.is_empty() {
            return Err(SeedError::DependencyMissing("roles".to_string()));
        }
        let departments = self.store.list_departments().await?;

        let factory = UserFactory {
            store: self.store.clone(),
            organizations,
            departments,
            roles,
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
                "some users were not created"
            );
        }
        Ok(SeedCounts::created(outcome.succeeded.len() as u64))
    }

    async fn do_clean(&self, options: &CleanOptions) -> Result<u64, SeedError> {
        Ok(self.store.delete_users(options.preserve_admin).await?)
    }

    async fn stats(&self) -> Result<BTreeMap<String, u64>, SeedError> {
        let mut stats = BTreeMap::new();
        stats.insert("users".to_string(), self.store.count_users().await?);
        Ok(stats)
    }
}
