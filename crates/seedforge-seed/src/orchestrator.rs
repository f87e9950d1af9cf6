//! Ordered execution and aggregation of registered seeders.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use seedforge_core::{
    CleanOptions, FixtureStore, OrchestratorResult, RunConfig, SeedConfig, SeedError,
    SeedOptions, SeederResult, SeederRun,
};

use crate::seeder::Seeder;
use crate::seeders::default_seeders;

/// Default execution order. This reflects the real foreign-key dependency
/// chain; `Seeder::dependencies` is advisory metadata on top of it.
pub const DEFAULT_ORDER: &[&str] = &[
    "permissions",
    "roles",
    "admin",
    "organizations",
    "users",
    "licenses",
    "access_logs",
];

/// Seeder subset for the quick-dev preset, with its count multiplier.
const QUICK_DEV_ORDER: &[&str] = &["permissions", "roles", "admin", "organizations", "users"];
const QUICK_DEV_MULTIPLIER: f64 = 0.2;

/// Production-safe bootstrap subset.
const MINIMAL_ORDER: &[&str] = &["permissions", "roles", "admin"];

/// Runs registered seeders in a fixed order and aggregates their results.
/// Registration happens once at construction; there is no dynamic
/// registration.
pub struct Orchestrator {
    seeders: Vec<Arc<dyn Seeder>>,
}

impl Orchestrator {
    /// Standard registry: every entity seeder in dependency order.
    pub fn new(store: Arc<dyn FixtureStore>, config: SeedConfig) -> Self {
        Self {
            seeders: default_seeders(store, config),
        }
    }

    /// Custom registry, mainly for tests.
    pub fn with_seeders(seeders: Vec<Arc<dyn Seeder>>) -> Self {
        Self { seeders }
    }

    pub fn seeder_names(&self) -> Vec<&'static str> {
        self.seeders.iter().map(|seeder| seeder.name()).collect()
    }

    fn find(&self, name: &str) -> Result<&Arc<dyn Seeder>, SeedError> {
        self.seeders
            .iter()
            .find(|seeder| seeder.name() == name)
            .ok_or_else(|| SeedError::UnknownSeeder(name.to_string()))
    }

    /// Run the configured seeders serially, stopping at the first failure
    /// and returning partial results. Only an unknown seeder name errors;
    /// every runtime failure is inside the returned result.
    pub async fn execute_all(&self, config: &RunConfig) -> Result<OrchestratorResult, SeedError> {
        if config.parallel {
            // True parallel execution of independent seeders is an
            // acknowledged limitation.
            warn!("parallel execution not supported; degrading to serial");
        }
        let names: Vec<String> = match &config.seeders {
            Some(names) => names.clone(),
            None => DEFAULT_ORDER.iter().map(|name| (*name).to_string()).collect(),
        };

        let started = Instant::now();
        let mut results = Vec::new();
        let mut success = true;
        let mut error = None;

        for name in &names {
            let seeder = self.find(name)?;
            info!(seeder = %name, "running seeder");
            let result = seeder.seed(&config.options).await;
            let failed = !result.success;
            if failed {
                error = result.error.clone();
            }
            results.push(SeederRun {
                seeder: name.clone(),
                result,
            });
            if failed {
                warn!(seeder = %name, "seeder failed, aborting run");
                success = false;
                break;
            }
        }

        Ok(OrchestratorResult {
            success,
            duration: started.elapsed(),
            results,
            error,
        })
    }

    /// Invoke one registered seeder directly. The caller is responsible for
    /// having run its prerequisites.
    pub async fn execute_single(
        &self,
        name: &str,
        options: &SeedOptions,
    ) -> Result<SeederResult, SeedError> {
        let seeder = self.find(name)?;
        Ok(seeder.seed(options).await)
    }

    /// Clean every registered seeder in reverse registration order so
    /// foreign-key children go before their parents. Continues past
    /// individual failures; aggregate success only if all succeeded.
    pub async fn clean_all(&self, preserve_admin: bool) -> OrchestratorResult {
        let options = CleanOptions { preserve_admin };
        let started = Instant::now();
        let mut results = Vec::new();
        let mut success = true;
        let mut error = None;

        for seeder in self.seeders.iter().rev() {
            info!(seeder = seeder.name(), "cleaning seeder");
            let result = seeder.clean(&options).await;
            if !result.success {
                success = false;
                if error.is_none() {
                    error = result.error.clone();
                }
            }
            results.push(SeederRun {
                seeder: seeder.name().to_string(),
                result,
            });
        }

        OrchestratorResult {
            success,
            duration: started.elapsed(),
            results,
            error,
        }
    }

    /// Best-effort stats fan-out; a broken seeder contributes an empty map
    /// instead of blanking the report.
    pub async fn all_stats(&self) -> BTreeMap<String, BTreeMap<String, u64>> {
        let mut report = BTreeMap::new();
        for seeder in &self.seeders {
            let stats = match seeder.stats().await {
                Ok(stats) => stats,
                Err(error) => {
                    warn!(seeder = seeder.name(), %error, "stats unavailable");
                    BTreeMap::new()
                }
            };
            report.insert(seeder.name().to_string(), stats);
        }
        report
    }

    /// Best-effort validation fan-out; a seeder that errors reports `false`.
    pub async fn validate_all(&self) -> BTreeMap<String, bool> {
        let mut report = BTreeMap::new();
        for seeder in &self.seeders {
            let valid = match seeder.validate().await {
                Ok(valid) => valid,
                Err(error) => {
                    warn!(seeder = seeder.name(), %error, "validation errored");
                    false
                }
            };
            report.insert(seeder.name().to_string(), valid);
        }
        report
    }

    /// Fast-iteration preset: the core subset with multiplier-scaled counts.
    pub async fn quick_dev(
        &self,
        options: &SeedOptions,
    ) -> Result<OrchestratorResult, SeedError> {
        let mut options = options.clone();
        options.count_multiplier = QUICK_DEV_MULTIPLIER;
        self.execute_all(&RunConfig {
            seeders: Some(
                QUICK_DEV_ORDER.iter().map(|name| (*name).to_string()).collect(),
            ),
            parallel: false,
            options,
        })
        .await
    }

    /// Production-safe minimal bootstrap: catalogs and the admin account.
    pub async fn minimal(&self) -> Result<OrchestratorResult, SeedError> {
        self.execute_all(&RunConfig {
            seeders: Some(
                MINIMAL_ORDER.iter().map(|name| (*name).to_string()).collect(),
            ),
            parallel: false,
            options: SeedOptions::default(),
        })
        .await
    }
}
