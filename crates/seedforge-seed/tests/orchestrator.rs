//! Orchestrator ordering, fail-fast, and fan-out isolation, exercised with
//! scripted stub seeders.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use seedforge_core::{
    CleanOptions, FixtureStore, MemoryStore, RunConfig, SeedCounts, SeedError, SeedOptions,
    StoreError,
};
use seedforge_seed::{Orchestrator, Seeder};

#[derive(Default)]
struct StubBehavior {
    fail_seed: bool,
    fail_clean: bool,
    fail_stats: bool,
}

struct StubSeeder {
    name: &'static str,
    behavior: StubBehavior,
    store: Arc<MemoryStore>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubSeeder {
    fn new(
        name: &'static str,
        behavior: StubBehavior,
        calls: Arc<Mutex<Vec<String>>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            behavior,
            store: Arc::new(MemoryStore::new()),
            calls,
        })
    }

    fn record(&self, operation: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{operation}", self.name));
    }
}

#[async_trait]
impl Seeder for StubSeeder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn store(&self) -> &dyn FixtureStore {
        self.store.as_ref()
    }

    async fn do_seed(&self, _options: &SeedOptions) -> Result<SeedCounts, SeedError> {
        self.record("seed");
        if self.behavior.fail_seed {
            return Err(SeedError::Validation("scripted failure".to_string()));
        }
        Ok(SeedCounts::created(1))
    }

    async fn do_clean(&self, _options: &CleanOptions) -> Result<u64, SeedError> {
        self.record("clean");
        if self.behavior.fail_clean {
            return Err(SeedError::Store(StoreError::Timeout));
        }
        Ok(1)
    }

    async fn stats(&self) -> Result<BTreeMap<String, u64>, SeedError> {
        if self.behavior.fail_stats {
            return Err(SeedError::Store(StoreError::Timeout));
        }
        let mut stats = BTreeMap::new();
        stats.insert("records".to_string(), 1);
        Ok(stats)
    }
}

fn scripted(
    behaviors: &[(&'static str, StubBehavior)],
) -> (Orchestrator, Arc<Mutex<Vec<String>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let seeders = behaviors
        .iter()
        .map(|(name, behavior)| {
            StubSeeder::new(
                name,
                StubBehavior {
                    fail_seed: behavior.fail_seed,
                    fail_clean: behavior.fail_clean,
                    fail_stats: behavior.fail_stats,
                },
                calls.clone(),
            ) as Arc<dyn Seeder>
        })
        .collect();
    (Orchestrator::with_seeders(seeders), calls)
}

fn run_all(names: Option<Vec<&str>>) -> RunConfig {
    RunConfig {
        seeders: names.map(|names| names.into_iter().map(String::from).collect()),
        parallel: false,
        options: SeedOptions::default(),
    }
}

#[tokio::test]
async fn serial_run_stops_at_the_first_failing_seeder() {
    let (orchestrator, calls) = scripted(&[
        ("alpha", StubBehavior::default()),
        (
            "beta",
            StubBehavior {
                fail_seed: true,
                ..Default::default()
            },
        ),
        ("gamma", StubBehavior::default()),
    ]);

    let result = orchestrator
        .execute_all(&run_all(Some(vec!["alpha", "beta", "gamma"])))
        .await
        .unwrap();

    assert!(!result.success);
    assert!(result.error.is_some());
    let names: Vec<&str> = result.results.iter().map(|run| run.seeder.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
    assert!(result.result_for("alpha").unwrap().success);
    assert!(!result.result_for("beta").unwrap().success);
    assert!(result.result_for("gamma").is_none());
    // gamma's do_seed never ran.
    assert!(!calls.lock().unwrap().iter().any(|call| call.starts_with("gamma")));
}

#[tokio::test]
async fn clean_all_runs_in_reverse_registration_order_and_continues_past_failures() {
    let (orchestrator, calls) = scripted(&[
        ("alpha", StubBehavior::default()),
        (
            "beta",
            StubBehavior {
                fail_clean: true,
                ..Default::default()
            },
        ),
        ("gamma", StubBehavior::default()),
    ]);

    let result = orchestrator.clean_all(false).await;

    assert!(!result.success);
    let names: Vec<&str> = result.results.iter().map(|run| run.seeder.as_str()).collect();
    assert_eq!(names, vec!["gamma", "beta", "alpha"]);
    let cleans: Vec<String> = calls
        .lock()
        .unwrap()
        .iter()
        .filter(|call| call.ends_with(":clean"))
        .cloned()
        .collect();
    assert_eq!(cleans, vec!["gamma:clean", "beta:clean", "alpha:clean"]);
}

#[tokio::test]
async fn unknown_seeder_names_propagate_as_errors() {
    let (orchestrator, _calls) = scripted(&[("alpha", StubBehavior::default())]);

    let err = orchestrator
        .execute_single("missing", &SeedOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, SeedError::UnknownSeeder("missing".to_string()));

    let err = orchestrator
        .execute_all(&run_all(Some(vec!["alpha", "missing"])))
        .await
        .unwrap_err();
    assert!(matches!(err, SeedError::UnknownSeeder(_)));
}

#[tokio::test]
async fn parallel_requests_degrade_to_a_complete_serial_run() {
    let (orchestrator, _calls) = scripted(&[
        ("alpha", StubBehavior::default()),
        ("beta", StubBehavior::default()),
    ]);

    let mut config = run_all(Some(vec!["alpha", "beta"]));
    config.parallel = true;
    let result = orchestrator.execute_all(&config).await.unwrap();

    assert!(result.success);
    let names: Vec<&str> = result.results.iter().map(|run| run.seeder.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);
}

#[tokio::test]
async fn stats_and_validation_fan_outs_isolate_broken_seeders() {
    let (orchestrator, _calls) = scripted(&[
        ("alpha", StubBehavior::default()),
        (
            "broken",
            StubBehavior {
                fail_stats: true,
                ..Default::default()
            },
        ),
    ]);

    let stats = orchestrator.all_stats().await;
    assert_eq!(stats["alpha"]["records"], 1);
    assert!(stats["broken"].is_empty());

    let validations = orchestrator.validate_all().await;
    assert!(validations["alpha"]);
    assert!(!validations["broken"]);
}
