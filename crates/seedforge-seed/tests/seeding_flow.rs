//! End-to-end seeding against the in-memory store: referential integrity,
//! uniqueness, preset idempotence, presets of the orchestrator.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use seedforge_core::{
    FixtureStore, License, MemoryStore, RunConfig, SeedConfig, SeedOptions, User,
};
use seedforge_seed::seeders::AccessLogSeeder;
use seedforge_seed::{Orchestrator, Seeder};

fn config() -> SeedConfig {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("seedforge_seed=debug")
        .try_init();
    SeedConfig {
        rng_seed: Some(42),
        ..SeedConfig::default()
    }
}

fn small_run() -> RunConfig {
    RunConfig {
        seeders: None,
        parallel: false,
        options: SeedOptions {
            count_multiplier: 0.1,
            include_presets: true,
            ..SeedOptions::default()
        },
    }
}

#[tokio::test]
async fn full_run_produces_consistent_referentially_valid_fixtures() {
    let store = Arc::new(MemoryStore::new());
    let orchestrator = Orchestrator::new(store.clone(), config());

    let result = orchestrator.execute_all(&small_run()).await.unwrap();
    assert!(result.success, "run failed: {:?}", result.error);
    assert_eq!(result.results.len(), 7);

    let organizations = store.list_active_organizations().await.unwrap();
    let departments = store.list_departments().await.unwrap();
    let users = store.list_active_users().await.unwrap();
    let licenses = store.list_licenses().await.unwrap();
    assert!(!organizations.is_empty());
    assert!(!users.is_empty());
    assert!(!licenses.is_empty());

    // No uniqueness-constrained key collides within the store.
    let codes: HashSet<&str> = organizations.iter().map(|o| o.code.as_str()).collect();
    assert_eq!(codes.len(), organizations.len());
    let emails: HashSet<&str> = users.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails.len(), users.len());
    let keys: HashSet<&str> = licenses.iter().map(|l| l.key.as_str()).collect();
    assert_eq!(keys.len(), licenses.len());

    // Foreign keys resolve to persisted parents.
    let org_ids: HashSet<_> = organizations.iter().map(|o| o.id).collect();
    for department in &departments {
        assert!(org_ids.contains(&department.organization_id));
    }
    for user in &users {
        match user.organization_id {
            Some(org_id) => assert!(org_ids.contains(&org_id)),
            None => assert!(user.admin, "only the admin may be org-less"),
        }
    }
    let user_ids: HashSet<_> = users.iter().map(|u| u.id).collect();
    for license in &licenses {
        assert!(org_ids.contains(&license.organization_id));
        if let Some(holder) = license.holder_id {
            assert!(user_ids.contains(&holder));
        }
        // Derived-field contract.
        assert_eq!(
            license.expired,
            License::is_expired(license.expires_at, license.created_at)
        );
    }
    assert!(store.count_access_logs().await.unwrap() > 0);
}

#[tokio::test]
async fn preset_records_are_idempotent_across_runs() {
    let store = Arc::new(MemoryStore::new());
    let orchestrator = Orchestrator::new(store.clone(), config());
    let presets_only = SeedOptions {
        count: Some(0),
        include_presets: true,
        ..SeedOptions::default()
    };

    let first = orchestrator
        .execute_single("organizations", &presets_only)
        .await
        .unwrap();
    let first_counts = first.data.unwrap();
    assert_eq!(first_counts.created, 2);
    assert_eq!(first_counts.existing, 0);

    let second = orchestrator
        .execute_single("organizations", &presets_only)
        .await
        .unwrap();
    let second_counts = second.data.unwrap();
    assert_eq!(second_counts.created, 0);
    assert_eq!(second_counts.existing, 2);
    assert_eq!(store.count_organizations().await.unwrap(), 2);

    // License presets behave the same once an active org exists.
    let first = orchestrator
        .execute_single("licenses", &presets_only)
        .await
        .unwrap();
    assert_eq!(first.data.unwrap().created, 2);
    let second = orchestrator
        .execute_single("licenses", &presets_only)
        .await
        .unwrap();
    assert_eq!(second.data.unwrap().existing, 2);
    assert_eq!(store.count_licenses().await.unwrap(), 2);
}

#[tokio::test]
async fn minimal_bootstrap_is_idempotent_and_production_safe() {
    let store = Arc::new(MemoryStore::new());
    let orchestrator = Orchestrator::new(store.clone(), config());

    let first = orchestrator.minimal().await.unwrap();
    assert!(first.success);
    let names: Vec<&str> = first.results.iter().map(|run| run.seeder.as_str()).collect();
    assert_eq!(names, vec!["permissions", "roles", "admin"]);
    assert_eq!(first.result_for("admin").unwrap().data.unwrap().created, 1);
    // Catalog-only bootstrap: no random fixture data.
    assert_eq!(store.count_organizations().await.unwrap(), 0);

    let second = orchestrator.minimal().await.unwrap();
    assert!(second.success);
    let admin = second.result_for("admin").unwrap().data.unwrap();
    assert_eq!(admin.created, 0);
    assert_eq!(admin.existing, 1);
    assert_eq!(store.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn quick_dev_runs_the_reduced_subset_with_scaled_counts() {
    let store = Arc::new(MemoryStore::new());
    let orchestrator = Orchestrator::new(store.clone(), config());

    let result = orchestrator
        .quick_dev(&SeedOptions {
            include_presets: true,
            ..SeedOptions::default()
        })
        .await
        .unwrap();
    assert!(result.success, "run failed: {:?}", result.error);
    let names: Vec<&str> = result.results.iter().map(|run| run.seeder.as_str()).collect();
    assert_eq!(
        names,
        vec!["permissions", "roles", "admin", "organizations", "users"]
    );
    // 20% of the default 150 users.
    assert_eq!(store.count_users().await.unwrap(), 31); // 30 + admin
    assert_eq!(store.count_licenses().await.unwrap(), 0);
}

#[tokio::test]
async fn every_license_receives_exactly_its_log_quota() {
    let store = Arc::new(MemoryStore::new());
    let org_id = Uuid::new_v4();
    store
        .create_user(User {
            id: Uuid::new_v4(),
            email: "holder@example.test".to_string(),
            name: "Holder".to_string(),
            password_hash: "0".repeat(64),
            role_code: "viewer".to_string(),
            organization_id: Some(org_id),
            department_id: None,
            active: true,
            admin: false,
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    let mut license_ids = Vec::new();
    for n in 0..3 {
        let license = store
            .create_license(License {
                id: Uuid::new_v4(),
                key: format!("LIC-QUOTA-{n:04}-0000"),
                organization_id: org_id,
                holder_id: None,
                seats: 5,
                amount: 99.90,
                issued_at: Utc::now(),
                expires_at: None,
                expired: false,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        license_ids.push(license.id);
    }

    let seeder = AccessLogSeeder::new(store.clone(), config());
    let result = seeder
        .seed(&SeedOptions {
            logs_per_license: Some(4),
            ..SeedOptions::default()
        })
        .await;
    assert!(result.success, "seed failed: {:?}", result.error);

    let logs = store.access_logs();
    assert_eq!(logs.len(), 12);
    let mut per_license: HashMap<Uuid, usize> = HashMap::new();
    for log in &logs {
        *per_license.entry(log.license_id).or_insert(0) += 1;
    }
    for id in &license_ids {
        assert_eq!(per_license.get(id).copied(), Some(4));
    }
}

#[tokio::test]
async fn clean_all_preserves_the_bootstrap_admin_when_asked() {
    let store = Arc::new(MemoryStore::new());
    let orchestrator = Orchestrator::new(store.clone(), config());
    let seeded = orchestrator.execute_all(&small_run()).await.unwrap();
    assert!(seeded.success);

    let cleaned = orchestrator.clean_all(true).await;
    assert!(cleaned.success, "clean failed: {:?}", cleaned.error);

    assert_eq!(store.count_organizations().await.unwrap(), 0);
    assert_eq!(store.count_departments().await.unwrap(), 0);
    assert_eq!(store.count_licenses().await.unwrap(), 0);
    assert_eq!(store.count_access_logs().await.unwrap(), 0);
    assert_eq!(store.count_permissions().await.unwrap(), 0);
    assert_eq!(store.count_roles().await.unwrap(), 0);
    // Only the bootstrap admin survives.
    assert_eq!(store.count_users().await.unwrap(), 1);
    let admin = store
        .find_user_by_email(&config().admin_email)
        .await
        .unwrap();
    assert!(admin.unwrap().admin);
}

#[tokio::test]
async fn unreachable_store_fails_fast_with_a_structured_result() {
    let store = Arc::new(MemoryStore::new());
    store.set_offline(true);
    let orchestrator = Orchestrator::new(store.clone(), config());

    let result = orchestrator.execute_all(&small_run()).await.unwrap();
    assert!(!result.success);
    // Fail-fast at the very first seeder.
    assert_eq!(result.results.len(), 1);
    assert_eq!(result.results[0].seeder, "permissions");
    assert!(
        result
            .error
            .as_deref()
            .unwrap_or_default()
            .contains("unreachable")
    );
}
