//! Concrete seeders, one per entity type.
//!
//! Registration order is fixed to the real foreign-key dependency order:
//! permissions → roles → admin → organizations → users → licenses →
//! access logs. Each seeder's `dependencies()` is advisory metadata only.

pub mod access_logs;
pub mod admin;
pub mod licenses;
pub mod organizations;
pub mod permissions;
pub mod roles;
pub mod users;

use std::sync::Arc;

use seedforge_core::{FixtureStore, SeedConfig};

pub use access_logs::AccessLogSeeder;
pub use admin::AdminSeeder;
pub use licenses::LicenseSeeder;
pub use organizations::OrganizationSeeder;
pub use permissions::PermissionSeeder;
pub use roles::RoleSeeder;
pub use users::UserSeeder;

use crate::seeder::Seeder;

/// All seeders in registration (dependency) order.
pub fn default_seeders(
    store: Arc<dyn FixtureStore>,
    config: SeedConfig,
) -> Vec<Arc<dyn Seeder>> {
    vec![
        Arc::new(PermissionSeeder::new(store.clone())),
        Arc::new(RoleSeeder::new(store.clone())),
        Arc::new(AdminSeeder::new(store.clone(), config.clone())),
        Arc::new(OrganizationSeeder::new(store.clone(), config.clone())),
        Arc::new(UserSeeder::new(store.clone(), config.clone())),
        Arc::new(LicenseSeeder::new(store.clone(), config.clone())),
        Arc::new(AccessLogSeeder::new(store, config)),
    ]
}
